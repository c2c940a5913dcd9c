//! The context a function receives and returns

use super::variables::ContextVariables;
use crate::functions::FunctionRegistry;
use std::sync::Arc;

/// Variables plus the functions reachable from them.
///
/// Every invocation gets its own `InvocationContext`; the registry is shared
/// read-only between all of them.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    /// Variables visible to the function
    pub variables: ContextVariables,
    functions: Arc<FunctionRegistry>,
}

impl InvocationContext {
    /// Create a context over `variables` resolving functions in `functions`
    pub fn new(variables: ContextVariables, functions: Arc<FunctionRegistry>) -> Self {
        Self {
            variables,
            functions,
        }
    }

    /// A context with no variables and no functions
    pub fn empty() -> Self {
        Self::new(ContextVariables::new(), Arc::new(FunctionRegistry::new()))
    }

    /// A sibling context sharing the registry but holding other variables
    pub fn with_variables(&self, variables: ContextVariables) -> Self {
        Self::new(variables, Arc::clone(&self.functions))
    }

    /// The functions this context can call
    pub fn functions(&self) -> &Arc<FunctionRegistry> {
        &self.functions
    }

    /// The invocation result, stored in the main slot
    pub fn result(&self) -> &str {
        self.variables.input()
    }

    /// Consume the context, keeping only its variables
    pub fn into_variables(self) -> ContextVariables {
        self.variables
    }
}
