//! Functions backed by Rust closures

use super::function_trait::Function;
use super::registry::GLOBAL_SKILL;
use super::types::ParameterView;
use crate::context::{ContextVariables, InvocationContext};
use crate::error::WeftResult;
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Type-erased async handler of a native function
pub type NativeHandler =
    Arc<dyn Fn(InvocationContext) -> BoxFuture<'static, WeftResult<InvocationContext>> + Send + Sync>;

/// A function implemented in Rust
#[derive(Clone)]
pub struct NativeFunction {
    skill_name: String,
    name: String,
    description: String,
    parameters: Vec<ParameterView>,
    handler: NativeHandler,
}

impl NativeFunction {
    /// Wrap a synchronous closure.
    ///
    /// The closure receives the invocation's own variables and returns the
    /// result, which is stored in the main slot.
    pub fn from_fn<F>(
        skill_name: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        f: F,
    ) -> Self
    where
        F: Fn(&mut ContextVariables) -> WeftResult<String> + Send + Sync + 'static,
    {
        let handler: NativeHandler = Arc::new(move |mut context: InvocationContext| {
            let outcome = f(&mut context.variables);
            async move {
                let output = outcome?;
                context.variables.update(output);
                Ok(context)
            }
            .boxed()
        });
        Self::with_handler(skill_name, name, description, handler)
    }

    /// Wrap an async closure that receives and returns the whole context
    pub fn from_async<F, Fut>(
        skill_name: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        f: F,
    ) -> Self
    where
        F: Fn(InvocationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = WeftResult<InvocationContext>> + Send + 'static,
    {
        let handler: NativeHandler = Arc::new(move |context: InvocationContext| f(context).boxed());
        Self::with_handler(skill_name, name, description, handler)
    }

    fn with_handler(
        skill_name: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        handler: NativeHandler,
    ) -> Self {
        let skill_name = skill_name.into();
        Self {
            skill_name: if skill_name.is_empty() {
                GLOBAL_SKILL.to_string()
            } else {
                skill_name
            },
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            handler,
        }
    }

    /// Declare a parameter
    pub fn with_parameter(mut self, parameter: ParameterView) -> Self {
        self.parameters.push(parameter);
        self
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("skill_name", &self.skill_name)
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Function for NativeFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn skill_name(&self) -> &str {
        &self.skill_name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> Vec<ParameterView> {
        self.parameters.clone()
    }

    async fn invoke(&self, context: InvocationContext) -> WeftResult<InvocationContext> {
        (self.handler)(context).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WeftError;

    #[tokio::test]
    async fn test_sync_closure_sets_result() {
        let function = NativeFunction::from_fn("text", "upper", "Uppercase", |vars| {
            Ok(vars.input().to_uppercase())
        });

        let context = InvocationContext::empty()
            .with_variables(ContextVariables::with_input("shout"));
        let result = function.invoke(context).await.unwrap();

        assert_eq!(result.result(), "SHOUT");
        assert_eq!(function.qualified_name(), "text.upper");
    }

    #[tokio::test]
    async fn test_async_closure_keeps_extra_variables() {
        let function = NativeFunction::from_async("", "tag", "Tag the input", |mut context| async move {
            context.variables.set("tagged", "yes");
            let tagged = format!("<{}>", context.result());
            context.variables.update(tagged);
            Ok(context)
        });

        let context = InvocationContext::empty().with_variables(ContextVariables::with_input("x"));
        let result = function.invoke(context).await.unwrap();

        assert_eq!(result.result(), "<x>");
        assert_eq!(result.variables.get("tagged"), Some("yes"));
        assert_eq!(function.skill_name(), GLOBAL_SKILL);
        assert_eq!(function.qualified_name(), "tag");
    }

    #[tokio::test]
    async fn test_closure_error_propagates() {
        let function = NativeFunction::from_fn("math", "fail", "Always fails", |_| {
            Err(WeftError::invocation("math.fail", "boom"))
        });

        let err = function.invoke(InvocationContext::empty()).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_declared_parameters_are_described() {
        let function = NativeFunction::from_fn("text", "join", "Join", |vars| Ok(vars.input().to_string()))
            .with_parameter(ParameterView::required("input", "First part"))
            .with_parameter(ParameterView::optional("separator", "Joiner", " "));

        let view = function.describe();
        assert_eq!(view.parameters.len(), 2);
        assert_eq!(view.parameters[1].default_value.as_deref(), Some(" "));
        assert!(!view.is_semantic);
    }
}
