//! Kernel: functions, templates and plans behind one handle

use crate::config::EngineConfig;
use crate::context::{ContextVariables, InvocationContext};
use crate::error::{WeftError, WeftResult};
use crate::functions::{Function, FunctionRegistry, SemanticFunction, TextCompletion};
use crate::planning::Plan;
use crate::template::PromptTemplateEngine;
use std::sync::Arc;
use tracing::{debug, info};

/// Owns the function registry, the template engine and the completion backend
pub struct Kernel {
    functions: Arc<FunctionRegistry>,
    engine: PromptTemplateEngine,
    completion: Option<Arc<dyn TextCompletion>>,
    config: EngineConfig,
}

impl Kernel {
    /// Create a kernel without a completion backend
    pub fn new(config: EngineConfig) -> Self {
        Self {
            functions: Arc::new(FunctionRegistry::new()),
            engine: PromptTemplateEngine::new(),
            completion: None,
            config,
        }
    }

    /// Create a kernel whose semantic functions use `completion`
    pub fn with_completion(config: EngineConfig, completion: Arc<dyn TextCompletion>) -> Self {
        let mut kernel = Self::new(config);
        kernel.completion = Some(completion);
        kernel
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The registered functions
    pub fn functions(&self) -> &Arc<FunctionRegistry> {
        &self.functions
    }

    /// Register a function.
    ///
    /// Contexts created earlier keep seeing the registry as it was.
    pub fn register_function(&mut self, function: Arc<dyn Function>) {
        debug!("Registering function `{}`", function.qualified_name());
        Arc::make_mut(&mut self.functions).register(function);
    }

    /// Register a prompt template as a function
    ///
    /// # Errors
    ///
    /// Returns `Config` if the kernel has no completion backend and `Syntax`
    /// if the template is invalid.
    pub fn register_semantic_function(
        &mut self,
        skill_name: &str,
        name: &str,
        template: &str,
        description: &str,
    ) -> WeftResult<Arc<dyn Function>> {
        let completion = self.completion.clone().ok_or_else(|| {
            WeftError::config_with_context(
                "A completion backend is required for semantic functions",
                format!("Registering `{}.{}`", skill_name, name),
            )
        })?;

        let function: Arc<dyn Function> = Arc::new(
            SemanticFunction::new(
                skill_name,
                name,
                template,
                self.config.completion.clone(),
                completion,
            )?
            .with_description(description),
        );
        self.register_function(Arc::clone(&function));
        Ok(function)
    }

    /// Look up a function; `None` skill means the global functions
    pub fn function(&self, skill_name: Option<&str>, name: &str) -> WeftResult<Arc<dyn Function>> {
        self.functions.resolve(skill_name, name)
    }

    /// A context over `variables` that can call the registered functions
    pub fn create_context(&self, variables: ContextVariables) -> InvocationContext {
        InvocationContext::new(variables, Arc::clone(&self.functions))
    }

    /// Render a template
    pub async fn render(&self, template: &str, variables: &ContextVariables) -> WeftResult<String> {
        let context = self.create_context(variables.clone());
        self.engine.render(template, &context).await
    }

    /// Run functions in sequence, each receiving the previous result as input
    pub async fn run(
        &self,
        variables: ContextVariables,
        pipeline: &[Arc<dyn Function>],
    ) -> WeftResult<InvocationContext> {
        let mut context = self.create_context(variables);

        for (index, function) in pipeline.iter().enumerate() {
            let name = function.qualified_name();
            debug!("Running pipeline function {}/{}: {}", index + 1, pipeline.len(), name);
            context = function
                .invoke(context)
                .await
                .map_err(|e| e.in_function(&name))?;
        }

        Ok(context)
    }

    /// Execute a plan with the kernel's plan settings
    pub async fn run_plan(
        &self,
        plan: &mut Plan,
        variables: ContextVariables,
    ) -> WeftResult<InvocationContext> {
        info!("Running plan for goal `{}`", plan.description());
        plan.set_config(&self.config.plan);
        plan.execute(self.create_context(variables)).await
    }
}
