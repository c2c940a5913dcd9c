//! Functions defined by a prompt template

use super::function_trait::Function;
use super::registry::GLOBAL_SKILL;
use super::types::ParameterView;
use crate::config::CompletionSettings;
use crate::context::{InvocationContext, MAIN_KEY};
use crate::error::WeftResult;
use crate::template::{Block, PromptTemplateEngine};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Text completion backend
///
/// The language model client lives outside this crate; anything that turns a
/// prompt into text can back a [`SemanticFunction`].
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Complete `prompt`
    async fn complete(&self, prompt: &str, settings: &CompletionSettings) -> WeftResult<String>;
}

/// A function whose body is a prompt template sent to a completion backend
#[derive(Clone)]
pub struct SemanticFunction {
    skill_name: String,
    name: String,
    description: String,
    template: String,
    blocks: Vec<Block>,
    settings: CompletionSettings,
    completion: Arc<dyn TextCompletion>,
    engine: PromptTemplateEngine,
}

impl SemanticFunction {
    /// Create a semantic function, validating its template up front
    ///
    /// # Errors
    ///
    /// Returns `WeftError::Syntax` if the template has an invalid block.
    pub fn new(
        skill_name: impl Into<String>,
        name: impl Into<String>,
        template: impl Into<String>,
        settings: CompletionSettings,
        completion: Arc<dyn TextCompletion>,
    ) -> WeftResult<Self> {
        let engine = PromptTemplateEngine::new();
        let template = template.into();
        let blocks = engine.extract_blocks(&template, true)?;
        let skill_name = skill_name.into();

        Ok(Self {
            skill_name: if skill_name.is_empty() {
                GLOBAL_SKILL.to_string()
            } else {
                skill_name
            },
            name: name.into(),
            description: String::new(),
            template,
            blocks,
            settings,
            completion,
            engine,
        })
    }

    /// Set the description shown to planners
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The prompt template source
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    /// Variable names referenced by the template, first occurrence order
    fn template_variables(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let mut push = |name: &str| {
            if !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
                names.push(name.to_string());
            }
        };

        for block in &self.blocks {
            match block {
                Block::Variable(var) => push(var.name()),
                Block::Code(code) => {
                    for token in code.tokens() {
                        if let Block::Variable(var) = token {
                            push(var.name());
                        }
                    }
                }
                _ => {}
            }
        }
        names
    }
}

impl fmt::Debug for SemanticFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SemanticFunction")
            .field("skill_name", &self.skill_name)
            .field("name", &self.name)
            .field("template", &self.template)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Function for SemanticFunction {
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
        let mut parameters = vec![ParameterView::optional(MAIN_KEY, "Input text", "")];
        parameters.extend(
            self.template_variables()
                .into_iter()
                .filter(|name| !name.eq_ignore_ascii_case(MAIN_KEY))
                .map(|name| ParameterView::optional(name, "", "")),
        );
        parameters
    }

    fn is_semantic(&self) -> bool {
        true
    }

    async fn invoke(&self, mut context: InvocationContext) -> WeftResult<InvocationContext> {
        let prompt = self.engine.render_blocks(&self.blocks, &context).await?;
        debug!("Sending prompt for `{}` to completion backend", self.qualified_name());
        trace!("Prompt: {}", prompt);

        let completion = self.completion.complete(&prompt, &self.settings).await?;
        context.variables.update(completion);
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextVariables;
    use crate::error::WeftError;
    use std::sync::Mutex;

    /// Echoes the prompt back and records it
    #[derive(Default)]
    struct EchoCompletion {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextCompletion for EchoCompletion {
        async fn complete(&self, prompt: &str, settings: &CompletionSettings) -> WeftResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(format!("[{}] {}", settings.max_tokens, prompt))
        }
    }

    #[tokio::test]
    async fn test_renders_template_and_completes() {
        let backend = Arc::new(EchoCompletion::default());
        let function = SemanticFunction::new(
            "writer",
            "summarize",
            "Summarize: {{$input}} for {{$audience}}",
            CompletionSettings::default(),
            backend.clone(),
        )
        .unwrap();

        let mut variables = ContextVariables::with_input("the report");
        variables.set("audience", "kids");
        let result = function
            .invoke(InvocationContext::empty().with_variables(variables))
            .await
            .unwrap();

        assert_eq!(result.result(), "[256] Summarize: the report for kids");
        assert_eq!(
            *backend.prompts.lock().unwrap(),
            vec!["Summarize: the report for kids"]
        );
    }

    #[test]
    fn test_invalid_template_is_rejected() {
        let result = SemanticFunction::new(
            "",
            "broken",
            "{{ 'oops\" }}",
            CompletionSettings::default(),
            Arc::new(EchoCompletion::default()),
        );
        assert!(matches!(result, Err(WeftError::Syntax { .. })));
    }

    #[test]
    fn test_parameters_come_from_template() {
        let function = SemanticFunction::new(
            "writer",
            "letter",
            "To {{$Name}}: {{$input}} {{text.upper $tone}} {{$name}}",
            CompletionSettings::default(),
            Arc::new(EchoCompletion::default()),
        )
        .unwrap()
        .with_description("Write a letter");

        let names: Vec<String> = function.parameters().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["input", "Name", "tone"]);

        let view = function.describe();
        assert!(view.is_semantic);
        assert_eq!(view.description, "Write a letter");
    }

    #[tokio::test]
    async fn test_completion_failure_propagates() {
        struct Unavailable;

        #[async_trait]
        impl TextCompletion for Unavailable {
            async fn complete(&self, _: &str, _: &CompletionSettings) -> WeftResult<String> {
                Err(WeftError::timeout(30))
            }
        }

        let function = SemanticFunction::new(
            "",
            "ask",
            "{{$input}}",
            CompletionSettings::default(),
            Arc::new(Unavailable),
        )
        .unwrap();

        let err = function.invoke(InvocationContext::empty()).await.unwrap_err();
        assert!(matches!(err, WeftError::Timeout { seconds: 30 }));
    }
}
