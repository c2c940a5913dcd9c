use super::is_identifier_char;
use crate::error::{WeftError, WeftResult};

/// Reference to a function, `skill.function` or `function`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionIdBlock {
    content: String,
    skill_name: Option<String>,
    function_name: String,
}

impl FunctionIdBlock {
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into().trim().to_string();
        let (skill_name, function_name) = match content.split_once('.') {
            Some((skill, function)) => (Some(skill.to_string()), function.to_string()),
            None => (None, content.clone()),
        };
        Self {
            content,
            skill_name,
            function_name,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Skill name; `None` refers to the global functions
    pub fn skill_name(&self) -> Option<&str> {
        self.skill_name.as_deref()
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn validate(&self) -> WeftResult<()> {
        if self.content.is_empty() {
            return Err(WeftError::syntax("The function identifier is empty"));
        }

        if !self.content.chars().all(|c| is_identifier_char(c) || c == '.') {
            return Err(WeftError::syntax_in(
                "The function identifier contains invalid characters. \
                 Only alphanumeric chars, underscore and a single dot are allowed",
                &self.content,
            ));
        }

        if self.content.matches('.').count() > 1 {
            return Err(WeftError::syntax_in(
                "The function identifier can contain at most one dot separating \
                 the skill name from the function name",
                &self.content,
            ));
        }

        let skill_is_empty = self.skill_name.as_deref().is_some_and(str::is_empty);
        if skill_is_empty || self.function_name.is_empty() {
            return Err(WeftError::syntax_in(
                "The skill name and the function name must not be empty",
                &self.content,
            ));
        }

        Ok(())
    }
}
