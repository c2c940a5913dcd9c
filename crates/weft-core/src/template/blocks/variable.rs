use super::{TextRendering, is_identifier_char};
use crate::context::ContextVariables;
use crate::error::{WeftError, WeftResult};
use tracing::warn;

/// Variable prefix inside code spans
pub const VARIABLE_PREFIX: char = '$';

/// Reference to a variable, `$name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarBlock {
    content: String,
    name: String,
}

impl VarBlock {
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into().trim().to_string();
        let name = content
            .strip_prefix(VARIABLE_PREFIX)
            .unwrap_or_default()
            .to_string();
        Self { content, name }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Variable name without the `$` prefix
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn validate(&self) -> WeftResult<()> {
        if !self.content.starts_with(VARIABLE_PREFIX) {
            return Err(WeftError::syntax_in(
                format!("A variable must start with the symbol {}", VARIABLE_PREFIX),
                &self.content,
            ));
        }

        if self.name.is_empty() {
            return Err(WeftError::syntax_in("The variable name is empty", &self.content));
        }

        if !self.name.chars().all(is_identifier_char) {
            return Err(WeftError::syntax_in(
                format!(
                    "The variable name '{}' contains invalid characters. \
                     Only alphanumeric chars and underscore are allowed",
                    self.name
                ),
                &self.content,
            ));
        }

        Ok(())
    }
}

impl TextRendering for VarBlock {
    fn render(&self, variables: &ContextVariables) -> String {
        match variables.get(&self.name) {
            Some(value) => value.to_string(),
            None => {
                warn!("Variable `{}{}` not found", VARIABLE_PREFIX, self.name);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_from_variables() {
        let mut variables = ContextVariables::new();
        variables.set("City", "Seattle");

        let block = VarBlock::new(" $city ");
        assert_eq!(block.name(), "city");
        assert_eq!(block.render(&variables), "Seattle");
    }

    #[test]
    fn test_missing_variable_renders_empty() {
        let block = VarBlock::new("$absent");
        assert!(block.validate().is_ok());
        assert_eq!(block.render(&ContextVariables::new()), "");
    }

    #[test]
    fn test_invalid_names() {
        assert!(VarBlock::new("$").validate().is_err());
        assert!(VarBlock::new("$a-b").validate().is_err());
        assert!(VarBlock::new("name").validate().is_err());
        assert!(VarBlock::new("$first_name2").validate().is_ok());
    }
}
