use super::TextRendering;
use crate::context::ContextVariables;

/// Literal text between code spans
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    content: String,
}

impl TextBlock {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl TextRendering for TextBlock {
    fn render(&self, _variables: &ContextVariables) -> String {
        self.content.clone()
    }
}
