use super::{Block, BlockType};
use crate::error::{WeftError, WeftResult};

/// The contents of a `{{ ... }}` span
///
/// Holds one or two tokens: a value, a variable, or a function id optionally
/// followed by a single value or variable argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    content: String,
    tokens: Vec<Block>,
}

impl CodeBlock {
    pub fn new(content: impl Into<String>, tokens: Vec<Block>) -> Self {
        Self {
            content: content.into().trim().to_string(),
            tokens,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tokens(&self) -> &[Block] {
        &self.tokens
    }

    /// The argument passed to the function, if any
    pub fn argument(&self) -> Option<&Block> {
        self.tokens.get(1)
    }

    /// Whether the block calls a function
    pub fn is_function_call(&self) -> bool {
        matches!(self.tokens.first(), Some(Block::FunctionId(_)))
    }

    pub fn validate(&self) -> WeftResult<()> {
        let Some(first) = self.tokens.first() else {
            return Err(WeftError::syntax_in(
                "A code block must contain a value, a variable or a function call",
                format!("{{{{{}}}}}", self.content),
            ));
        };

        for token in &self.tokens {
            token.validate()?;
        }

        if self.tokens.len() > 1 {
            if first.block_type() != BlockType::FunctionId {
                return Err(WeftError::syntax_in(
                    format!("Unexpected second token found: {}", self.tokens[1].content()),
                    &self.content,
                ));
            }

            let second = self.tokens[1].block_type();
            if second != BlockType::Value && second != BlockType::Variable {
                return Err(WeftError::syntax_in(
                    "Functions support only one parameter, a value or a variable",
                    &self.content,
                ));
            }
        }

        if self.tokens.len() > 2 {
            return Err(WeftError::syntax_in(
                "Functions support only one parameter",
                &self.content,
            ));
        }

        Ok(())
    }
}
