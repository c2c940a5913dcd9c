//! Template block types
//!
//! A template is tokenized into a flat list of blocks:
//! - Plain text: `Hello `
//! - Variable reference: `$name`
//! - Quoted value: `'text'` or `"text"`
//! - Function reference: `skill.function`
//! - Code span: `{{ skill.function $arg }}`
//!
//! Blocks never fail to construct; validity is checked separately with
//! [`Block::validate`].

mod code;
mod function_id;
mod text;
mod value;
mod variable;

pub use code::CodeBlock;
pub use function_id::FunctionIdBlock;
pub use text::TextBlock;
pub use value::ValBlock;
pub use variable::{VARIABLE_PREFIX, VarBlock};

pub(crate) use value::is_quote;

use crate::context::ContextVariables;
use crate::error::WeftResult;
use std::fmt;

/// Kind of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Text,
    Variable,
    Value,
    FunctionId,
    Code,
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockType::Text => "text",
            BlockType::Variable => "variable",
            BlockType::Value => "value",
            BlockType::FunctionId => "function id",
            BlockType::Code => "code",
        };
        write!(f, "{}", name)
    }
}

/// Blocks that render synchronously from the variables alone
pub trait TextRendering {
    fn render(&self, variables: &ContextVariables) -> String;
}

/// A single parsed unit of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Text(TextBlock),
    Variable(VarBlock),
    Value(ValBlock),
    FunctionId(FunctionIdBlock),
    Code(CodeBlock),
}

impl Block {
    /// The kind of this block
    pub fn block_type(&self) -> BlockType {
        match self {
            Block::Text(_) => BlockType::Text,
            Block::Variable(_) => BlockType::Variable,
            Block::Value(_) => BlockType::Value,
            Block::FunctionId(_) => BlockType::FunctionId,
            Block::Code(_) => BlockType::Code,
        }
    }

    /// Raw source text of the block
    pub fn content(&self) -> &str {
        match self {
            Block::Text(block) => block.content(),
            Block::Variable(block) => block.content(),
            Block::Value(block) => block.content(),
            Block::FunctionId(block) => block.content(),
            Block::Code(block) => block.content(),
        }
    }

    /// Check the block against the template grammar
    ///
    /// # Errors
    ///
    /// Returns `WeftError::Syntax` naming the offending fragment.
    pub fn validate(&self) -> WeftResult<()> {
        match self {
            Block::Text(_) => Ok(()),
            Block::Variable(block) => block.validate(),
            Block::Value(block) => block.validate(),
            Block::FunctionId(block) => block.validate(),
            Block::Code(block) => block.validate(),
        }
    }

    /// Whether [`Block::validate`] succeeds
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Render without calling functions.
    ///
    /// Returns `None` for function references and code blocks.
    pub fn render_text(&self, variables: &ContextVariables) -> Option<String> {
        match self {
            Block::Text(block) => Some(block.render(variables)),
            Block::Variable(block) => Some(block.render(variables)),
            Block::Value(block) => Some(block.render(variables)),
            Block::FunctionId(_) | Block::Code(_) => None,
        }
    }
}

impl From<TextBlock> for Block {
    fn from(block: TextBlock) -> Self {
        Block::Text(block)
    }
}

impl From<VarBlock> for Block {
    fn from(block: VarBlock) -> Self {
        Block::Variable(block)
    }
}

impl From<ValBlock> for Block {
    fn from(block: ValBlock) -> Self {
        Block::Value(block)
    }
}

impl From<FunctionIdBlock> for Block {
    fn from(block: FunctionIdBlock) -> Self {
        Block::FunctionId(block)
    }
}

impl From<CodeBlock> for Block {
    fn from(block: CodeBlock) -> Self {
        Block::Code(block)
    }
}

pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
