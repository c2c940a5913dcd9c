//! Prompt templates
//!
//! Template syntax:
//! - `{{$name}}` - variable substitution
//! - `{{'text'}}` or `{{"text"}}` - quoted literal
//! - `{{skill.function}}` - call a function with the current input
//! - `{{skill.function $arg}}` - call a function with `$arg` as its input

pub mod blocks;
mod engine;
mod tokenizer;

pub use blocks::{Block, BlockType, CodeBlock, FunctionIdBlock, TextBlock, ValBlock, VarBlock};
pub use engine::PromptTemplateEngine;
pub use tokenizer::TemplateTokenizer;
