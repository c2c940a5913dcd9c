//! Prompt template engine
//!
//! Renders templates against an [`InvocationContext`], calling registered
//! functions for `{{ skill.function $arg }}` spans.

use super::blocks::{Block, CodeBlock, FunctionIdBlock, TextBlock};
use super::tokenizer::TemplateTokenizer;
use crate::context::{ContextVariables, InvocationContext};
use crate::error::{WeftError, WeftResult};
use tracing::{debug, trace, warn};

/// Template engine that tokenizes and renders prompt templates
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptTemplateEngine {
    tokenizer: TemplateTokenizer,
}

impl PromptTemplateEngine {
    /// Create a new engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize `text`, optionally validating every block
    ///
    /// # Errors
    ///
    /// With `validate` set, returns the first block's `Syntax` error.
    pub fn extract_blocks(&self, text: &str, validate: bool) -> WeftResult<Vec<Block>> {
        trace!("Extracting blocks from template ({} chars)", text.len());
        let blocks = self.tokenizer.tokenize(text);

        if validate {
            Self::validate_blocks(&blocks)?;
        }

        Ok(blocks)
    }

    /// Render template text
    pub async fn render(&self, text: &str, context: &InvocationContext) -> WeftResult<String> {
        let blocks = self.extract_blocks(text, true)?;
        self.render_blocks(&blocks, context).await
    }

    /// Render blocks in order, awaiting each function call before the next block.
    ///
    /// Every block is validated before anything is rendered, so a syntax error
    /// never leaves the side effects of earlier function calls behind.
    pub async fn render_blocks(
        &self,
        blocks: &[Block],
        context: &InvocationContext,
    ) -> WeftResult<String> {
        Self::validate_blocks(blocks)?;

        let mut result = String::new();
        for block in blocks {
            match block {
                Block::Code(code) => result.push_str(&self.render_code(code, context).await?),
                Block::FunctionId(function_id) => {
                    result.push_str(&self.render_function_call(function_id, None, context).await?)
                }
                other => {
                    if let Some(text) = other.render_text(&context.variables) {
                        result.push_str(&text);
                    }
                }
            }
        }

        trace!("Rendered template: {}", result);
        Ok(result)
    }

    /// Resolve variables and values, leaving code blocks that call functions.
    ///
    /// Adjacent text is not merged; each resolved block becomes a text block.
    pub fn render_variables(&self, blocks: &[Block], variables: &ContextVariables) -> Vec<Block> {
        blocks
            .iter()
            .map(|block| match block {
                Block::Variable(_) | Block::Value(_) => block
                    .render_text(variables)
                    .map(|text| Block::Text(TextBlock::new(text)))
                    .unwrap_or_else(|| block.clone()),
                Block::Code(code) if !code.is_function_call() => match code.tokens().first() {
                    Some(token) if token.is_valid() => token
                        .render_text(variables)
                        .map(|text| Block::Text(TextBlock::new(text)))
                        .unwrap_or_else(|| block.clone()),
                    _ => block.clone(),
                },
                _ => block.clone(),
            })
            .collect()
    }

    async fn render_code(&self, code: &CodeBlock, context: &InvocationContext) -> WeftResult<String> {
        match code.tokens() {
            [Block::FunctionId(function_id)] => {
                self.render_function_call(function_id, None, context).await
            }
            [Block::FunctionId(function_id), argument] => {
                self.render_function_call(function_id, Some(argument), context).await
            }
            [token] => token
                .render_text(&context.variables)
                .ok_or_else(|| WeftError::syntax_in("Unexpected token", code.content())),
            _ => Err(WeftError::syntax_in("Invalid code block", code.content())),
        }
    }

    async fn render_function_call(
        &self,
        function_id: &FunctionIdBlock,
        argument: Option<&Block>,
        context: &InvocationContext,
    ) -> WeftResult<String> {
        let function = context
            .functions()
            .get_function(function_id.skill_name(), function_id.function_name())
            .ok_or_else(|| {
                warn!("Function `{}` not found", function_id.content());
                WeftError::function_not_found_with_context(
                    function_id.content(),
                    "Referenced by a template code block",
                )
            })?;

        let mut variables = context.variables.clone();
        if let Some(argument) = argument {
            let input = argument.render_text(&variables).unwrap_or_default();
            variables.update(input);
        }

        let name = function.qualified_name();
        debug!("Calling function `{}` from template", name);

        let result = function
            .invoke(context.with_variables(variables))
            .await
            .map_err(|e| e.in_function(&name))?;

        Ok(result.result().to_string())
    }

    fn validate_blocks(blocks: &[Block]) -> WeftResult<()> {
        for block in blocks {
            if let Err(e) = block.validate() {
                warn!("Invalid template block `{}`: {}", block.content(), e);
                return Err(e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
