//! Template tokenizer
//!
//! Splits template text into text runs and `{{ ... }}` code spans. Tokenizing
//! never fails: malformed spans produce blocks that fail validation later.

use super::blocks::{
    Block, CodeBlock, FunctionIdBlock, TextBlock, VARIABLE_PREFIX, ValBlock, VarBlock, is_quote,
};

const ESCAPE: char = '\\';

/// Template tokenizer
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateTokenizer;

impl TemplateTokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Tokenize template text into top-level blocks
    pub fn tokenize(&self, text: &str) -> Vec<Block> {
        let mut blocks = Vec::new();
        let chars: Vec<char> = text.chars().collect();
        let mut pos = 0;
        let mut text_start = 0;

        while pos + 1 < chars.len() {
            if chars[pos] == '{' && chars[pos + 1] == '{' {
                let code_start = pos + 2;
                let Some(code_end) = Self::find_closing_braces(&chars, code_start) else {
                    // No closing braces: the rest is literal text
                    break;
                };

                if pos > text_start {
                    let text: String = chars[text_start..pos].iter().collect();
                    blocks.push(Block::Text(TextBlock::new(text)));
                }

                let code: String = chars[code_start..code_end].iter().collect();
                blocks.push(Block::Code(self.tokenize_code(&code)));

                pos = code_end + 2;
                text_start = pos;
            } else {
                pos += 1;
            }
        }

        if text_start < chars.len() {
            let text: String = chars[text_start..].iter().collect();
            blocks.push(Block::Text(TextBlock::new(text)));
        }

        blocks
    }

    /// Split the inside of a code span into value, variable and function tokens
    pub fn tokenize_code(&self, code: &str) -> CodeBlock {
        let chars: Vec<char> = code.trim().chars().collect();
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < chars.len() {
            let c = chars[pos];
            if c.is_whitespace() {
                pos += 1;
                continue;
            }

            let start = pos;
            if is_quote(c) {
                pos = Self::closing_quote(&chars, pos).unwrap_or(chars.len());
                let token: String = chars[start..pos].iter().collect();
                tokens.push(Block::Value(ValBlock::new(token)));
            } else {
                while pos < chars.len() && !chars[pos].is_whitespace() {
                    pos += 1;
                }
                let token: String = chars[start..pos].iter().collect();
                if token.starts_with(VARIABLE_PREFIX) {
                    tokens.push(Block::Variable(VarBlock::new(token)));
                } else {
                    tokens.push(Block::FunctionId(FunctionIdBlock::new(token)));
                }
            }
        }

        CodeBlock::new(code, tokens)
    }

    /// Position just past the quoted value starting at `start`; `None` when
    /// the quote is never closed
    fn closing_quote(chars: &[char], start: usize) -> Option<usize> {
        let quote = chars[start];
        let mut pos = start + 1;

        while pos < chars.len() {
            if chars[pos] == ESCAPE {
                pos += 2;
                continue;
            }
            if chars[pos] == quote {
                return Some(pos + 1);
            }
            pos += 1;
        }

        None
    }

    /// Find the `}}` closing a code span.
    ///
    /// Braces inside quoted values are skipped. When a quote is never closed
    /// the first `}}` after the opening wins, so the span still becomes an
    /// (invalid) code block.
    fn find_closing_braces(chars: &[char], start: usize) -> Option<usize> {
        let mut pos = start;
        while pos + 1 < chars.len() {
            let c = chars[pos];
            if is_quote(c) {
                match Self::closing_quote(chars, pos) {
                    Some(end) => {
                        pos = end;
                        continue;
                    }
                    None => return Self::find_unquoted_closing(chars, start),
                }
            }
            if c == '}' && chars[pos + 1] == '}' {
                return Some(pos);
            }
            pos += 1;
        }
        None
    }

    fn find_unquoted_closing(chars: &[char], start: usize) -> Option<usize> {
        (start..chars.len().saturating_sub(1)).find(|&pos| chars[pos] == '}' && chars[pos + 1] == '}')
    }
}

#[cfg(test)]
#[path = "tokenizer_tests.rs"]
mod tokenizer_tests;
