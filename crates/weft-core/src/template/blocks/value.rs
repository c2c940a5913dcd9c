use super::TextRendering;
use crate::context::ContextVariables;
use crate::error::{WeftError, WeftResult};

const SINGLE_QUOTE: char = '\'';
const DOUBLE_QUOTE: char = '"';
const ESCAPE: char = '\\';

pub(crate) fn is_quote(c: char) -> bool {
    c == SINGLE_QUOTE || c == DOUBLE_QUOTE
}

/// A quoted literal, `'text'` or `"text"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValBlock {
    content: String,
    value: String,
}

impl ValBlock {
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into().trim().to_string();
        let value = unescape(&content);
        Self { content, value }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// The literal without quotes, escapes resolved
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The quote character the literal opens with
    pub fn quote(&self) -> Option<char> {
        self.content.chars().next().filter(|c| is_quote(*c))
    }

    pub fn validate(&self) -> WeftResult<()> {
        let chars: Vec<char> = self.content.chars().collect();

        if chars.len() < 2 {
            return Err(WeftError::syntax_in(
                "A value must have single quotes or double quotes on both sides",
                &self.content,
            ));
        }

        let first = chars[0];
        let last = chars[chars.len() - 1];

        if !is_quote(first) || !is_quote(last) {
            return Err(WeftError::syntax_in(
                "A value must have single quotes or double quotes on both sides",
                &self.content,
            ));
        }

        if first != last {
            return Err(WeftError::syntax_in(
                "A value must be defined using either single quotes or double quotes, not both",
                &self.content,
            ));
        }

        // Odd number of backslashes before the last quote means it is escaped
        let escapes = chars[1..chars.len() - 1]
            .iter()
            .rev()
            .take_while(|c| **c == ESCAPE)
            .count();
        if escapes % 2 == 1 {
            return Err(WeftError::syntax_in("The value is not terminated", &self.content));
        }

        Ok(())
    }
}

impl TextRendering for ValBlock {
    fn render(&self, _variables: &ContextVariables) -> String {
        self.value.clone()
    }
}

fn unescape(content: &str) -> String {
    let mut chars = content.chars();
    let Some(quote) = chars.next().filter(|c| is_quote(*c)) else {
        return String::new();
    };

    let inner: Vec<char> = chars.collect();
    let end = match inner.last() {
        Some(c) if *c == quote => inner.len() - 1,
        _ => inner.len(),
    };

    let mut value = String::with_capacity(end);
    let mut pos = 0;
    while pos < end {
        if inner[pos] == ESCAPE && pos + 1 < end {
            value.push(inner[pos + 1]);
            pos += 2;
        } else {
            value.push(inner[pos]);
            pos += 1;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_and_double_quotes() {
        let single = ValBlock::new("'hello'");
        let double = ValBlock::new("\"hello\"");

        assert!(single.validate().is_ok());
        assert!(double.validate().is_ok());
        assert_eq!(single.value(), "hello");
        assert_eq!(double.value(), "hello");
        assert_eq!(single.quote(), Some('\''));
        assert_eq!(double.quote(), Some('"'));
    }

    #[test]
    fn test_escaped_quotes() {
        let block = ValBlock::new(r#"'it\'s'"#);
        assert!(block.validate().is_ok());
        assert_eq!(block.value(), "it's");

        let block = ValBlock::new(r#""a \\ b""#);
        assert_eq!(block.value(), r"a \ b");
    }

    #[test]
    fn test_empty_value() {
        let block = ValBlock::new("''");
        assert!(block.validate().is_ok());
        assert_eq!(block.value(), "");
    }

    #[test]
    fn test_invalid_values() {
        assert!(ValBlock::new("'abc\"").validate().is_err());
        assert!(ValBlock::new("'abc").validate().is_err());
        assert!(ValBlock::new("'").validate().is_err());
        assert!(ValBlock::new(r"'abc\'").validate().is_err());
    }

    #[test]
    fn test_mismatched_quotes_message() {
        let err = ValBlock::new("'abc\"").validate().unwrap_err();
        assert!(err.to_string().contains("not both"));
    }
}
