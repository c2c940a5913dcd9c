//! From trait implementations for WeftError conversions

use super::types::WeftError;

impl From<std::io::Error> for WeftError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for WeftError {
    fn from(error: serde_json::Error) -> Self {
        Self::planning_with_context(error.to_string(), "invalid JSON")
    }
}

impl From<toml::de::Error> for WeftError {
    fn from(error: toml::de::Error) -> Self {
        Self::config_with_context(error.to_string(), "invalid TOML")
    }
}
