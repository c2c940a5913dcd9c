//! `[logging]` section

use serde::{Deserialize, Serialize};

/// How the embedding process should install its tracing subscriber
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset: trace, debug, info, warn or error
    pub level: String,
    /// Install a console subscriber at all
    pub log_to_console: bool,
    /// Output style: pretty, compact or json
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_console: true,
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Layer `other` on top of this section.
    ///
    /// Empty strings in `other` keep the current value; the console switch
    /// always follows `other`.
    pub fn merge(&mut self, other: LoggingConfig) {
        let LoggingConfig {
            level,
            log_to_console,
            format,
        } = other;

        if !level.is_empty() {
            self.level = level;
        }
        if !format.is_empty() {
            self.format = format;
        }
        self.log_to_console = log_to_console;
    }
}
