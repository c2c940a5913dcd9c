//! Configuration for template rendering, plan execution and logging
//!
//! Configuration is read from TOML. Every section is optional and falls back
//! to its defaults:
//!
//! ```toml
//! [plan]
//! step_timeout_secs = 30
//!
//! [completion]
//! max_tokens = 512
//! temperature = 0.2
//!
//! [logging]
//! level = "debug"
//! format = "compact"
//! ```

mod completion;
mod engine_config;
mod logging_config;
mod validation;

pub use completion::CompletionSettings;
pub use engine_config::{EngineConfig, PlanConfig};
pub use logging_config::LoggingConfig;
pub use validation::ConfigValidator;
