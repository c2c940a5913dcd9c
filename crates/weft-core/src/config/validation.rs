//! Configuration validation

use super::engine_config::EngineConfig;
use crate::error::{WeftError, WeftResult};
use std::collections::HashSet;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration
    ///
    /// # Errors
    ///
    /// Returns a `Config` error for the first failing check.
    pub fn validate(config: &EngineConfig) -> WeftResult<()> {
        Self::validate_plan(config)?;
        Self::validate_completion(config)?;
        Self::validate_logging(config)?;
        Ok(())
    }

    /// Validate plan execution settings
    pub fn validate_plan(config: &EngineConfig) -> WeftResult<()> {
        if config.plan.step_timeout_secs == Some(0) {
            return Err(WeftError::config(
                "step_timeout_secs must be greater than 0 when set",
            ));
        }
        Ok(())
    }

    /// Validate completion settings
    pub fn validate_completion(config: &EngineConfig) -> WeftResult<()> {
        let completion = &config.completion;

        if !(0.0..=2.0).contains(&completion.temperature) {
            return Err(WeftError::config(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                completion.temperature
            )));
        }

        if !(0.0..=1.0).contains(&completion.top_p) {
            return Err(WeftError::config(format!(
                "top_p must be between 0.0 and 1.0, got {}",
                completion.top_p
            )));
        }

        if completion.max_tokens == 0 {
            return Err(WeftError::config("max_tokens must be greater than 0"));
        }

        Ok(())
    }

    /// Validate logging configuration
    pub fn validate_logging(config: &EngineConfig) -> WeftResult<()> {
        let valid_levels: HashSet<&str> = ["trace", "debug", "info", "warn", "error"]
            .iter()
            .cloned()
            .collect();

        if !valid_levels.contains(config.logging.level.as_str()) {
            return Err(WeftError::config(format!(
                "Invalid log level '{}'. Valid levels are: {:?}",
                config.logging.level, valid_levels
            )));
        }

        let valid_formats: HashSet<&str> = ["json", "pretty", "compact"].iter().cloned().collect();

        if !valid_formats.contains(config.logging.format.as_str()) {
            return Err(WeftError::config(format!(
                "Invalid log format '{}'. Valid formats are: {:?}",
                config.logging.format, valid_formats
            )));
        }

        Ok(())
    }
}
