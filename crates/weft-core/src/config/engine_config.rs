//! Top-level engine configuration

use super::completion::CompletionSettings;
use super::logging_config::LoggingConfig;
use super::validation::ConfigValidator;
use crate::error::{ResultExt, WeftError, WeftResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Plan execution settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Time limit for a single step; unlimited when unset
    pub step_timeout_secs: Option<u64>,
}

impl PlanConfig {
    /// Step time limit as a `Duration`
    pub fn step_timeout(&self) -> Option<Duration> {
        self.step_timeout_secs.map(Duration::from_secs)
    }
}

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub plan: PlanConfig,
    pub completion: CompletionSettings,
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> WeftResult<Self> {
        let config: EngineConfig =
            toml::from_str(content).context("Failed to parse configuration")?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// Returns the default configuration if the file doesn't exist.
    pub fn from_file(path: &Path) -> WeftResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            WeftError::io_with_path(
                format!("Failed to read config file: {}", e),
                path.display().to_string(),
            )
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            WeftError::Config { message, .. } => WeftError::config_with_context(
                message,
                format!("Loading configuration from '{}'", path.display()),
            ),
            other => other,
        })
    }

    /// Load several TOML files, each layered over the ones before it.
    ///
    /// Missing files are skipped. A later file replaces the plan timeout when
    /// it sets one, and the completion settings when they differ from the
    /// defaults; logging sections are merged field by field.
    pub fn from_layered_files(paths: &[&Path]) -> WeftResult<Self> {
        let mut config = Self::default();
        for path in paths.iter().filter(|path| path.exists()) {
            config.merge(Self::from_file(path)?);
        }
        config.validate()?;
        Ok(config)
    }

    /// Layer `other` on top of this configuration
    pub fn merge(&mut self, other: EngineConfig) {
        if other.plan.step_timeout_secs.is_some() {
            self.plan = other.plan;
        }
        if other.completion != CompletionSettings::default() {
            self.completion = other.completion;
        }
        self.logging.merge(other.logging);
    }

    /// Validate the configuration
    pub fn validate(&self) -> WeftResult<()> {
        ConfigValidator::validate(self)
    }
}
