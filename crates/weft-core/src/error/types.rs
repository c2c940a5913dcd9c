//! Core error types and traits for Weft

use thiserror::Error;

/// Result type alias for Weft operations
pub type WeftResult<T> = Result<T, WeftError>;

/// Unified error trait implemented by every Weft error.
///
/// - error_code(): Unique code for programmatic error identification
/// - message(): Human-readable error message
/// - context(): Optional additional context
pub trait UnifiedError: std::error::Error + Send + Sync {
    /// Get the error code for programmatic handling
    fn error_code(&self) -> &str;

    /// Get the human-readable error message
    fn message(&self) -> &str;

    /// Get optional context about the error
    fn context(&self) -> Option<&str> {
        None
    }

    /// Check if this error is retryable
    fn is_retryable(&self) -> bool {
        false
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<C: std::fmt::Display>(self, context: C) -> WeftResult<T>;

    /// Add context lazily (only evaluated on error)
    fn with_context<C: std::fmt::Display, F: FnOnce() -> C>(self, f: F) -> WeftResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn context<C: std::fmt::Display>(self, context: C) -> WeftResult<T> {
        self.map_err(|e| WeftError::config(format!("{}: {}", context, e)))
    }

    fn with_context<C: std::fmt::Display, F: FnOnce() -> C>(self, f: F) -> WeftResult<T> {
        self.map_err(|e| WeftError::config(format!("{}: {}", f(), e)))
    }
}

/// Extension trait for adding context to Option types
pub trait OptionExt<T> {
    /// Convert a missing function lookup into `FunctionNotFound`
    fn or_function_not_found(self, name: impl Into<String>) -> WeftResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_function_not_found(self, name: impl Into<String>) -> WeftResult<T> {
        self.ok_or_else(|| WeftError::function_not_found(name))
    }
}

/// Main error type for Weft
#[derive(Error, Debug, Clone)]
pub enum WeftError {
    /// A template block failed validation
    #[error("Syntax error: {message}")]
    Syntax {
        message: String,
        /// The offending template fragment
        fragment: Option<String>,
    },

    /// A code block referenced a function the registry does not know
    #[error("Function not found: {name}")]
    FunctionNotFound {
        name: String,
        context: Option<String>,
    },

    /// A registered function failed while running
    #[error("Function '{function}' failed: {message}")]
    Invocation {
        /// Fully-qualified name, `skill.function`
        function: String,
        message: String,
        #[source]
        source: Option<Box<WeftError>>,
    },

    /// A plan step failed; the plan run stops at this step
    #[error("Plan step '{step}' failed: {source}")]
    PlanStep {
        step: String,
        #[source]
        source: Box<WeftError>,
    },

    /// A plan description could not be parsed or bound
    #[error("Planning error: {message}")]
    Planning {
        message: String,
        context: Option<String>,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// A step ran past its deadline
    #[error("Execution timeout after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// The caller cancelled the run
    #[error("Execution was cancelled")]
    Cancelled,
}
