//! UnifiedError trait implementation for WeftError

use super::types::{UnifiedError, WeftError};

impl UnifiedError for WeftError {
    fn error_code(&self) -> &str {
        match self {
            Self::Syntax { .. } => "WEFT_SYNTAX",
            Self::FunctionNotFound { .. } => "WEFT_FUNCTION_NOT_FOUND",
            Self::Invocation { .. } => "WEFT_INVOCATION",
            Self::PlanStep { .. } => "WEFT_PLAN_STEP",
            Self::Planning { .. } => "WEFT_PLANNING",
            Self::Config { .. } => "WEFT_CONFIG",
            Self::Io { .. } => "WEFT_IO",
            Self::Timeout { .. } => "WEFT_TIMEOUT",
            Self::Cancelled => "WEFT_CANCELLED",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Syntax { message, .. } => message,
            Self::FunctionNotFound { name, .. } => name,
            Self::Invocation { message, .. } => message,
            Self::PlanStep { step, .. } => step,
            Self::Planning { message, .. } => message,
            Self::Config { message, .. } => message,
            Self::Io { message, .. } => message,
            Self::Timeout { .. } => "Execution timeout",
            Self::Cancelled => "Execution was cancelled",
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            Self::Syntax { fragment, .. } => fragment.as_deref(),
            Self::FunctionNotFound { context, .. } => context.as_deref(),
            Self::Invocation { function, .. } => Some(function),
            Self::PlanStep { step, .. } => Some(step),
            Self::Planning { context, .. } => context.as_deref(),
            Self::Config { context, .. } => context.as_deref(),
            Self::Io { path, .. } => path.as_deref(),
            Self::Timeout { .. } | Self::Cancelled => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(WeftError::syntax("x").error_code(), "WEFT_SYNTAX");
        assert_eq!(
            WeftError::function_not_found("a.b").error_code(),
            "WEFT_FUNCTION_NOT_FOUND"
        );
        assert_eq!(WeftError::Cancelled.error_code(), "WEFT_CANCELLED");
    }

    #[test]
    fn test_nothing_is_retryable_locally() {
        assert!(!WeftError::timeout(5).is_retryable());
        assert!(!WeftError::invocation("a.b", "down").is_retryable());
    }

    #[test]
    fn test_context_reports_step_name() {
        let err = WeftError::plan_step("writer.poem", WeftError::Cancelled);
        assert_eq!(err.context(), Some("writer.poem"));
        assert_eq!(err.message(), "writer.poem");
    }
}
