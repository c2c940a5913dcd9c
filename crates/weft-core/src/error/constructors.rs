//! Constructor methods for WeftError

use super::types::WeftError;

impl WeftError {
    /// Create a syntax error for an invalid template block
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
            fragment: None,
        }
    }

    /// Create a syntax error naming the template fragment that failed
    pub fn syntax_in(message: impl Into<String>, fragment: impl Into<String>) -> Self {
        let fragment = fragment.into();
        Self::Syntax {
            message: format!("{} (in `{}`)", message.into(), fragment),
            fragment: Some(fragment),
        }
    }

    /// Create a function-not-found error
    pub fn function_not_found(name: impl Into<String>) -> Self {
        Self::FunctionNotFound {
            name: name.into(),
            context: None,
        }
    }

    /// Create a function-not-found error with context
    pub fn function_not_found_with_context(
        name: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::FunctionNotFound {
            name: name.into(),
            context: Some(context.into()),
        }
    }

    /// Create an invocation failure for a function
    pub fn invocation(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invocation {
            function: function.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an error raised inside a function with its qualified name.
    ///
    /// Errors that already name a function or step are passed through so the
    /// innermost name is preserved.
    pub fn in_function(self, function: impl Into<String>) -> Self {
        match self {
            Self::Invocation { .. } | Self::PlanStep { .. } | Self::Cancelled => self,
            other => Self::Invocation {
                function: function.into(),
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }

    /// Wrap an error as the failure of a plan step
    pub fn plan_step(step: impl Into<String>, source: WeftError) -> Self {
        Self::PlanStep {
            step: step.into(),
            source: Box::new(source),
        }
    }

    /// Create a planning error
    pub fn planning(message: impl Into<String>) -> Self {
        Self::Planning {
            message: message.into(),
            context: None,
        }
    }

    /// Create a planning error with context
    pub fn planning_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Planning {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
        }
    }

    /// Create an IO error with a path
    pub fn io_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a timeout error
    pub fn timeout(seconds: u64) -> Self {
        Self::Timeout { seconds }
    }

    /// The innermost error, following plan step and invocation wrappers
    pub fn root_cause(&self) -> &WeftError {
        match self {
            Self::PlanStep { source, .. } => source.root_cause(),
            Self::Invocation {
                source: Some(source),
                ..
            } => source.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_in_names_fragment() {
        let err = WeftError::syntax_in("A value must use matching quotes", "'abc\"");
        assert_eq!(
            err.to_string(),
            "Syntax error: A value must use matching quotes (in `'abc\"`)"
        );
        match err {
            WeftError::Syntax { fragment, .. } => assert_eq!(fragment.as_deref(), Some("'abc\"")),
            _ => panic!("Expected syntax error"),
        }
    }

    #[test]
    fn test_in_function_wraps_once() {
        let err = WeftError::planning("bad").in_function("writer.poem");
        assert!(matches!(err, WeftError::Invocation { ref function, .. } if function == "writer.poem"));

        let rewrapped = err.clone().in_function("outer.fn");
        assert!(
            matches!(rewrapped, WeftError::Invocation { ref function, .. } if function == "writer.poem")
        );
    }

    #[test]
    fn test_root_cause_unwraps_plan_steps() {
        let inner = WeftError::invocation("text.upper", "boom");
        let err = WeftError::plan_step("plan.outer", WeftError::plan_step("text.upper", inner));
        assert!(matches!(err.root_cause(), WeftError::Invocation { .. }));
        assert!(err.to_string().contains("plan.outer"));
    }
}
