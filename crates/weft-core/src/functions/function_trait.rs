//! Core Function trait definition

use super::registry::GLOBAL_SKILL;
use super::types::{FunctionView, ParameterView};
use crate::context::InvocationContext;
use crate::error::WeftResult;
use async_trait::async_trait;

/// Base trait for everything a template or plan can call
///
/// A function receives its own [`InvocationContext`] and returns the context
/// holding its result in the main slot. Implementations may freely mutate the
/// variables they receive; callers always pass a copy.
#[async_trait]
pub trait Function: Send + Sync {
    /// Function name, unique within its skill
    fn name(&self) -> &str;

    /// Skill (namespace) the function belongs to
    fn skill_name(&self) -> &str;

    /// Description for planners and function manuals
    fn description(&self) -> &str;

    /// Declared parameters
    fn parameters(&self) -> Vec<ParameterView> {
        Vec::new()
    }

    /// Whether the function is backed by a prompt template
    fn is_semantic(&self) -> bool {
        false
    }

    /// Run the function
    ///
    /// # Errors
    ///
    /// Returns `WeftError` when the function itself fails. Callers annotate
    /// the error with [`Function::qualified_name`].
    async fn invoke(&self, context: InvocationContext) -> WeftResult<InvocationContext>;

    /// `skill.function`, or the bare name for global functions
    fn qualified_name(&self) -> String {
        let skill = self.skill_name();
        if skill.is_empty() || skill == GLOBAL_SKILL {
            self.name().to_string()
        } else {
            format!("{}.{}", skill, self.name())
        }
    }

    /// Metadata view of the function
    fn describe(&self) -> FunctionView {
        FunctionView {
            name: self.name().to_string(),
            skill_name: self.skill_name().to_string(),
            description: self.description().to_string(),
            is_semantic: self.is_semantic(),
            parameters: self.parameters(),
        }
    }
}
