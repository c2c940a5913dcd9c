//! Parsing of action-planner answers
//!
//! An action planner asks a model to pick one function for a goal and answer
//! with JSON of the form:
//!
//! ```json
//! {"plan": {"rationale": "...", "function": "Skill.Function", "parameters": {"input": "..."}}}
//! ```

use super::plan::Plan;
use crate::error::{WeftError, WeftResult};
use crate::functions::FunctionRegistry;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ActionPlanAnswer {
    plan: ActionPlanChoice,
}

#[derive(Debug, Deserialize)]
struct ActionPlanChoice {
    #[serde(default)]
    rationale: String,
    #[serde(default)]
    function: String,
    #[serde(default)]
    parameters: IndexMap<String, Value>,
}

/// Build a one-step plan for `goal` from a planner answer.
///
/// Text around the JSON object is ignored. An empty function name yields a
/// plan without steps.
///
/// # Errors
///
/// Returns `Planning` when no valid answer can be read from `text`, and
/// `FunctionNotFound` when the chosen function is not registered.
pub fn parse_action_plan(goal: &str, text: &str, registry: &FunctionRegistry) -> WeftResult<Plan> {
    let json = extract_json_object(text).ok_or_else(|| {
        WeftError::planning_with_context("Planner answer contains no JSON object", text.trim())
    })?;

    let answer: ActionPlanAnswer = serde_json::from_str(json).map_err(|e| {
        WeftError::planning_with_context(format!("Invalid planner answer: {}", e), json)
    })?;
    let choice = answer.plan;

    if !choice.rationale.is_empty() {
        debug!("Planner rationale: {}", choice.rationale);
    }

    let mut plan = Plan::new(goal);
    let function_name = choice.function.trim();
    if function_name.is_empty() {
        debug!("Planner chose no function for goal `{}`", goal);
        return Ok(plan);
    }

    let function = registry.resolve_qualified(function_name)?;
    let mut step = Plan::from_function(function);
    for (name, value) in choice.parameters {
        match value {
            Value::Null => {}
            Value::String(text) => {
                step.parameters.set(name, text);
            }
            other => {
                step.parameters.set(name, other.to_string());
            }
        }
    }

    debug!("Planner chose `{}` for goal `{}`", step.qualified_name(), goal);
    plan.add_step(step)?;
    Ok(plan)
}

fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
