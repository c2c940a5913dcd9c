//! JSON form of a plan

use super::plan::{Plan, PlanBody};
use crate::config::PlanConfig;
use crate::context::ContextVariables;
use crate::error::{WeftError, WeftResult};
use crate::functions::FunctionRegistry;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Whether a document node calls a function or holds nested steps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Bound by skill and name when the document is loaded
    Function,
    #[default]
    Steps,
}

/// Serializable description of a plan tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanDocument {
    pub kind: StepKind,
    pub name: String,
    pub skill_name: String,
    pub description: String,
    pub next_step_index: usize,
    pub state: ContextVariables,
    pub parameters: ContextVariables,
    pub outputs: Vec<String>,
    pub steps: Vec<PlanDocument>,
}

impl Plan {
    /// Describe the plan tree, including its progress and state
    pub fn to_document(&self) -> PlanDocument {
        PlanDocument {
            kind: if self.is_function_step() {
                StepKind::Function
            } else {
                StepKind::Steps
            },
            name: self.name.clone(),
            skill_name: self.skill_name.clone(),
            description: self.description.clone(),
            next_step_index: self.next_step_index,
            state: self.state.clone(),
            parameters: self.parameters.clone(),
            outputs: self.outputs.clone(),
            steps: self.steps().iter().map(Plan::to_document).collect(),
        }
    }

    /// Rebuild a plan, binding function steps through `registry`.
    ///
    /// Function steps the registry does not know stay unbound and fail with
    /// `FunctionNotFound` when run.
    ///
    /// # Errors
    ///
    /// Returns a `Planning` error when a cursor is past the end of its steps.
    pub fn from_document(document: PlanDocument, registry: Option<&FunctionRegistry>) -> WeftResult<Self> {
        let body = if document.kind == StepKind::Function {
            let function =
                registry.and_then(|registry| registry.get_function(Some(&document.skill_name), &document.name));
            if function.is_none() {
                warn!(
                    "Plan step `{}.{}` is not bound to a registered function",
                    document.skill_name, document.name
                );
            }
            PlanBody::Function(function)
        } else {
            let steps = document
                .steps
                .into_iter()
                .map(|step| Plan::from_document(step, registry))
                .collect::<WeftResult<Vec<_>>>()?;
            PlanBody::Steps(steps)
        };

        let plan = Plan {
            name: document.name,
            skill_name: document.skill_name,
            description: document.description,
            body,
            state: document.state,
            parameters: document.parameters,
            outputs: document.outputs,
            next_step_index: document.next_step_index,
            config: PlanConfig::default(),
        };

        if plan.next_step_index > plan.step_count() {
            return Err(WeftError::planning_with_context(
                format!(
                    "next_step_index {} exceeds the {} steps of the plan",
                    plan.next_step_index,
                    plan.step_count()
                ),
                plan.qualified_name(),
            ));
        }

        Ok(plan)
    }

    /// Serialize the plan to JSON
    pub fn to_json(&self, pretty: bool) -> WeftResult<String> {
        let document = self.to_document();
        let json = if pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        Ok(json)
    }

    /// Parse a plan from JSON produced by [`Plan::to_json`]
    pub fn from_json(json: &str, registry: Option<&FunctionRegistry>) -> WeftResult<Self> {
        let document: PlanDocument = serde_json::from_str(json)?;
        debug!("Loaded plan document `{}`", document.description);
        Plan::from_document(document, registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::InvocationContext;
    use crate::functions::NativeFunction;
    use std::sync::Arc;

    fn registry() -> FunctionRegistry {
        let mut registry = FunctionRegistry::new();
        registry.register(Arc::new(NativeFunction::from_fn("text", "upper", "Uppercase", |vars| {
            Ok(vars.input().to_uppercase())
        })));
        registry.register(Arc::new(NativeFunction::from_fn("", "echo", "Echo", |vars| {
            Ok(vars.input().to_string())
        })));
        registry
    }

    fn sample_plan(registry: &FunctionRegistry) -> Plan {
        let upper = registry.resolve(Some("text"), "upper").unwrap();
        let echo = registry.resolve(None, "echo").unwrap();
        let mut plan = Plan::with_steps(
            "shout it",
            vec![
                Plan::from_function_with_outputs(upper, vec!["LOUD".to_string()])
                    .with_parameter("input", "$topic"),
                Plan::from_function(echo),
            ],
        );
        plan.state.set("topic", "rust");
        plan
    }

    #[test]
    fn test_json_roundtrip_preserves_structure() {
        let registry = registry();
        let plan = sample_plan(&registry);

        let json = plan.to_json(true).unwrap();
        let restored = Plan::from_json(&json, Some(&registry)).unwrap();

        assert_eq!(restored.to_document(), plan.to_document());
        assert_eq!(restored.steps()[0].qualified_name(), "text.upper");
        assert!(restored.steps()[0].function().is_some());
        assert_eq!(restored.steps()[1].function().unwrap().qualified_name(), "echo");
    }

    #[tokio::test]
    async fn test_named_plan_without_steps_stays_a_plan() {
        let draft = Plan::new("nothing yet").with_name("flows", "draft");

        let mut restored = Plan::from_json(&draft.to_json(false).unwrap(), Some(&registry())).unwrap();

        assert!(!restored.is_function_step());
        assert_eq!(restored.step_count(), 0);
        assert_eq!(restored.qualified_name(), "flows.draft");
        let result = restored
            .execute(InvocationContext::empty().with_variables(ContextVariables::with_input("as is")))
            .await
            .unwrap();
        assert_eq!(result.result(), "as is");
    }

    #[test]
    fn test_document_field_names() {
        let registry = registry();
        let json = sample_plan(&registry).to_json(false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["description"], "shout it");
        assert_eq!(value["kind"], "steps");
        assert_eq!(value["steps"][0]["kind"], "function");
        assert_eq!(value["state"]["topic"], "rust");
        assert_eq!(value["steps"][0]["skill_name"], "text");
        assert_eq!(value["steps"][0]["parameters"]["input"], "$topic");
        assert_eq!(value["steps"][0]["outputs"][0], "LOUD");
        assert_eq!(value["next_step_index"], 0);
    }

    #[tokio::test]
    async fn test_restored_plan_runs() {
        let registry = registry();
        let json = sample_plan(&registry).to_json(false).unwrap();
        let mut restored = Plan::from_json(&json, Some(&registry)).unwrap();

        let result = restored.execute(InvocationContext::empty()).await.unwrap();
        assert_eq!(result.result(), "RUST");
        assert_eq!(restored.state.get("LOUD"), Some("RUST"));
    }

    #[tokio::test]
    async fn test_progress_survives_roundtrip() {
        let registry = registry();
        let mut plan = sample_plan(&registry);
        plan.run_next_step(&InvocationContext::empty()).await.unwrap();

        let restored = Plan::from_json(&plan.to_json(false).unwrap(), Some(&registry)).unwrap();
        assert_eq!(restored.next_step_index(), 1);
        assert_eq!(restored.state.get("LOUD"), Some("RUST"));
    }

    #[tokio::test]
    async fn test_unknown_function_is_unbound_until_run() {
        let json = r#"{
            "description": "goal",
            "steps": [{ "kind": "function", "name": "missing", "skill_name": "ghost" }]
        }"#;
        let mut plan = Plan::from_json(json, Some(&registry())).unwrap();
        assert!(plan.steps()[0].function().is_none());

        let err = plan.execute(InvocationContext::empty()).await.unwrap_err();
        assert_eq!(err.root_cause().to_string(), "Function not found: ghost.missing");
    }

    #[test]
    fn test_invalid_documents() {
        let err = Plan::from_json("{ not json", None).unwrap_err();
        assert!(matches!(err, WeftError::Planning { .. }));

        let err = Plan::from_json(r#"{"description": "x", "next_step_index": 3}"#, None).unwrap_err();
        assert!(matches!(err, WeftError::Planning { .. }));
    }
}
