//! Plan structure

use crate::config::PlanConfig;
use crate::context::ContextVariables;
use crate::error::{WeftError, WeftResult};
use crate::functions::{Function, GLOBAL_SKILL, ParameterView};
use std::fmt;
use std::sync::Arc;

/// State key accumulating the results of steps whose outputs the plan declares
pub const PLAN_RESULT_KEY: &str = "PLAN.RESULT";

/// Skill name given to plans that are not bound to a function
pub const PLAN_SKILL: &str = "plan";

/// Work a plan node performs
#[derive(Clone)]
pub(crate) enum PlanBody {
    /// A single function call; `None` until bound through a registry
    Function(Option<Arc<dyn Function>>),
    /// Nested plans run in order
    Steps(Vec<Plan>),
}

/// A step or sequence of steps with state carried between them
#[derive(Clone)]
pub struct Plan {
    pub(crate) name: String,
    pub(crate) skill_name: String,
    pub(crate) description: String,
    pub(crate) body: PlanBody,
    /// State accumulated while the plan runs
    pub state: ContextVariables,
    /// Inputs for this step; values may reference `$variables`
    pub parameters: ContextVariables,
    /// Result variables copied into the parent's state after this step runs
    pub outputs: Vec<String>,
    pub(crate) next_step_index: usize,
    pub(crate) config: PlanConfig,
}

impl Plan {
    /// An empty plan for `goal`
    pub fn new(goal: impl Into<String>) -> Self {
        Self::with_steps(goal, Vec::new())
    }

    /// A plan for `goal` running `steps` in order
    pub fn with_steps(goal: impl Into<String>, steps: Vec<Plan>) -> Self {
        Self {
            name: String::new(),
            skill_name: PLAN_SKILL.to_string(),
            description: goal.into(),
            body: PlanBody::Steps(steps),
            state: ContextVariables::new(),
            parameters: ContextVariables::new(),
            outputs: Vec::new(),
            next_step_index: 0,
            config: PlanConfig::default(),
        }
    }

    /// A single step calling `function`
    pub fn from_function(function: Arc<dyn Function>) -> Self {
        Self {
            name: function.name().to_string(),
            skill_name: function.skill_name().to_string(),
            description: function.description().to_string(),
            body: PlanBody::Function(Some(function)),
            state: ContextVariables::new(),
            parameters: ContextVariables::new(),
            outputs: Vec::new(),
            next_step_index: 0,
            config: PlanConfig::default(),
        }
    }

    /// A single step calling `function` whose result is published as `outputs`
    pub fn from_function_with_outputs(function: Arc<dyn Function>, outputs: Vec<String>) -> Self {
        let mut plan = Self::from_function(function);
        plan.outputs = outputs;
        plan
    }

    /// A function step not yet bound to a function
    pub(crate) fn unbound(
        skill_name: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let mut plan = Self::new(description);
        plan.skill_name = skill_name.into();
        plan.name = name.into();
        plan.body = PlanBody::Function(None);
        plan
    }

    /// Append a step
    ///
    /// # Errors
    ///
    /// Returns a `Planning` error when called on a single-function step.
    pub fn add_step(&mut self, step: Plan) -> WeftResult<&mut Self> {
        if self.is_function_step() {
            return Err(WeftError::planning_with_context(
                "Cannot add steps to a function step",
                self.qualified_name(),
            ));
        }
        if let PlanBody::Steps(steps) = &mut self.body {
            steps.push(step);
        }
        Ok(self)
    }

    /// Give the plan a name, e.g. to register it as a function
    pub fn with_name(mut self, skill_name: impl Into<String>, name: impl Into<String>) -> Self {
        self.skill_name = skill_name.into();
        self.name = name.into();
        self
    }

    /// Set a step parameter
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.set(key, value);
        self
    }

    /// Apply execution settings to this plan and every nested step
    pub fn set_config(&mut self, config: &PlanConfig) {
        self.config = config.clone();
        if let PlanBody::Steps(steps) = &mut self.body {
            for step in steps {
                step.set_config(config);
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn skill_name(&self) -> &str {
        &self.skill_name
    }

    /// The goal of a plan, or the description of a function step
    pub fn description(&self) -> &str {
        &self.description
    }

    /// `skill.function` for function steps, the skill name for unnamed plans
    pub fn qualified_name(&self) -> String {
        if self.name.is_empty() {
            self.skill_name.clone()
        } else if self.skill_name.is_empty() || self.skill_name == GLOBAL_SKILL {
            self.name.clone()
        } else {
            format!("{}.{}", self.skill_name, self.name)
        }
    }

    /// Nested steps; empty for a function step
    pub fn steps(&self) -> &[Plan] {
        match &self.body {
            PlanBody::Steps(steps) => steps,
            PlanBody::Function(_) => &[],
        }
    }

    /// The function of a function step
    pub fn function(&self) -> Option<&Arc<dyn Function>> {
        match &self.body {
            PlanBody::Function(function) => function.as_ref(),
            PlanBody::Steps(_) => None,
        }
    }

    /// Whether this is a single function step
    pub fn is_function_step(&self) -> bool {
        matches!(self.body, PlanBody::Function(_))
    }

    /// Number of steps; a function step counts as one
    pub fn step_count(&self) -> usize {
        match &self.body {
            PlanBody::Function(_) => 1,
            PlanBody::Steps(steps) => steps.len(),
        }
    }

    pub fn next_step_index(&self) -> usize {
        self.next_step_index
    }

    /// Whether steps remain to run
    pub fn has_next_step(&self) -> bool {
        self.next_step_index < self.step_count()
    }

    /// The aggregate result, falling back to the last step's result
    pub fn result(&self) -> &str {
        match self.state.get_non_empty(PLAN_RESULT_KEY) {
            Some(result) => result,
            None => self.state.input(),
        }
    }

    /// Parameters the step's function declares
    pub(crate) fn declared_parameters(&self) -> Vec<ParameterView> {
        self.function()
            .map(|function| function.parameters())
            .unwrap_or_default()
    }
}

impl fmt::Debug for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plan")
            .field("name", &self.qualified_name())
            .field("description", &self.description)
            .field("steps", &self.steps())
            .field("state", &self.state)
            .field("parameters", &self.parameters)
            .field("outputs", &self.outputs)
            .field("next_step_index", &self.next_step_index)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::NativeFunction;

    fn function(skill: &str, name: &str) -> Arc<dyn Function> {
        Arc::new(NativeFunction::from_fn(skill, name, "Does a thing", |vars| {
            Ok(vars.input().to_string())
        }))
    }

    #[test]
    fn test_function_step_counts_as_one() {
        let step = Plan::from_function(function("text", "upper"));
        assert!(step.is_function_step());
        assert_eq!(step.step_count(), 1);
        assert!(step.has_next_step());
        assert_eq!(step.qualified_name(), "text.upper");
        assert_eq!(step.description(), "Does a thing");
    }

    #[test]
    fn test_goal_plan_without_steps_is_complete() {
        let plan = Plan::new("nothing to do");
        assert!(!plan.is_function_step());
        assert_eq!(plan.step_count(), 0);
        assert!(!plan.has_next_step());
        assert_eq!(plan.qualified_name(), PLAN_SKILL);
    }

    #[test]
    fn test_add_step() {
        let mut plan = Plan::new("goal");
        plan.add_step(Plan::from_function(function("", "echo"))).unwrap();
        plan.add_step(Plan::from_function(function("text", "upper"))).unwrap();
        assert_eq!(plan.step_count(), 2);
        assert_eq!(plan.steps()[0].qualified_name(), "echo");

        let mut leaf = Plan::from_function(function("", "echo"));
        assert!(leaf.add_step(Plan::new("nested")).is_err());
    }

    #[test]
    fn test_result_prefers_aggregate_slot() {
        let mut plan = Plan::new("goal");
        plan.state.update("last");
        assert_eq!(plan.result(), "last");

        plan.state.set(PLAN_RESULT_KEY, "aggregate");
        assert_eq!(plan.result(), "aggregate");
    }

    #[test]
    fn test_set_config_reaches_nested_steps() {
        let nested = Plan::with_steps("inner", vec![Plan::from_function(function("", "echo"))]);
        let mut plan = Plan::with_steps("outer", vec![nested]);
        plan.set_config(&PlanConfig {
            step_timeout_secs: Some(3),
        });
        assert_eq!(plan.steps()[0].steps()[0].config.step_timeout_secs, Some(3));
    }
}
