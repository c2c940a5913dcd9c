//! Plan execution
//!
//! Steps run strictly one after another. Each step receives its own variables
//! built from the step parameters, the caller's variables and the plan state;
//! only declared outputs flow back into the state.

use super::plan::{PLAN_RESULT_KEY, Plan, PlanBody};
use crate::context::{ContextVariables, InvocationContext, MAIN_KEY};
use crate::error::{WeftError, WeftResult};
use crate::functions::{Function, ParameterView};
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use regex::{Captures, Regex};
use std::future::Future;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

static VARIABLE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\w+)").expect("variable reference pattern is valid"));

impl Plan {
    /// Run the next step and fold its result into the plan state.
    ///
    /// Does nothing once the plan is complete.
    ///
    /// # Errors
    ///
    /// Returns `WeftError::PlanStep` naming the failed step. The cursor stays
    /// on the failed step and state committed by earlier steps is kept.
    pub async fn run_next_step(&mut self, context: &InvocationContext) -> WeftResult<()> {
        if !self.has_next_step() {
            debug!("Plan `{}` has no remaining steps", self.qualified_name());
            return Ok(());
        }

        let index = self.next_step_index;
        let (step_name, step_outputs, step_variables) = {
            let step = self.step_at(index);
            (
                step.qualified_name(),
                step.outputs.clone(),
                self.step_variables(&context.variables, step),
            )
        };

        debug!(
            "Running step {}/{} of plan `{}`: {}",
            index + 1,
            self.step_count(),
            self.qualified_name(),
            step_name
        );

        let step_context = context.with_variables(step_variables);
        let timeout_secs = self.config.step_timeout_secs;
        let future: BoxFuture<'_, WeftResult<InvocationContext>> = match &mut self.body {
            PlanBody::Function(function) => {
                invoke_function(function.clone(), step_name.clone(), step_context)
            }
            PlanBody::Steps(steps) => steps[index].invoke_step(step_context),
        };

        let result = match with_step_timeout(future, timeout_secs).await {
            Ok(result) => result,
            Err(e) => {
                error!("Plan step `{}` failed: {}", step_name, e);
                return Err(WeftError::plan_step(step_name, e));
            }
        };

        self.apply_step_result(&result, &step_outputs);
        self.next_step_index += 1;
        Ok(())
    }

    /// Run every remaining step.
    ///
    /// After each step the caller variables receive the plan result in the
    /// main slot plus the declared outputs, so the next step sees them.
    pub fn execute(&mut self, context: InvocationContext) -> BoxFuture<'_, WeftResult<InvocationContext>> {
        self.drain(context, None).boxed()
    }

    /// Run every remaining step, stopping when `cancel` fires.
    ///
    /// Steps that already finished keep their effect on the plan state.
    pub async fn execute_with_cancellation(
        &mut self,
        context: InvocationContext,
        cancel: &CancellationToken,
    ) -> WeftResult<InvocationContext> {
        self.drain(context, Some(cancel)).await
    }

    async fn drain(
        &mut self,
        mut context: InvocationContext,
        cancel: Option<&CancellationToken>,
    ) -> WeftResult<InvocationContext> {
        debug!(
            "Executing plan `{}` from step {} of {}",
            self.qualified_name(),
            self.next_step_index,
            self.step_count()
        );

        while self.has_next_step() {
            context.variables.merge(&self.state, false);

            match cancel {
                Some(token) => {
                    if token.is_cancelled() {
                        warn!(
                            "Plan `{}` cancelled before step {}",
                            self.qualified_name(),
                            self.next_step_index + 1
                        );
                        return Err(WeftError::Cancelled);
                    }
                    tokio::select! {
                        _ = token.cancelled() => {
                            warn!(
                                "Plan `{}` cancelled during step {}",
                                self.qualified_name(),
                                self.next_step_index + 1
                            );
                            return Err(WeftError::Cancelled);
                        }
                        outcome = self.run_next_step(&context) => outcome?,
                    }
                }
                None => self.run_next_step(&context).await?,
            }

            self.publish_outputs(&mut context.variables);
        }

        info!("Plan `{}` completed", self.qualified_name());
        Ok(context)
    }

    /// Invoke this node as a step of its parent
    fn invoke_step(&mut self, context: InvocationContext) -> BoxFuture<'_, WeftResult<InvocationContext>> {
        if let PlanBody::Function(function) = &self.body {
            return invoke_function(function.clone(), self.qualified_name(), context);
        }
        self.execute(context)
    }

    fn step_at(&self, index: usize) -> &Plan {
        match &self.body {
            PlanBody::Function(_) => self,
            PlanBody::Steps(steps) => &steps[index],
        }
    }

    /// Build the variables a step is invoked with.
    ///
    /// Input priority: the step's own `input` parameter (expanded), the
    /// caller's input, the plan state's input, nothing for nested plans, and
    /// finally the step description.
    fn step_variables(&self, caller: &ContextVariables, step: &Plan) -> ContextVariables {
        let input = if let Some(value) = step.parameters.get_non_empty(MAIN_KEY) {
            self.expand_from_variables(caller, value)
        } else if let Some(value) = caller.get_non_empty(MAIN_KEY) {
            value.to_string()
        } else if let Some(value) = self.state.get_non_empty(MAIN_KEY) {
            value.to_string()
        } else if !step.is_function_step() {
            String::new()
        } else {
            step.description.clone()
        };

        let mut variables = ContextVariables::with_input(input);

        for parameter in step.declared_parameters() {
            if parameter.name.eq_ignore_ascii_case(MAIN_KEY) {
                continue;
            }
            let value = caller
                .get_non_empty(&parameter.name)
                .or_else(|| self.state.get_non_empty(&parameter.name));
            if let Some(value) = value {
                variables.set(parameter.name.clone(), value);
            }
        }

        for (key, value) in step.parameters.iter() {
            if variables.get_non_empty(key).is_some() {
                continue;
            }

            let expanded = self.expand_from_variables(caller, value);
            let resolved = if expanded != value {
                expanded
            } else if let Some(found) = caller.get_non_empty(key) {
                found.to_string()
            } else if let Some(found) = self.state.get_non_empty(key) {
                found.to_string()
            } else {
                expanded
            };
            variables.set(key, resolved);
        }

        variables
    }

    /// Replace `$name` references with caller variables, then plan state
    fn expand_from_variables(&self, caller: &ContextVariables, text: &str) -> String {
        VARIABLE_REFERENCE
            .replace_all(text, |captures: &Captures| {
                let name = &captures[1];
                caller
                    .get_non_empty(name)
                    .or_else(|| self.state.get_non_empty(name))
                    .unwrap_or_default()
                    .to_string()
            })
            .into_owned()
    }

    fn apply_step_result(&mut self, result: &InvocationContext, step_outputs: &[String]) {
        let value = result.result().trim().to_string();
        self.state.update(value.clone());

        let contributes = step_outputs
            .iter()
            .any(|output| self.outputs.iter().any(|declared| declared.eq_ignore_ascii_case(output)));
        if contributes {
            let current = self.state.get(PLAN_RESULT_KEY).unwrap_or_default().trim();
            let aggregate = if current.is_empty() {
                value.clone()
            } else {
                format!("{}\n{}", current, value)
            };
            self.state.set(PLAN_RESULT_KEY, aggregate);
        }

        for output in step_outputs {
            let output_value = result
                .variables
                .get_non_empty(output)
                .unwrap_or(&value)
                .to_string();
            self.state.set(output.clone(), output_value);
        }
    }

    /// Copy the plan result and every declared output from state into `variables`
    fn publish_outputs(&self, variables: &mut ContextVariables) {
        variables.update(self.result().to_string());

        let step_outputs = self.steps().iter().flat_map(|step| step.outputs.iter());
        for output in self.outputs.iter().chain(step_outputs) {
            if let Some(value) = self.state.get(output) {
                variables.set(output.clone(), value);
            }
        }
    }
}

fn invoke_function(
    function: Option<Arc<dyn Function>>,
    name: String,
    context: InvocationContext,
) -> BoxFuture<'static, WeftResult<InvocationContext>> {
    async move {
        let function = function.ok_or_else(|| {
            WeftError::function_not_found_with_context(
                name.clone(),
                "Plan step is not bound to a registered function",
            )
        })?;
        function.invoke(context).await.map_err(|e| e.in_function(name))
    }
    .boxed()
}

async fn with_step_timeout<F>(future: F, timeout_secs: Option<u64>) -> WeftResult<InvocationContext>
where
    F: Future<Output = WeftResult<InvocationContext>>,
{
    match timeout_secs {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), future)
            .await
            .map_err(|_| WeftError::timeout(secs))?,
        None => future.await,
    }
}

#[async_trait]
impl Function for Plan {
    fn name(&self) -> &str {
        &self.name
    }

    fn skill_name(&self) -> &str {
        &self.skill_name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> Vec<ParameterView> {
        self.declared_parameters()
    }

    fn qualified_name(&self) -> String {
        Plan::qualified_name(self)
    }

    /// Run a fresh copy so the registered plan can be called repeatedly
    async fn invoke(&self, context: InvocationContext) -> WeftResult<InvocationContext> {
        let mut plan = self.clone();
        plan.execute(context).await
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod executor_tests;
