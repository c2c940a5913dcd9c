//! Plans: ordered, stateful sequences of function calls
//!
//! A [`Plan`] is either a single function step or an ordered list of nested
//! plans. Executing a plan runs its steps one at a time, carrying a state
//! across steps and folding each step's declared outputs back into it.
//!
//! Plans can be stepped manually with [`Plan::run_next_step`], drained with
//! [`Plan::execute`], serialized to JSON, or parsed from an action-planner
//! answer with [`parse_action_plan`].

mod action_plan;
mod document;
mod executor;
mod plan;

pub use action_plan::parse_action_plan;
pub use document::{PlanDocument, StepKind};
pub use plan::{PLAN_RESULT_KEY, PLAN_SKILL, Plan};
