//! Weft Core Library
//!
//! This crate provides prompt templating and plan execution: templates with
//! `{{$variables}}` and `{{skill.function $arg}}` calls are rendered against
//! a registry of functions, and plans chain those functions into ordered,
//! stateful workflows.

pub mod config;
pub mod context;
pub mod error;
pub mod functions;
pub mod kernel;
pub mod planning;
pub mod template;

// Re-export commonly used types
pub use config::{CompletionSettings, EngineConfig, LoggingConfig, PlanConfig};
pub use context::{ContextVariables, InvocationContext, MAIN_KEY};
pub use error::{UnifiedError, WeftError, WeftResult};
pub use functions::{
    Function, FunctionRegistry, FunctionView, GLOBAL_SKILL, NativeFunction, ParameterView,
    SemanticFunction, TextCompletion,
};
pub use kernel::Kernel;
pub use planning::{PLAN_RESULT_KEY, Plan, PlanDocument, StepKind, parse_action_plan};
pub use template::{Block, BlockType, PromptTemplateEngine, TemplateTokenizer};
