//! Variable context shared by template rendering and plan execution

mod invocation;
mod variables;

pub use invocation::InvocationContext;
pub use variables::{ContextVariables, MAIN_KEY};
