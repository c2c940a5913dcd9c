//! Functions callable from templates and plans
//!
//! This module provides the invocation contract shared by the template
//! renderer and the plan executor:
//!
//! - [`Function`] - The trait every callable unit implements
//! - [`NativeFunction`] - A function backed by a Rust closure
//! - [`SemanticFunction`] - A prompt template sent to a completion backend
//! - [`FunctionRegistry`] - Lookup of functions by skill and name
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use weft_core::functions::{FunctionRegistry, NativeFunction};
//!
//! let mut registry = FunctionRegistry::new();
//! registry.register(Arc::new(NativeFunction::from_fn(
//!     "text",
//!     "upper",
//!     "Uppercase the input",
//!     |variables| Ok(variables.input().to_uppercase()),
//! )));
//! assert!(registry.has_function(Some("text"), "upper"));
//! ```

mod function_trait;
mod native;
mod registry;
mod semantic;
mod types;

pub use function_trait::Function;
pub use native::{NativeFunction, NativeHandler};
pub use registry::{FunctionRegistry, RegistryStatistics, GLOBAL_SKILL};
pub use semantic::{SemanticFunction, TextCompletion};
pub use types::{FunctionView, ParameterView};
