//! Error types for Weft
//!
//! The engine reports failures through one closed set of error kinds. Every
//! variant carries a human-readable message and, where relevant, the template
//! fragment or step name that caused it. All errors implement `UnifiedError`
//! which exposes:
//! - error_code: A unique identifier for programmatic error handling
//! - message: Human-readable error message
//! - context: Optional additional context about where/why the error occurred

mod constructors;
mod conversions;
mod types;
mod unified_error;

pub use types::{OptionExt, ResultExt, UnifiedError, WeftError, WeftResult};
