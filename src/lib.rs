//! Weft: prompt templating and plan orchestration
//!
//! Re-exports [`weft_core`] and adds process-level setup such as logging.
//!
//! ```no_run
//! use weft::{ContextVariables, EngineConfig, Kernel};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = EngineConfig::from_file(std::path::Path::new("weft.toml"))?;
//! weft::logging::init(&config.logging)?;
//!
//! let kernel = Kernel::new(config);
//! let rendered = kernel
//!     .render("Hello {{$input}}", &ContextVariables::with_input("world"))
//!     .await?;
//! assert_eq!(rendered, "Hello world");
//! # Ok(())
//! # }
//! ```

pub mod logging;

pub use weft_core::*;
