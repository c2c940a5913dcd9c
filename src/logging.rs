//! Tracing subscriber setup driven by [`LoggingConfig`]

use anyhow::{Result, anyhow, bail};
use tracing_subscriber::EnvFilter;
use weft_core::LoggingConfig;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Nothing is
/// installed when console logging is disabled.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if !config.log_to_console {
        return Ok(());
    }

    let format = config.format.to_ascii_lowercase();
    if !matches!(format.as_str(), "pretty" | "compact" | "json") {
        bail!("Unknown log format `{}` (expected pretty, compact or json)", config.format);
    }

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match format.as_str() {
        "json" => builder.json().try_init(),
        "compact" => builder.compact().try_init(),
        _ => builder.pretty().try_init(),
    };
    installed.map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::debug!("Logging initialised with format `{}`", format);
    Ok(())
}
