//! # Telemetry
//!
//! Installs the global `tracing` subscriber.
//!
//! ## Log Levels
//! - `RUST_LOG` wins when set (e.g. `RUST_LOG=stockroom_core=trace`)
//! - otherwise `logging.filter` from [`LoggingSettings`]
//! - default: `info,stockroom=debug`

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingSettings};
use crate::error::{RuntimeError, RuntimeResult};

/// Builds the filter: `RUST_LOG` first, then the configured directive.
pub fn env_filter(settings: &LoggingSettings) -> RuntimeResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.filter)
            .map_err(|e| RuntimeError::Telemetry(format!("bad filter '{}': {}", settings.filter, e))),
    }
}

/// Installs a fmt subscriber for the whole process.
///
/// Returns an error instead of panicking when a global subscriber is
/// already set.
pub fn init_tracing(settings: &LoggingSettings) -> RuntimeResult<()> {
    let filter = env_filter(settings)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = match settings.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    result.map_err(|e| RuntimeError::Telemetry(e.to_string()))
}
