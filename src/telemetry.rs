//! Tracing subscriber installation.

use tracing_subscriber::EnvFilter;

/// Errors raised while installing the global subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The fallback filter directive could not be parsed.
    #[error("invalid log filter: {0}")]
    InvalidFilter(#[from] tracing_subscriber::filter::ParseError),

    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Installs a formatted `tracing` subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise from
/// `default_directive` (for example `"info"` or `"taskflow=debug"`).
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when `default_directive` is
/// needed and malformed, and [`TelemetryError::Install`] when a global
/// subscriber has already been set.
pub fn init_tracing(default_directive: &str) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive)?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|err| TelemetryError::Install(err.to_string()))
}
