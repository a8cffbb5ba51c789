//! Structured logging for the estimator. One compact line per event, no
//! ANSI, so quote traffic stays grep-able in container logs.

use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Directives appended to the operator level so HTTP plumbing does not
/// drown out calculation events at `debug`.
const QUIET_DEPENDENCIES: &[&str] = &["hyper=warn", "tower=warn"];

#[derive(Debug)]
pub enum TelemetryError {
    Filter { directive: String, source: ParseError },
    AlreadyInitialized(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::Filter { directive, .. } => {
                write!(f, "invalid log filter directive '{directive}'")
            }
            TelemetryError::AlreadyInitialized(err) => {
                write!(f, "logging already initialized: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::Filter { source, .. } => Some(source),
            TelemetryError::AlreadyInitialized(err) => Some(&**err),
        }
    }
}

/// Builds the filter for the configured level with the noisy HTTP
/// dependencies capped at `warn`.
fn build_filter(log_level: &str) -> Result<EnvFilter, TelemetryError> {
    let mut filter = EnvFilter::try_new(log_level).map_err(|source| TelemetryError::Filter {
        directive: log_level.to_string(),
        source,
    })?;
    for directive in QUIET_DEPENDENCIES {
        filter = filter.add_directive(directive.parse().map_err(|source| {
            TelemetryError::Filter {
                directive: directive.to_string(),
                source,
            }
        })?);
    }
    Ok(filter)
}

/// `RUST_LOG` wins outright when set; otherwise the configured level
/// applies.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::AlreadyInitialized)
}
