//! Tracing subscriber initialization.
//!
//! The level filter comes from the config, never from the environment.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, ObservabilityConfig};
use crate::logging::LineFormat;

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("invalid log level directive {directive:?}: {source}")]
    InvalidFilter {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
}

/// Install the global subscriber.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(config: &ObservabilityConfig) -> Result<(), ObservabilityError> {
    let filter = EnvFilter::try_new(&config.level).map_err(|source| {
        ObservabilityError::InvalidFilter {
            directive: config.level.clone(),
            source,
        }
    })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    // A subscriber may already be installed (tests, repeated init).
    let _ = match config.format {
        LogFormat::Text => builder.event_format(LineFormat).try_init(),
        LogFormat::Json => builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .try_init(),
    };

    Ok(())
}
