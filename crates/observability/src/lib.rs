//! Diagnostic sink setup (shared by every binary in the workspace).

/// Initialize the process-wide diagnostic sink.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(config: &ObservabilityConfig) -> Result<(), ObservabilityError> {
    tracing::init(config)
}

/// Sink settings (level directive, output format).
pub mod config;

/// Tracing subscriber installation.
pub mod tracing;

/// Line formatting for the text sink.
pub mod logging;

pub use config::{LogFormat, ObservabilityConfig};
pub use crate::tracing::ObservabilityError;
