//! Structured logging setup.
//!
//! One global `tracing` subscriber per process: an `EnvFilter` built from
//! `RUST_LOG` (or the configured level) and either a human-readable or a JSON
//! `fmt` layer. JSON lines carry `timestamp`, `level`, `target`, `fields`
//! and the current span list, ready for a log shipper.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Marker returned once the global subscriber is installed.
#[derive(Debug)]
pub struct LoggingGuard {
    pub(crate) json: bool,
}

impl LoggingGuard {
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Build the filter from `RUST_LOG`, falling back to `config.log_level`.
pub fn build_env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::Config(format!("invalid log filter: {e}")))
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed, which happens when two
/// runtimes share a process (tests).
pub fn init_logging(config: &TelemetryConfig) -> Result<LoggingGuard, TelemetryError> {
    let env_filter = build_env_filter(config)?;

    if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_current_span(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    tracing::debug!(
        service = %config.full_service_name(),
        json_logs = config.json_logs,
        "Structured logging initialised"
    );

    Ok(LoggingGuard {
        json: config.json_logs,
    })
}
