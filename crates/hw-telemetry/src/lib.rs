//! # Hashweave Telemetry
//!
//! Logging and metrics plumbing shared by the node runtime.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hw_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(&config).expect("Failed to init telemetry");
//!
//!     // Logs and metrics are now being collected
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HW_SERVICE_NAME` | `hashweave` | Service name in logs |
//! | `HW_LOG_LEVEL` | `info` | Log level filter |
//! | `HW_JSON_LOGS` | `false` | JSON log lines |
//! | `HW_METRICS_PORT` | `9100` | Prometheus scrape port |
//! | `HW_NETWORK` | `testnet` | Network name |

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::{build_env_filter, init_logging, LoggingGuard};
pub use metrics::{
    encode_metrics, record_platform_status, register_metrics, MetricsHandle,
    CONSENSUS_ROUNDS_HANDLED, PLATFORM_STATUS, SELF_EVENTS_GOSSIPED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics();
    let logging = init_logging(config)?;

    Ok(TelemetryGuard {
        _logging: logging,
        _metrics: metrics,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _logging: LoggingGuard,
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry");
    }
}
