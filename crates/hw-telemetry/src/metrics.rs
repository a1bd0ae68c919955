//! Prometheus metrics owned by the node runtime.
//!
//! Subsystem crates register their own metrics in the default registry when
//! built with their `metrics` feature; `encode_metrics` gathers everything.
//!
//! All metrics follow the naming convention: `hw_<subsystem>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_gauge_vec, Encoder, IntCounter, IntGaugeVec, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Consensus rounds handed to the state validation stage
    pub static ref CONSENSUS_ROUNDS_HANDLED: IntCounter = register_int_counter!(
        "hw_runtime_consensus_rounds_handled_total",
        "Total number of consensus rounds handled by the node runtime"
    )
    .expect("Failed to create CONSENSUS_ROUNDS_HANDLED metric");

    /// Self events handed to the gossip layer
    pub static ref SELF_EVENTS_GOSSIPED: IntCounter = register_int_counter!(
        "hw_runtime_self_events_gossiped_total",
        "Total number of signed self events handed to gossip"
    )
    .expect("Failed to create SELF_EVENTS_GOSSIPED metric");

    /// One-hot gauge of the current platform status
    pub static ref PLATFORM_STATUS: IntGaugeVec = register_int_gauge_vec!(
        "hw_runtime_platform_status",
        "1 for the current platform status, 0 otherwise",
        &["status"]
    )
    .expect("Failed to create PLATFORM_STATUS metric");
}

/// Handle proving the runtime metrics were registered.
#[derive(Debug, Clone, Copy)]
pub struct MetricsHandle {
    _private: (),
}

/// Force registration of the runtime metrics.
pub fn register_metrics() -> MetricsHandle {
    lazy_static::initialize(&CONSENSUS_ROUNDS_HANDLED);
    lazy_static::initialize(&SELF_EVENTS_GOSSIPED);
    lazy_static::initialize(&PLATFORM_STATUS);
    MetricsHandle { _private: () }
}

/// Mark `current` as the active status, clearing `previous`.
pub fn record_platform_status(previous: &str, current: &str) {
    PLATFORM_STATUS.with_label_values(&[previous]).set(0);
    PLATFORM_STATUS.with_label_values(&[current]).set(1);
}

/// Encode every metric in the default registry as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
