//! # Platform Status Metrics
//!
//! Enable with the `metrics` feature.
//!
//! ## Metrics Exported
//!
//! - `hw_platform_status_transitions_total` - Status changes by source and target

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter_vec, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref STATUS_TRANSITIONS: IntCounterVec = register_int_counter_vec!(
        "hw_platform_status_transitions_total",
        "Platform status transitions",
        &["from", "to"]
    )
    .expect("Failed to create STATUS_TRANSITIONS metric");
}

#[cfg(feature = "metrics")]
pub fn record_transition(from: &str, to: &str) {
    STATUS_TRANSITIONS.with_label_values(&[from, to]).inc();
}

#[cfg(not(feature = "metrics"))]
pub fn record_transition(_from: &str, _to: &str) {}
