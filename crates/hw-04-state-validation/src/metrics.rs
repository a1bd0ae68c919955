//! # State Validation Metrics
//!
//! Enable with the `metrics` feature.
//!
//! ## Metrics Exported
//!
//! - `hw_iss_notifications_total` - ISS notifications by type
//! - `hw_state_hash_duration_seconds` - Histogram of state hashing time

use std::time::Duration;

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_histogram, register_int_counter_vec, Histogram, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref ISS_NOTIFICATIONS: IntCounterVec = register_int_counter_vec!(
        "hw_iss_notifications_total",
        "ISS notifications observed, by type",
        &["iss_type"]
    )
    .expect("Failed to create ISS_NOTIFICATIONS metric");

    pub static ref STATE_HASH_DURATION: Histogram = register_histogram!(
        "hw_state_hash_duration_seconds",
        "Time spent computing a state's merkle root",
        vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]
    )
    .expect("Failed to create STATE_HASH_DURATION metric");
}

#[cfg(feature = "metrics")]
pub fn record_iss(iss_type: &str) {
    ISS_NOTIFICATIONS.with_label_values(&[iss_type]).inc();
}

#[cfg(feature = "metrics")]
pub fn observe_state_hash(elapsed: Duration) {
    STATE_HASH_DURATION.observe(elapsed.as_secs_f64());
}

#[cfg(not(feature = "metrics"))]
pub fn record_iss(_iss_type: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn observe_state_hash(_elapsed: Duration) {}
