//! # Transaction Pool Metrics
//!
//! Enable with the `metrics` feature:
//! ```toml
//! hw-01-transaction-pool = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `hw_pool_buffered_transactions` - Gauge of buffered transactions by kind
//! - `hw_pool_rejected_total` - Counter of refused submissions by reason
//! - `hw_pool_drained_total` - Counter of transactions drained into events

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge_vec, IntCounter,
    IntCounterVec, IntGaugeVec,
};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref BUFFERED_TRANSACTIONS: IntGaugeVec = register_int_gauge_vec!(
        "hw_pool_buffered_transactions",
        "Number of transactions waiting for inclusion",
        &["kind"]
    )
    .expect("Failed to create BUFFERED_TRANSACTIONS metric");

    pub static ref REJECTED: IntCounterVec = register_int_counter_vec!(
        "hw_pool_rejected_total",
        "Total number of refused transaction submissions",
        &["reason"]
    )
    .expect("Failed to create REJECTED metric");

    pub static ref DRAINED: IntCounter = register_int_counter!(
        "hw_pool_drained_total",
        "Total number of transactions drained into self events"
    )
    .expect("Failed to create DRAINED metric");
}

#[cfg(feature = "metrics")]
pub fn set_buffered(application: usize, system: usize) {
    BUFFERED_TRANSACTIONS
        .with_label_values(&["application"])
        .set(application as i64);
    BUFFERED_TRANSACTIONS
        .with_label_values(&["system"])
        .set(system as i64);
}

#[cfg(feature = "metrics")]
pub fn record_rejection(reason: &str) {
    REJECTED.with_label_values(&[reason]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_drained(count: usize) {
    DRAINED.inc_by(count as u64);
}

// No-op implementations when metrics feature is disabled
#[cfg(not(feature = "metrics"))]
pub fn set_buffered(_application: usize, _system: usize) {}

#[cfg(not(feature = "metrics"))]
pub fn record_rejection(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_drained(_count: usize) {}
