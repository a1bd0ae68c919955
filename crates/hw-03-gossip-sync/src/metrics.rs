//! # Gossip Sync Metrics
//!
//! Enable with the `metrics` feature:
//! ```toml
//! hw-03-gossip-sync = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `hw_sync_has_fallen_behind` - 1 while this node is behind, else 0
//! - `hw_sync_num_reported_fallen_behind` - Peers currently reporting us behind
//! - `hw_sync_status_total` - Counter of handshake comparisons by result

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter_vec, register_int_gauge, IntCounterVec, IntGauge};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref HAS_FALLEN_BEHIND: IntGauge = register_int_gauge!(
        "hw_sync_has_fallen_behind",
        "1 while this node has fallen behind its peers"
    )
    .expect("Failed to create HAS_FALLEN_BEHIND metric");

    pub static ref NUM_REPORTED_FALLEN_BEHIND: IntGauge = register_int_gauge!(
        "hw_sync_num_reported_fallen_behind",
        "Number of peers that reported this node fallen behind"
    )
    .expect("Failed to create NUM_REPORTED_FALLEN_BEHIND metric");

    pub static ref SYNC_STATUS: IntCounterVec = register_int_counter_vec!(
        "hw_sync_status_total",
        "Sync handshake window comparisons by result",
        &["result"]
    )
    .expect("Failed to create SYNC_STATUS metric");
}

#[cfg(feature = "metrics")]
pub fn set_fallen_behind(has_fallen_behind: bool, reported: usize) {
    HAS_FALLEN_BEHIND.set(i64::from(has_fallen_behind));
    NUM_REPORTED_FALLEN_BEHIND.set(reported as i64);
}

#[cfg(feature = "metrics")]
pub fn record_sync_status(result: &str) {
    SYNC_STATUS.with_label_values(&[result]).inc();
}

#[cfg(not(feature = "metrics"))]
pub fn set_fallen_behind(_has_fallen_behind: bool, _reported: usize) {}

#[cfg(not(feature = "metrics"))]
pub fn record_sync_status(_result: &str) {}
