//! # Event Creation Metrics
//!
//! Enable with the `metrics` feature:
//! ```toml
//! hw-02-event-creation = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `hw_event_creation_attempts_total` - Counter of attempts by resulting phase
//! - `hw_event_creation_events_created_total` - Counter of signed self events
//! - `hw_event_creation_future_events_buffered` - Gauge of buffered future events

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter,
    IntCounterVec, IntGauge,
};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref CREATION_ATTEMPTS: IntCounterVec = register_int_counter_vec!(
        "hw_event_creation_attempts_total",
        "Event creation attempts by resulting phase",
        &["phase"]
    )
    .expect("Failed to create CREATION_ATTEMPTS metric");

    pub static ref EVENTS_CREATED: IntCounter = register_int_counter!(
        "hw_event_creation_events_created_total",
        "Total number of signed self events"
    )
    .expect("Failed to create EVENTS_CREATED metric");

    pub static ref FUTURE_EVENTS_BUFFERED: IntGauge = register_int_gauge!(
        "hw_event_creation_future_events_buffered",
        "Events held until the event window reaches their birth round"
    )
    .expect("Failed to create FUTURE_EVENTS_BUFFERED metric");
}

#[cfg(feature = "metrics")]
pub fn record_attempt(phase: &str) {
    CREATION_ATTEMPTS.with_label_values(&[phase]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_event_created() {
    EVENTS_CREATED.inc();
}

#[cfg(feature = "metrics")]
pub fn set_future_events_buffered(count: usize) {
    FUTURE_EVENTS_BUFFERED.set(count as i64);
}

#[cfg(not(feature = "metrics"))]
pub fn record_attempt(_phase: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_event_created() {}

#[cfg(not(feature = "metrics"))]
pub fn set_future_events_buffered(_count: usize) {}
