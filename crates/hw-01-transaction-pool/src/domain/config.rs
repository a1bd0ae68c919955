//! Transaction pool configuration.

use std::time::Duration;

use serde::Deserialize;

/// Tunables for admission and draining.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransactionPoolConfig {
    /// Largest accepted payload, in bytes.
    pub max_transaction_bytes: usize,
    /// Upper bound on the payload bytes drained into a single event.
    pub max_transaction_bytes_per_event: usize,
    /// Application transactions are refused once this many are buffered.
    pub throttle_queue_size: usize,
    /// The node counts as unhealthy once its reported unhealthy duration
    /// exceeds this.
    pub maximum_permissible_unhealthy_duration_ms: u64,
}

impl Default for TransactionPoolConfig {
    fn default() -> Self {
        Self {
            max_transaction_bytes: 6_144,
            max_transaction_bytes_per_event: 245_760,
            throttle_queue_size: 100_000,
            maximum_permissible_unhealthy_duration_ms: 1_000,
        }
    }
}

impl TransactionPoolConfig {
    pub fn maximum_permissible_unhealthy_duration(&self) -> Duration {
        Duration::from_millis(self.maximum_permissible_unhealthy_duration_ms)
    }
}
