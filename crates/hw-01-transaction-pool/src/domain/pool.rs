//! # Transaction Pool - Admission and Atomic Drain
//!
//! Two FIFO queues behind one `parking_lot::Mutex`:
//!
//! - `system`: platform transactions, always admitted, drained first
//! - `application`: client transactions, admitted only while the node is
//!   healthy and `ACTIVE`
//!
//! Platform status and health live in the same locked state so that
//! admission decisions and draining observe a consistent snapshot.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;
use shared_types::{PlatformStatus, Transaction};
use tracing::{debug, info};

use super::config::TransactionPoolConfig;
use super::errors::{PoolError, PoolResult, SubmissionRejected};
use crate::metrics;

#[derive(Debug)]
struct PoolState {
    system: VecDeque<Transaction>,
    application: VecDeque<Transaction>,
    platform_status: PlatformStatus,
    healthy: bool,
}

impl PoolState {
    fn new() -> Self {
        Self {
            system: VecDeque::new(),
            application: VecDeque::new(),
            platform_status: PlatformStatus::StartingUp,
            healthy: true,
        }
    }

    /// Pop transactions in priority order until the next one would not fit.
    fn drain_batch(&mut self, max_bytes: usize) -> Vec<Transaction> {
        let mut batch = Vec::new();
        let mut used = 0usize;

        for queue in [&mut self.system, &mut self.application] {
            while let Some(next) = queue.front() {
                if used + next.size() > max_bytes {
                    return batch;
                }
                used += next.size();
                if let Some(tx) = queue.pop_front() {
                    batch.push(tx);
                }
            }
        }
        batch
    }
}

/// Thread-safe buffer of transactions awaiting inclusion in a self event.
#[derive(Debug)]
pub struct TransactionPool {
    config: TransactionPoolConfig,
    state: Mutex<PoolState>,
}

impl TransactionPool {
    /// Create an empty pool.
    ///
    /// A single transaction must always fit in an event, so
    /// `max_transaction_bytes` may not exceed `max_transaction_bytes_per_event`.
    pub fn new(config: TransactionPoolConfig) -> PoolResult<Self> {
        if config.max_transaction_bytes > config.max_transaction_bytes_per_event {
            return Err(PoolError::InvalidConfig(format!(
                "max_transaction_bytes ({}) exceeds max_transaction_bytes_per_event ({})",
                config.max_transaction_bytes, config.max_transaction_bytes_per_event
            )));
        }
        if config.max_transaction_bytes == 0 {
            return Err(PoolError::InvalidConfig(
                "max_transaction_bytes must be positive".to_string(),
            ));
        }
        Ok(Self {
            config,
            state: Mutex::new(PoolState::new()),
        })
    }

    pub fn config(&self) -> &TransactionPoolConfig {
        &self.config
    }

    /// Admit a transaction or explain why not.
    pub fn try_submit(&self, transaction: Transaction) -> PoolResult<()> {
        let size = transaction.size();
        if size > self.config.max_transaction_bytes {
            return Err(SubmissionRejected::TooLarge {
                size,
                max: self.config.max_transaction_bytes,
            }
            .into());
        }

        let mut state = self.state.lock();
        if transaction.is_system {
            state.system.push_back(transaction);
        } else {
            if !state.healthy {
                return Err(SubmissionRejected::Unhealthy.into());
            }
            if state.platform_status != PlatformStatus::Active {
                return Err(SubmissionRejected::NotActive(state.platform_status).into());
            }
            if state.application.len() >= self.config.throttle_queue_size {
                return Err(SubmissionRejected::QueueFull {
                    capacity: self.config.throttle_queue_size,
                }
                .into());
            }
            state.application.push_back(transaction);
        }
        metrics::set_buffered(state.application.len(), state.system.len());
        Ok(())
    }

    /// Submit an application transaction, returning whether it was admitted.
    pub fn submit_application_transaction(&self, payload: Vec<u8>) -> bool {
        self.submit_logged(Transaction::application(payload))
    }

    /// Submit a system transaction, returning whether it was admitted.
    pub fn submit_system_transaction(&self, payload: Vec<u8>) -> bool {
        self.submit_logged(Transaction::system(payload))
    }

    fn submit_logged(&self, transaction: Transaction) -> bool {
        let is_system = transaction.is_system;
        match self.try_submit(transaction) {
            Ok(()) => true,
            Err(PoolError::Rejected(rejection)) => {
                debug!(is_system, reason = rejection.reason(), "Transaction rejected: {}", rejection);
                metrics::record_rejection(rejection.reason());
                false
            }
            Err(other) => {
                debug!(is_system, "Transaction rejected: {}", other);
                false
            }
        }
    }

    /// Drain the next batch for a new event.
    ///
    /// System transactions come first. Draining stops at the first
    /// transaction that would push the batch past
    /// `max_transaction_bytes_per_event`, preserving FIFO order.
    pub fn get_transactions(&self) -> Vec<Transaction> {
        let mut state = self.state.lock();
        let batch = state.drain_batch(self.config.max_transaction_bytes_per_event);
        metrics::set_buffered(state.application.len(), state.system.len());
        metrics::record_drained(batch.len());
        batch
    }

    pub fn has_buffered_system_transactions(&self) -> bool {
        !self.state.lock().system.is_empty()
    }

    /// Total buffered transactions of both kinds.
    pub fn buffered_transaction_count(&self) -> usize {
        let state = self.state.lock();
        state.system.len() + state.application.len()
    }

    pub fn platform_status(&self) -> PlatformStatus {
        self.state.lock().platform_status
    }

    pub fn update_platform_status(&self, status: PlatformStatus) {
        let mut state = self.state.lock();
        if state.platform_status != status {
            debug!(from = %state.platform_status, to = %status, "Transaction pool observed status change");
        }
        state.platform_status = status;
    }

    /// A zero duration signals recovery.
    pub fn report_unhealthy_duration(&self, duration: Duration) {
        let healthy = duration <= self.config.maximum_permissible_unhealthy_duration();
        let mut state = self.state.lock();
        if state.healthy != healthy {
            info!(
                healthy,
                unhealthy_ms = duration.as_millis() as u64,
                "Transaction pool health changed"
            );
        }
        state.healthy = healthy;
    }

    /// Drop every buffered transaction. Status and health are left alone.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        let dropped = state.system.len() + state.application.len();
        state.system.clear();
        state.application.clear();
        metrics::set_buffered(0, 0);
        info!(dropped, "Transaction pool cleared");
    }
}
