//! # Inbound Port - TransactionPoolApi
//!
//! Driving port for the transaction pool.
//!
//! | Method | Caller |
//! |--------|--------|
//! | `submit` | Application submission threads, state signing |
//! | `has_buffered_system_transactions` | Event Creation Rules |
//! | `update_platform_status` | Platform status state machine |
//! | `report_unhealthy_duration` | Health monitor |
//! | `clear` | Reconnect and restart |

use std::time::Duration;

use shared_types::PlatformStatus;

use crate::domain::TransactionPool;

/// Primary API for the Transaction Pool subsystem.
pub trait TransactionPoolApi: Send + Sync {
    /// Buffer a payload. Never blocks and never fails the caller; a refused
    /// payload is logged and counted.
    fn submit(&self, payload: Vec<u8>, is_system: bool);

    /// Whether a system transaction is waiting to be included.
    fn has_buffered_system_transactions(&self) -> bool;

    fn update_platform_status(&self, status: PlatformStatus);

    /// Report how long the node has been unhealthy. `Duration::ZERO` means
    /// the node recovered.
    fn report_unhealthy_duration(&self, duration: Duration);

    /// Drop all buffered payloads.
    fn clear(&self);
}

impl TransactionPoolApi for TransactionPool {
    fn submit(&self, payload: Vec<u8>, is_system: bool) {
        if is_system {
            self.submit_system_transaction(payload);
        } else {
            self.submit_application_transaction(payload);
        }
    }

    fn has_buffered_system_transactions(&self) -> bool {
        TransactionPool::has_buffered_system_transactions(self)
    }

    fn update_platform_status(&self, status: PlatformStatus) {
        TransactionPool::update_platform_status(self, status)
    }

    fn report_unhealthy_duration(&self, duration: Duration) {
        TransactionPool::report_unhealthy_duration(self, duration)
    }

    fn clear(&self) {
        TransactionPool::clear(self)
    }
}
