//! Driven Ports (SPI - Outbound Dependencies)

use shared_types::{Hash, Signature, Transaction};

/// Supplies the transactions for the next self event.
///
/// Each call drains what it returns; a transaction is handed out once.
pub trait TransactionSupplier: Send + Sync {
    fn get_transactions(&self) -> Vec<Transaction>;
}

/// Whether platform-generated transactions are waiting to be gossiped.
///
/// Read by the platform status rule while the node is freezing.
pub trait PendingSystemTransactions: Send + Sync {
    fn has_buffered_system_transactions(&self) -> bool;
}

/// Signs with the node's static key material.
pub trait HashSigner: Send + Sync {
    fn sign(&self, hash: &Hash) -> Signature;
}
