//! The transaction pool is both the supplier of event transactions and the
//! source of the pending-system-transaction flag.

use hw_01_transaction_pool::TransactionPool;
use shared_types::Transaction;

use crate::ports::outbound::{PendingSystemTransactions, TransactionSupplier};

impl TransactionSupplier for TransactionPool {
    fn get_transactions(&self) -> Vec<Transaction> {
        TransactionPool::get_transactions(self)
    }
}

impl PendingSystemTransactions for TransactionPool {
    fn has_buffered_system_transactions(&self) -> bool {
        TransactionPool::has_buffered_system_transactions(self)
    }
}
