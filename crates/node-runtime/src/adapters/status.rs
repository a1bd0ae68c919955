//! Status changes delivered straight into the transaction pool.

use std::sync::Arc;

use hw_01_transaction_pool::TransactionPool;
use hw_05_platform_status::StatusPublisher;
use shared_types::PlatformStatus;

/// Updates the pool synchronously so that admission never lags the status
/// machine.
#[derive(Debug, Clone)]
pub struct PoolStatusPublisher {
    pool: Arc<TransactionPool>,
}

impl PoolStatusPublisher {
    pub fn new(pool: Arc<TransactionPool>) -> Self {
        Self { pool }
    }
}

impl StatusPublisher for PoolStatusPublisher {
    fn publish_status(&self, status: PlatformStatus) {
        self.pool.update_platform_status(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hw_01_transaction_pool::TransactionPoolConfig;

    #[test]
    fn test_pool_follows_status() {
        let pool = Arc::new(TransactionPool::new(TransactionPoolConfig::default()).unwrap());
        let publisher = PoolStatusPublisher::new(pool.clone());
        assert!(!pool.submit_application_transaction(vec![1]));

        publisher.publish_status(PlatformStatus::Active);
        assert_eq!(pool.platform_status(), PlatformStatus::Active);
        assert!(pool.submit_application_transaction(vec![1]));
    }
}
