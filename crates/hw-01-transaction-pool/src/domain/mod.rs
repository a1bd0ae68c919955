//! Domain layer for the transaction pool.

pub mod config;
pub mod errors;
pub mod pool;

pub use config::TransactionPoolConfig;
pub use errors::{PoolError, PoolResult, SubmissionRejected};
pub use pool::TransactionPool;
