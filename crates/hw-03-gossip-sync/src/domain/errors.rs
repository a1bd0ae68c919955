//! Error types for the gossip sync subsystem.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyncError {
    #[error("Fallen-behind threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),
}

/// Result type for gossip sync construction
pub type SyncResult<T> = Result<T, SyncError>;
