//! Transaction pool error types.

use shared_types::PlatformStatus;
use thiserror::Error;

/// Why a submission was refused.
///
/// Callers of the fire-and-forget `submit` never see these; they are logged
/// and counted instead.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SubmissionRejected {
    #[error("transaction of {size} bytes exceeds maximum of {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("node is unhealthy")]
    Unhealthy,

    #[error("platform status {0} does not accept application transactions")]
    NotActive(PlatformStatus),

    #[error("application queue is full ({capacity} buffered)")]
    QueueFull { capacity: usize },
}

impl SubmissionRejected {
    /// Short label used for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            SubmissionRejected::TooLarge { .. } => "too_large",
            SubmissionRejected::Unhealthy => "unhealthy",
            SubmissionRejected::NotActive(_) => "not_active",
            SubmissionRejected::QueueFull { .. } => "queue_full",
        }
    }
}

/// Transaction pool error type.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("transaction rejected: {0}")]
    Rejected(#[from] SubmissionRejected),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;
