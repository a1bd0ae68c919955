//! Error types for the state validation subsystem.

use shared_types::NodeId;
use thiserror::Error;

/// Construction errors. ISS outcomes are notifications, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateValidationError {
    #[error("Self node {0} is not in the roster")]
    SelfNotInRoster(NodeId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for state validation construction
pub type StateValidationResult<T> = Result<T, StateValidationError>;
