//! Error types for the event creation subsystem.

use shared_types::{NodeId, RosterError};
use thiserror::Error;

/// Construction errors. Steady-state "no event right now" is `None`, not an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventCreationError {
    #[error("Self node {0} is not in the roster")]
    SelfNotInRoster(NodeId),

    #[error("Invalid roster: {0}")]
    Roster(#[from] RosterError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for event creation construction
pub type EventCreationResult<T> = Result<T, EventCreationError>;
