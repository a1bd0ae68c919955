//! # Error Types
//!
//! Construction errors for the validated shared types.

use thiserror::Error;

use crate::entities::NodeId;

/// Errors raised while building a [`crate::Roster`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// A roster must contain at least one node.
    #[error("Roster has no entries")]
    Empty,

    /// The same node id appears twice.
    #[error("Duplicate roster entry for {0}")]
    DuplicateNode(NodeId),

    /// Weights must sum to something strictly positive.
    #[error("Roster total weight is zero")]
    ZeroTotalWeight,
}

/// Errors raised while building an [`crate::EventWindow`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventWindowError {
    /// Expired events are a subset of ancient events.
    #[error("Expired threshold {expired} is above ancient threshold {ancient}")]
    ExpiredAboveAncient { expired: u64, ancient: u64 },

    /// New events must be born after the latest consensus round.
    #[error("Birth round {birth_round} does not follow latest consensus round {latest}")]
    BirthRoundNotAfterLatest { birth_round: u64, latest: u64 },
}
