//! Platform status, status actions and ISS notifications.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// The node's current operating mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformStatus {
    #[default]
    StartingUp,
    ReplayingEvents,
    Observing,
    Checking,
    Active,
    Behind,
    ReconnectComplete,
    Freezing,
    FreezeComplete,
    /// Terminal. No action leaves this status.
    CatastrophicFailure,
}

impl PlatformStatus {
    /// Whether self events may be created in this status unconditionally.
    pub fn permits_event_creation(self) -> bool {
        matches!(self, PlatformStatus::Active | PlatformStatus::Checking)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PlatformStatus::CatastrophicFailure)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlatformStatus::StartingUp => "STARTING_UP",
            PlatformStatus::ReplayingEvents => "REPLAYING_EVENTS",
            PlatformStatus::Observing => "OBSERVING",
            PlatformStatus::Checking => "CHECKING",
            PlatformStatus::Active => "ACTIVE",
            PlatformStatus::Behind => "BEHIND",
            PlatformStatus::ReconnectComplete => "RECONNECT_COMPLETE",
            PlatformStatus::Freezing => "FREEZING",
            PlatformStatus::FreezeComplete => "FREEZE_COMPLETE",
            PlatformStatus::CatastrophicFailure => "CATASTROPHIC_FAILURE",
        }
    }
}

impl fmt::Display for PlatformStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input to the platform status state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformStatusAction {
    StartedReplayingEvents,
    DoneReplayingEvents,
    /// A self event reached consensus at the given wall clock time.
    SelfEventReachedConsensus { wall_clock_time: Timestamp },
    FallenBehind,
    ReconnectComplete { round: u64 },
    FreezePeriodEntered { freeze_round: u64 },
    StateWrittenToDisk { round: u64, is_freeze_state: bool },
    CatastrophicFailure,
    /// Periodic tick carrying the current wall clock time.
    TimeElapsed { now: Timestamp },
}

/// Delivers status actions to the platform status state machine.
///
/// Submitters are called from gossip and consensus stages alike and must not
/// block.
pub trait StatusActionSubmitter: Send + Sync {
    fn submit_status_action(&self, action: PlatformStatusAction);
}

/// The kind of state hash disagreement detected for a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssType {
    /// This node disagrees with the hash agreed by a majority.
    SelfIss,
    /// Another node disagrees with the agreed hash.
    OtherIss,
    /// No hash can command a majority.
    CatastrophicIss,
}

impl IssType {
    pub fn as_str(self) -> &'static str {
        match self {
            IssType::SelfIss => "SELF_ISS",
            IssType::OtherIss => "OTHER_ISS",
            IssType::CatastrophicIss => "CATASTROPHIC_ISS",
        }
    }
}

impl fmt::Display for IssType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fire-once report of an ISS in `round`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssNotification {
    pub round: u64,
    pub iss_type: IssType,
}

impl IssNotification {
    pub fn new(round: u64, iss_type: IssType) -> Self {
        Self { round, iss_type }
    }
}
