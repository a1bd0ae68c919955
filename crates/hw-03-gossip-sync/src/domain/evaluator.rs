//! # Sync Status Evaluator
//!
//! Runs once per sync handshake, after both sides exchanged their event
//! windows and before any event data moves.

use std::fmt;

use shared_types::EventWindow;

/// Which side of a sync, if either, can no longer catch up through gossip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyncFallenBehindStatus {
    NoneFallenBehind,
    SelfFallenBehind,
    OtherFallenBehind,
}

impl SyncFallenBehindStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SyncFallenBehindStatus::NoneFallenBehind => "NONE_FALLEN_BEHIND",
            SyncFallenBehindStatus::SelfFallenBehind => "SELF_FALLEN_BEHIND",
            SyncFallenBehindStatus::OtherFallenBehind => "OTHER_FALLEN_BEHIND",
        }
    }

    /// The same comparison seen from the peer's side.
    pub fn mirrored(self) -> Self {
        match self {
            SyncFallenBehindStatus::NoneFallenBehind => SyncFallenBehindStatus::NoneFallenBehind,
            SyncFallenBehindStatus::SelfFallenBehind => SyncFallenBehindStatus::OtherFallenBehind,
            SyncFallenBehindStatus::OtherFallenBehind => SyncFallenBehindStatus::SelfFallenBehind,
        }
    }
}

impl fmt::Display for SyncFallenBehindStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compare two event windows.
///
/// The peer is behind if everything it still considers non-ancient has
/// already expired for us, and symmetrically for us. Since a window's
/// expired threshold never exceeds its ancient threshold, both conditions
/// cannot hold at once.
pub fn get_status(self_window: &EventWindow, other_window: &EventWindow) -> SyncFallenBehindStatus {
    if other_window.ancient_threshold() < self_window.expired_threshold() {
        SyncFallenBehindStatus::OtherFallenBehind
    } else if self_window.ancient_threshold() < other_window.expired_threshold() {
        SyncFallenBehindStatus::SelfFallenBehind
    } else {
        SyncFallenBehindStatus::NoneFallenBehind
    }
}
