//! Event window: the boundary below which events no longer matter.

use serde::{Deserialize, Serialize};

use crate::errors::EventWindowError;
use crate::events::EventDescriptor;

/// Sentinel for "no round has reached consensus yet".
pub const ROUND_NEGATIVE_INFINITY: u64 = 0;

/// The first round that can reach consensus.
pub const ROUND_FIRST: u64 = 1;

/// Which event property is compared against the window thresholds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AncientMode {
    #[default]
    BirthRound,
    Generation,
}

/// Immutable description of which events are ancient or expired.
///
/// An event is *ancient* once its indicator falls below `ancient_threshold`
/// and *expired* once it falls below `expired_threshold`. Expired implies
/// ancient, so `expired_threshold <= ancient_threshold` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWindow {
    latest_consensus_round: u64,
    new_event_birth_round: u64,
    ancient_threshold: u64,
    expired_threshold: u64,
    ancient_mode: AncientMode,
}

impl EventWindow {
    pub fn new(
        latest_consensus_round: u64,
        new_event_birth_round: u64,
        ancient_threshold: u64,
        expired_threshold: u64,
        ancient_mode: AncientMode,
    ) -> Result<Self, EventWindowError> {
        if expired_threshold > ancient_threshold {
            return Err(EventWindowError::ExpiredAboveAncient {
                expired: expired_threshold,
                ancient: ancient_threshold,
            });
        }
        if new_event_birth_round <= latest_consensus_round {
            return Err(EventWindowError::BirthRoundNotAfterLatest {
                birth_round: new_event_birth_round,
                latest: latest_consensus_round,
            });
        }
        Ok(Self {
            latest_consensus_round,
            new_event_birth_round,
            ancient_threshold,
            expired_threshold,
            ancient_mode,
        })
    }

    /// The window in force before any round reaches consensus.
    pub fn genesis(ancient_mode: AncientMode) -> Self {
        Self {
            latest_consensus_round: ROUND_NEGATIVE_INFINITY,
            new_event_birth_round: ROUND_FIRST,
            ancient_threshold: ROUND_FIRST,
            expired_threshold: ROUND_FIRST,
            ancient_mode,
        }
    }

    pub fn latest_consensus_round(&self) -> u64 {
        self.latest_consensus_round
    }

    /// Birth round stamped on events created under this window.
    pub fn new_event_birth_round(&self) -> u64 {
        self.new_event_birth_round
    }

    pub fn ancient_threshold(&self) -> u64 {
        self.ancient_threshold
    }

    pub fn expired_threshold(&self) -> u64 {
        self.expired_threshold
    }

    pub fn ancient_mode(&self) -> AncientMode {
        self.ancient_mode
    }

    pub fn is_genesis(&self) -> bool {
        self.latest_consensus_round == ROUND_NEGATIVE_INFINITY
    }

    pub fn is_ancient_indicator(&self, indicator: u64) -> bool {
        indicator < self.ancient_threshold
    }

    pub fn is_ancient(&self, descriptor: &EventDescriptor) -> bool {
        self.is_ancient_indicator(self.ancient_indicator(descriptor))
    }

    pub fn is_expired(&self, descriptor: &EventDescriptor) -> bool {
        self.ancient_indicator(descriptor) < self.expired_threshold
    }

    /// The value of `descriptor` compared against the thresholds.
    pub fn ancient_indicator(&self, descriptor: &EventDescriptor) -> u64 {
        match self.ancient_mode {
            AncientMode::BirthRound => descriptor.birth_round,
            AncientMode::Generation => descriptor.generation,
        }
    }

    /// True if moving from `self` to `next` would not move any boundary back.
    pub fn is_superseded_by(&self, next: &EventWindow) -> bool {
        next.latest_consensus_round >= self.latest_consensus_round
            && next.ancient_threshold >= self.ancient_threshold
            && next.expired_threshold >= self.expired_threshold
    }
}
