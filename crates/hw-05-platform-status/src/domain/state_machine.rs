//! Platform status state machine
//!
//! ```text
//! [STARTING_UP] ──replay──→ [REPLAYING_EVENTS] ──done──→ [OBSERVING]
//!                                                            │ observing delay
//!                                                            ▼
//!      [ACTIVE] ←──self event reached consensus──── [CHECKING] ←─────────┐
//!         │                                              ↑               │
//!         └──── no self event within active delay ───────┘               │
//!                                                                        │
//! [ACTIVE|CHECKING|OBSERVING|REPLAYING] ──fallen behind──→ [BEHIND]      │
//! [BEHIND] ──reconnect──→ [RECONNECT_COMPLETE] ──state written───────────┘
//!
//! [ACTIVE|CHECKING|OBSERVING] ──freeze──→ [FREEZING] ──freeze state──→ [FREEZE_COMPLETE]
//!
//! any ──catastrophic failure──→ [CATASTROPHIC_FAILURE] (terminal)
//! ```

use std::sync::Arc;
use std::time::Duration;

use shared_types::{PlatformStatus, PlatformStatusAction, TimeSource, Timestamp};

use super::config::PlatformStatusConfig;

pub struct PlatformStatusStateMachine {
    status: PlatformStatus,
    observing_delay: Duration,
    active_delay: Duration,
    time: Arc<dyn TimeSource>,
    /// When the current status was entered.
    entered_at: Timestamp,
    last_self_event_consensus: Option<Timestamp>,
}

impl PlatformStatusStateMachine {
    pub fn new(config: &PlatformStatusConfig, time: Arc<dyn TimeSource>) -> Self {
        let entered_at = time.now();
        Self {
            status: PlatformStatus::StartingUp,
            observing_delay: config.observing_status_delay(),
            active_delay: config.active_status_delay(),
            time,
            entered_at,
            last_self_event_consensus: None,
        }
    }

    pub fn status(&self) -> PlatformStatus {
        self.status
    }

    /// Apply `action`, returning the new status if it changed.
    pub fn process_action(&mut self, action: PlatformStatusAction) -> Option<PlatformStatus> {
        if let PlatformStatusAction::SelfEventReachedConsensus { wall_clock_time } = action {
            self.last_self_event_consensus = Some(wall_clock_time);
        }

        let next = self.next_status(action);
        if next == self.status {
            return None;
        }
        self.status = next;
        self.entered_at = self.time.now();
        Some(next)
    }

    fn elapsed_since(now: Timestamp, since: Timestamp) -> Duration {
        Duration::from_nanos(now.saturating_sub(since))
    }

    fn next_status(&self, action: PlatformStatusAction) -> PlatformStatus {
        use PlatformStatus as S;
        use PlatformStatusAction as A;

        match (self.status, action) {
            (S::CatastrophicFailure, _) => S::CatastrophicFailure,
            (_, A::CatastrophicFailure) => S::CatastrophicFailure,

            (S::StartingUp, A::StartedReplayingEvents) => S::ReplayingEvents,
            (S::ReplayingEvents, A::DoneReplayingEvents) => S::Observing,

            (S::Observing, A::TimeElapsed { now })
                if Self::elapsed_since(now, self.entered_at) >= self.observing_delay =>
            {
                S::Checking
            }

            (S::Checking, A::SelfEventReachedConsensus { .. }) => S::Active,

            (S::Active, A::TimeElapsed { now }) => {
                let since = self.last_self_event_consensus.unwrap_or(self.entered_at);
                if Self::elapsed_since(now, since) > self.active_delay {
                    S::Checking
                } else {
                    S::Active
                }
            }

            (S::Active | S::Checking | S::Observing | S::ReplayingEvents, A::FallenBehind) => {
                S::Behind
            }
            (S::Behind, A::ReconnectComplete { .. }) => S::ReconnectComplete,
            (S::ReconnectComplete, A::StateWrittenToDisk { .. }) => S::Checking,

            (S::Active | S::Checking | S::Observing, A::FreezePeriodEntered { .. }) => S::Freezing,
            (
                S::Freezing,
                A::StateWrittenToDisk {
                    is_freeze_state: true,
                    ..
                },
            ) => S::FreezeComplete,

            (status, _) => status,
        }
    }
}

impl std::fmt::Debug for PlatformStatusStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformStatusStateMachine")
            .field("status", &self.status)
            .field("entered_at", &self.entered_at)
            .field("last_self_event_consensus", &self.last_self_event_consensus)
            .finish_non_exhaustive()
    }
}
