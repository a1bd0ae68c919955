//! # Consensus Round Stage
//!
//! ```text
//! ConsensusRound
//!     ├──→ SelfEventReachedConsensus (if it holds a self event)
//!     ├──→ WindowUpdate::Advanced ──→ event creation stage
//!     └──→ StateHasher ──→ sign hash ──→ system transaction into the pool
//!                      ├──→ IssDetector (state, then the round's signatures)
//!                      │          └──→ IssNotification ──→ ISS stage
//!                      └──→ StateStore ──→ StateWrittenToDisk
//!
//! ReconnectState
//!     ├──→ IssDetector::overriding_state
//!     ├──→ WindowUpdate::Reconnected ──→ event creation stage
//!     └──→ ReconnectComplete, StateStore ──→ StateWrittenToDisk
//! ```

use std::sync::Arc;

use hw_01_transaction_pool::TransactionPool;
use hw_02_event_creation::HashSigner;
use hw_04_state_validation::{
    IssDetectionApi, ReservedSignedState, SignedState, StateHasher, StateWithHashComplexity,
};
use shared_types::{
    AncientMode, ConsensusRound, EventWindow, Hash, IssNotification, NodeId, PlatformStatusAction,
    StateSignatureTransaction, StatusActionSubmitter, TimeSource, ROUND_FIRST,
};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::codec::{encode_state_signature, state_leaves};
use crate::errors::NodeResult;
use crate::ports::{ConsensusRoundSource, ReconnectState, StateStore};

/// Window changes handed to the event creation stage, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowUpdate {
    /// A round reached consensus.
    Advanced(EventWindow),
    /// The node was reset to a state loaded from a peer.
    Reconnected(EventWindow),
}

pub struct ConsensusRoundHandler {
    pub(crate) self_id: NodeId,
    pub(crate) hasher: StateHasher,
    pub(crate) detector: Box<dyn IssDetectionApi + Sync>,
    pub(crate) signer: Arc<dyn HashSigner>,
    pub(crate) pool: Arc<TransactionPool>,
    pub(crate) store: Arc<dyn StateStore>,
    pub(crate) status_actions: Arc<dyn StatusActionSubmitter>,
    pub(crate) notifications: mpsc::Sender<IssNotification>,
    pub(crate) windows: mpsc::UnboundedSender<WindowUpdate>,
    pub(crate) rounds_non_ancient: u64,
    /// Never below `rounds_non_ancient`.
    pub(crate) rounds_expired: u64,
    pub(crate) ancient_mode: AncientMode,
    pub(crate) time: Arc<dyn TimeSource>,
}

impl ConsensusRoundHandler {
    pub async fn run(
        mut self,
        mut source: Box<dyn ConsensusRoundSource>,
        mut reconnects: mpsc::Receiver<ReconnectState>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        info!("Consensus round stage started");
        loop {
            tokio::select! {
                round = source.next_round() => match round {
                    Some(round) => {
                        let number = round.round_number;
                        if let Err(err) = self.handle_round(round).await {
                            error!(round = number, %err, "Failed to handle consensus round");
                        }
                    }
                    None => {
                        info!("Consensus round source exhausted");
                        break;
                    }
                },
                Some(state) = reconnects.recv() => {
                    let round = state.round;
                    if let Err(err) = self.handle_reconnect(state).await {
                        error!(round, %err, "Failed to apply reconnect state");
                    }
                }
                _ = shutdown.changed() => {
                    info!("Consensus round stage shutting down");
                    break;
                }
            }
        }
    }

    pub async fn handle_round(&mut self, round: ConsensusRound) -> NodeResult<()> {
        hw_telemetry::CONSENSUS_ROUNDS_HANDLED.inc();
        let number = round.round_number;

        if round.contains_event_from(self.self_id) {
            self.status_actions
                .submit_status_action(PlatformStatusAction::SelfEventReachedConsensus {
                    wall_clock_time: self.time.now(),
                });
        }

        let window = self.event_window_after(number)?;
        self.send_window(WindowUpdate::Advanced(window));

        let state = SignedState::new(number, round.consensus_timestamp, state_leaves(&round));
        let reserved = ReservedSignedState::new(state, "consensus round");
        let complexity = round.events.len() as u64;
        let Some(hashed) = self
            .hasher
            .hash_state(StateWithHashComplexity::new(reserved, complexity))
        else {
            warn!(round = number, "State reservation was invalid before hashing");
            return Ok(());
        };
        let Some(hash) = hashed.get().and_then(|state| state.hash()) else {
            return Ok(());
        };

        self.submit_state_signature(number, hash)?;

        // Detection does not wait on the store.
        let mut notifications = self.detector.handle_state(hashed);
        notifications.extend(
            self.detector
                .handle_state_signature_transactions(&round.state_signatures),
        );
        self.forward(notifications).await;

        self.store.save_state(number, hash).await?;
        self.status_actions
            .submit_status_action(PlatformStatusAction::StateWrittenToDisk {
                round: number,
                is_freeze_state: false,
            });
        Ok(())
    }

    /// Restart from a state loaded from a peer after falling behind.
    pub async fn handle_reconnect(&mut self, state: ReconnectState) -> NodeResult<()> {
        let ReconnectState {
            round,
            consensus_timestamp,
            hash,
        } = state;
        info!(round, hash = %hex::encode(hash), "Applying reconnect state");

        let loaded = SignedState::with_hash(round, consensus_timestamp, hash);
        let notifications = self
            .detector
            .overriding_state(ReservedSignedState::new(loaded, "reconnect"));
        self.forward(notifications).await;

        let window = self.event_window_after(round)?;
        self.send_window(WindowUpdate::Reconnected(window));

        self.status_actions
            .submit_status_action(PlatformStatusAction::ReconnectComplete { round });
        self.store.save_state(round, hash).await?;
        self.status_actions
            .submit_status_action(PlatformStatusAction::StateWrittenToDisk {
                round,
                is_freeze_state: false,
            });
        Ok(())
    }

    /// The window once `round` has reached consensus.
    fn event_window_after(&self, round: u64) -> NodeResult<EventWindow> {
        let next = round + 1;
        let ancient = next.saturating_sub(self.rounds_non_ancient).max(ROUND_FIRST);
        let expired = next.saturating_sub(self.rounds_expired).max(ROUND_FIRST);
        Ok(EventWindow::new(round, next, ancient, expired, self.ancient_mode)?)
    }

    fn send_window(&self, update: WindowUpdate) {
        if self.windows.send(update).is_err() {
            warn!(?update, "Event creation stage is gone, window not delivered");
        }
    }

    async fn forward(&self, notifications: Vec<IssNotification>) {
        for notification in notifications {
            if self.notifications.send(notification).await.is_err() {
                error!(round = notification.round, "ISS stage is gone, notification lost");
            }
        }
    }

    fn submit_state_signature(&self, round: u64, state_hash: Hash) -> NodeResult<()> {
        let transaction = StateSignatureTransaction {
            round,
            signer: self.self_id,
            state_hash,
            signature: self.signer.sign(&state_hash),
        };
        let payload = encode_state_signature(&transaction)?;
        if !self.pool.submit_system_transaction(payload) {
            warn!(round, "State signature rejected by the transaction pool");
        } else {
            debug!(round, "State signature submitted");
        }
        Ok(())
    }
}
