//! # Fallen-Behind Manager
//!
//! Counts the distinct peers that reported this node behind. All state sits
//! behind one lock so concurrent peer threads never observe a torn count.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use shared_types::{NodeId, PlatformStatusAction};
use tracing::{debug, info};

use super::config::FallenBehindThreshold;
use crate::ports::outbound::StatusActionSubmitter;

#[derive(Debug, Default)]
struct FallenBehindState {
    peers: HashSet<NodeId>,
    reported: HashSet<NodeId>,
    // Whether the current episode has already been announced.
    notified: bool,
}

impl FallenBehindState {
    fn has_fallen_behind(&self, threshold: &FallenBehindThreshold) -> bool {
        threshold.is_exceeded(self.reported.len(), self.peers.len())
    }

    /// True exactly once per episode: when the threshold is first exceeded.
    fn take_transition(&mut self, threshold: &FallenBehindThreshold) -> bool {
        if !self.notified && self.has_fallen_behind(threshold) {
            self.notified = true;
            return true;
        }
        false
    }
}

pub struct FallenBehindManager {
    threshold: FallenBehindThreshold,
    state: Mutex<FallenBehindState>,
    status_actions: Arc<dyn StatusActionSubmitter>,
}

impl FallenBehindManager {
    pub fn new(
        peers: impl IntoIterator<Item = NodeId>,
        threshold: FallenBehindThreshold,
        status_actions: Arc<dyn StatusActionSubmitter>,
    ) -> Self {
        Self {
            threshold,
            state: Mutex::new(FallenBehindState {
                peers: peers.into_iter().collect(),
                ..FallenBehindState::default()
            }),
            status_actions,
        }
    }

    pub fn report_fallen_behind(&self, peer: NodeId) {
        let (newly_behind, reported, peers) = {
            let mut state = self.state.lock();
            if !state.peers.contains(&peer) {
                debug!(%peer, "Ignoring fallen-behind report from untracked peer");
                return;
            }
            if !state.reported.insert(peer) {
                return;
            }
            let newly_behind = state.take_transition(&self.threshold);
            (newly_behind, state.reported.len(), state.peers.len())
        };
        debug!(%peer, reported, peers, "Peer reported us fallen behind");
        if newly_behind {
            self.announce(reported, peers);
        }
    }

    fn announce(&self, reported: usize, peers: usize) {
        info!(reported, peers, "Node has fallen behind, reconnect required");
        self.status_actions
            .submit_status_action(PlatformStatusAction::FallenBehind);
    }

    pub fn reset_fallen_behind(&self) {
        let mut state = self.state.lock();
        let cleared = state.reported.len();
        state.reported.clear();
        state.notified = false;
        info!(cleared, "Fallen-behind reports reset");
    }

    pub fn has_fallen_behind(&self) -> bool {
        self.state.lock().has_fallen_behind(&self.threshold)
    }

    pub fn num_reported_fallen_behind(&self) -> usize {
        self.state.lock().reported.len()
    }

    /// Both values from one lock acquisition.
    pub fn snapshot(&self) -> (bool, usize) {
        let state = self.state.lock();
        (state.has_fallen_behind(&self.threshold), state.reported.len())
    }

    /// Only peers that saw us behind are known to be ahead of us.
    pub fn should_reconnect_from(&self, peer: NodeId) -> bool {
        let state = self.state.lock();
        state.has_fallen_behind(&self.threshold) && state.reported.contains(&peer)
    }

    pub fn add_remove_peers(&self, added: &[NodeId], removed: &[NodeId]) {
        let (newly_behind, reported, peers) = {
            let mut state = self.state.lock();
            for peer in removed {
                state.peers.remove(peer);
                state.reported.remove(peer);
            }
            state.peers.extend(added.iter().copied());
            let newly_behind = state.take_transition(&self.threshold);
            (newly_behind, state.reported.len(), state.peers.len())
        };
        debug!(
            added = added.len(),
            removed = removed.len(),
            peers,
            "Fallen-behind peer set updated"
        );
        if newly_behind {
            self.announce(reported, peers);
        }
    }

    pub fn num_peers(&self) -> usize {
        self.state.lock().peers.len()
    }
}

impl std::fmt::Debug for FallenBehindManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("FallenBehindManager")
            .field("threshold", &self.threshold)
            .field("peers", &state.peers.len())
            .field("reported", &state.reported.len())
            .finish()
    }
}
