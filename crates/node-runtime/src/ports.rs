//! # Runtime Collaborator Ports
//!
//! The node core never performs network or disk I/O itself. The ordering
//! algorithm, the gossip network and state storage sit behind these traits.

use async_trait::async_trait;
use shared_types::{ConsensusRound, EventWindow, Hash, NodeId, PlatformEvent, Timestamp};

use crate::errors::NodeResult;

/// Messages delivered by the gossip layer to the event creation stage.
#[derive(Debug, Clone, PartialEq)]
pub enum GossipMessage {
    /// A validated event received from a peer.
    Event(PlatformEvent),
    /// A peer opened a sync and advertised its event window.
    SyncRequest { peer: NodeId, window: EventWindow },
}

/// A state the reconnect layer obtained from a peer after the node fell behind.
///
/// Rounds delivered afterwards must continue from `round + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectState {
    pub round: u64,
    pub consensus_timestamp: Timestamp,
    pub hash: Hash,
}

/// Consensus rounds, in strictly increasing round order.
#[async_trait]
pub trait ConsensusRoundSource: Send {
    /// `None` once the source is exhausted.
    async fn next_round(&mut self) -> Option<ConsensusRound>;
}

#[async_trait]
pub trait GossipTransport: Send + Sync {
    async fn broadcast_event(&self, event: &PlatformEvent) -> NodeResult<()>;
}

#[async_trait]
pub trait StateStore: Send + Sync {
    async fn save_state(&self, round: u64, hash: Hash) -> NodeResult<()>;

    async fn latest_state(&self) -> NodeResult<Option<(u64, Hash)>>;
}
