//! Single-node ordering: every broadcast self event becomes its own round.
//!
//! With a roster of one there is no one to gossip with, and each event is
//! trivially final. State signatures carried by the event are lifted into
//! the round, which closes the state validation loop.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use shared_types::{ConsensusRound, PlatformEvent, ROUND_FIRST};
use tokio::sync::mpsc;
use tracing::debug;

use crate::adapters::memory::ChannelRoundSource;
use crate::codec::decode_state_signature;
use crate::errors::{NodeError, NodeResult};
use crate::ports::GossipTransport;

#[derive(Debug)]
pub struct LoopbackOrdering {
    rounds: mpsc::Sender<ConsensusRound>,
    next_round: AtomicU64,
}

impl LoopbackOrdering {
    pub fn new(capacity: usize) -> (Self, ChannelRoundSource) {
        let (rounds, source) = ChannelRoundSource::channel(capacity);
        (
            Self {
                rounds,
                next_round: AtomicU64::new(ROUND_FIRST),
            },
            source,
        )
    }

    fn order(&self, event: &PlatformEvent) -> ConsensusRound {
        ConsensusRound {
            round_number: self.next_round.fetch_add(1, Ordering::SeqCst),
            consensus_timestamp: event.event.time_created,
            events: vec![event.descriptor],
            state_signatures: event
                .event
                .transactions
                .iter()
                .filter_map(decode_state_signature)
                .collect(),
        }
    }
}

#[async_trait]
impl GossipTransport for LoopbackOrdering {
    async fn broadcast_event(&self, event: &PlatformEvent) -> NodeResult<()> {
        let round = self.order(event);
        debug!(
            round = round.round_number,
            signatures = round.state_signatures.len(),
            "Loopback ordered self event"
        );
        self.rounds
            .send(round)
            .await
            .map_err(|_| NodeError::Gossip("consensus round stage is gone".to_string()))
    }
}
