//! In-memory collaborators for tests and single-process nodes.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use shared_types::{ConsensusRound, Hash, PlatformEvent};
use tokio::sync::mpsc;

use crate::errors::NodeResult;
use crate::ports::{ConsensusRoundSource, GossipTransport, StateStore};

/// Rounds pushed by hand through a channel.
#[derive(Debug)]
pub struct ChannelRoundSource {
    receiver: mpsc::Receiver<ConsensusRound>,
}

impl ChannelRoundSource {
    pub fn new(receiver: mpsc::Receiver<ConsensusRound>) -> Self {
        Self { receiver }
    }

    pub fn channel(capacity: usize) -> (mpsc::Sender<ConsensusRound>, Self) {
        let (sender, receiver) = mpsc::channel(capacity);
        (sender, Self::new(receiver))
    }
}

#[async_trait]
impl ConsensusRoundSource for ChannelRoundSource {
    async fn next_round(&mut self) -> Option<ConsensusRound> {
        self.receiver.recv().await
    }
}

/// Keeps every broadcast event.
#[derive(Debug, Default)]
pub struct RecordingGossip {
    sent: Mutex<Vec<PlatformEvent>>,
}

impl RecordingGossip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<PlatformEvent> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl GossipTransport for RecordingGossip {
    async fn broadcast_event(&self, event: &PlatformEvent) -> NodeResult<()> {
        self.sent.lock().push(event.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    states: RwLock<BTreeMap<u64, Hash>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.states.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.read().is_empty()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn save_state(&self, round: u64, hash: Hash) -> NodeResult<()> {
        self.states.write().insert(round, hash);
        Ok(())
    }

    async fn latest_state(&self) -> NodeResult<Option<(u64, Hash)>> {
        Ok(self
            .states
            .read()
            .iter()
            .next_back()
            .map(|(round, hash)| (*round, *hash)))
    }
}
