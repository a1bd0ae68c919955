//! Shared builders for the integration flows and benchmarks.

use std::sync::Arc;

use hw_01_transaction_pool::{TransactionPool, TransactionPoolConfig};
use hw_02_event_creation::{
    EventCreationApi, EventCreationConfig, EventCreationDependencies, EventCreationManager,
    KeyPairHashSigner,
};
use hw_04_state_validation::{ReservedSignedState, SignedState};
use parking_lot::Mutex;
use shared_crypto::Ed25519KeyPair;
use shared_types::{
    Hash, ManualTimeSource, NodeId, PlatformStatus, PlatformStatusAction, Roster, RosterEntry,
    StateSignatureTransaction, StatusActionSubmitter,
};

pub const SECOND: u64 = 1_000_000_000;

/// `n` members of equal weight, ids `0..n`.
pub fn roster(n: u64) -> Arc<Roster> {
    weighted_roster(&vec![1; n as usize])
}

pub fn weighted_roster(weights: &[u64]) -> Arc<Roster> {
    let entries = weights
        .iter()
        .enumerate()
        .map(|(id, weight)| RosterEntry {
            node_id: NodeId(id as u64),
            weight: *weight,
            public_key: [0u8; 32],
        })
        .collect();
    Arc::new(Roster::new(entries).expect("non-empty roster"))
}

/// One node's event creation pipeline over its own pool.
pub struct TestNode {
    pub id: NodeId,
    pub pool: Arc<TransactionPool>,
    pub manager: EventCreationManager,
}

impl TestNode {
    pub fn new(id: u64, roster: Arc<Roster>, clock: Arc<ManualTimeSource>) -> Self {
        let pool = Arc::new(
            TransactionPool::new(TransactionPoolConfig::default()).expect("default pool config"),
        );
        let signer = Arc::new(KeyPairHashSigner::new(Ed25519KeyPair::from_seed(
            [id as u8 + 1; 32],
        )));
        let config = EventCreationConfig {
            max_creation_rate: 0.0,
            rng_seed: Some(id),
            ..EventCreationConfig::default()
        };
        let manager = EventCreationManager::new(
            NodeId(id),
            roster,
            &config,
            EventCreationDependencies::from_pool(pool.clone(), signer, clock),
        )
        .expect("node is in the roster");
        Self {
            id: NodeId(id),
            pool,
            manager,
        }
    }

    /// Deliver `status` to both the pool and the creation rules.
    pub fn set_status(&mut self, status: PlatformStatus) {
        self.pool.update_platform_status(status);
        self.manager.update_platform_status(status);
    }
}

/// Keeps every submitted status action in order.
#[derive(Debug, Default)]
pub struct RecordingSubmitter {
    actions: Mutex<Vec<PlatformStatusAction>>,
}

impl RecordingSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> Vec<PlatformStatusAction> {
        self.actions.lock().clone()
    }

    pub fn drain(&self) -> Vec<PlatformStatusAction> {
        std::mem::take(&mut *self.actions.lock())
    }
}

impl StatusActionSubmitter for RecordingSubmitter {
    fn submit_status_action(&self, action: PlatformStatusAction) {
        self.actions.lock().push(action);
    }
}

pub fn hashed_state(round: u64, hash: Hash) -> ReservedSignedState {
    ReservedSignedState::new(SignedState::with_hash(round, round * SECOND, hash), "test")
}

pub fn state_signature(signer: u64, round: u64, state_hash: Hash) -> StateSignatureTransaction {
    StateSignatureTransaction {
        round,
        signer: NodeId(signer),
        state_hash,
        signature: [0; 64],
    }
}
