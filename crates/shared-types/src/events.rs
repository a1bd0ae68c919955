//! Events, transactions and consensus rounds.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};

use crate::entities::{Hash, NodeId, Signature};
use crate::time::Timestamp;

/// A transaction payload awaiting inclusion in an event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub payload: Vec<u8>,
    /// System transactions (state signatures, freeze signatures) are
    /// platform-generated and take priority over application payloads.
    pub is_system: bool,
}

impl Transaction {
    pub fn application(payload: Vec<u8>) -> Self {
        Self {
            payload,
            is_system: false,
        }
    }

    pub fn system(payload: Vec<u8>) -> Self {
        Self {
            payload,
            is_system: true,
        }
    }

    pub fn size(&self) -> usize {
        self.payload.len()
    }
}

/// The identity of an event as referenced by its children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventDescriptor {
    pub hash: Hash,
    pub creator: NodeId,
    pub birth_round: u64,
    pub generation: u64,
}

/// A newly assembled event before hashing and signing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedEvent {
    pub creator: NodeId,
    pub self_parent: Option<EventDescriptor>,
    pub other_parents: Vec<EventDescriptor>,
    pub birth_round: u64,
    /// One more than the highest parent generation, 1 for a parentless event.
    pub generation: u64,
    /// Nanoseconds since the Unix epoch.
    pub time_created: Timestamp,
    pub transactions: Vec<Transaction>,
}

impl UnsignedEvent {
    /// Self parent first, then other parents.
    pub fn all_parents(&self) -> impl Iterator<Item = &EventDescriptor> {
        self.self_parent.iter().chain(self.other_parents.iter())
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

/// A hashed event, signed once it leaves the Self-Event Signer.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformEvent {
    pub event: UnsignedEvent,
    pub descriptor: EventDescriptor,
    #[serde_as(as = "Option<Bytes>")]
    pub signature: Option<Signature>,
}

impl PlatformEvent {
    pub fn hash(&self) -> Hash {
        self.descriptor.hash
    }

    pub fn creator(&self) -> NodeId {
        self.event.creator
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = Some(signature);
        self
    }
}

/// A node's signature over the state hash it computed for `round`.
///
/// Produced locally and gossiped inside system transactions; collected by
/// the ISS detector from every signer.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSignatureTransaction {
    pub round: u64,
    pub signer: NodeId,
    pub state_hash: Hash,
    #[serde_as(as = "Bytes")]
    pub signature: Signature,
}

/// An ordered batch of events produced by the consensus algorithm.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusRound {
    pub round_number: u64,
    pub consensus_timestamp: Timestamp,
    /// Descriptors of the events that reached consensus in this round.
    pub events: Vec<EventDescriptor>,
    pub state_signatures: Vec<StateSignatureTransaction>,
}

impl ConsensusRound {
    /// Whether any event created by `node` is part of this round.
    pub fn contains_event_from(&self, node: NodeId) -> bool {
        self.events.iter().any(|e| e.creator == node)
    }
}
