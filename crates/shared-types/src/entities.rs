//! # Core Domain Entities
//!
//! Identities, cryptographic value aliases, the weighted roster and the
//! weight thresholds used by quorum decisions.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::RosterError;

/// A 32-byte digest.
pub type Hash = [u8; 32];

/// A 64-byte Ed25519 signature.
pub type Signature = [u8; 64];

/// A 32-byte Ed25519 public key.
pub type PublicKey = [u8; 32];

/// Render the first bytes of a digest for log fields.
pub fn short_hex(hash: &Hash) -> String {
    hex::encode(&hash[..6])
}

/// Identifier of a node in the network roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node{}", self.0)
    }
}

/// One member of the roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub node_id: NodeId,
    /// Consensus weight (stake) of this node.
    pub weight: u64,
    pub public_key: PublicKey,
}

/// The weighted set of nodes participating in consensus.
///
/// Entry order is preserved; lookups by id go through an index.
#[derive(Clone, Debug)]
pub struct Roster {
    entries: Vec<RosterEntry>,
    index: HashMap<NodeId, usize>,
    total_weight: u64,
}

impl Roster {
    /// Build a roster, rejecting empty, duplicated or weightless rosters.
    pub fn new(entries: Vec<RosterEntry>) -> Result<Self, RosterError> {
        if entries.is_empty() {
            return Err(RosterError::Empty);
        }

        let mut index = HashMap::with_capacity(entries.len());
        let mut total_weight: u64 = 0;
        for (position, entry) in entries.iter().enumerate() {
            if index.insert(entry.node_id, position).is_some() {
                return Err(RosterError::DuplicateNode(entry.node_id));
            }
            total_weight = total_weight.saturating_add(entry.weight);
        }

        if total_weight == 0 {
            return Err(RosterError::ZeroTotalWeight);
        }

        Ok(Self {
            entries,
            index,
            total_weight,
        })
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, node_id: NodeId) -> bool {
        self.index.contains_key(&node_id)
    }

    /// Position of a node in roster order.
    pub fn index_of(&self, node_id: NodeId) -> Option<usize> {
        self.index.get(&node_id).copied()
    }

    pub fn entry(&self, node_id: NodeId) -> Option<&RosterEntry> {
        self.index_of(node_id).map(|i| &self.entries[i])
    }

    pub fn weight_of(&self, node_id: NodeId) -> Option<u64> {
        self.entry(node_id).map(|e| e.weight)
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().map(|e| e.node_id)
    }
}

/// Weight fractions used for quorum decisions.
///
/// | Threshold | Satisfied when |
/// |-----------|----------------|
/// | `StrongMinority` | `part >= 1/3 of whole` |
/// | `Majority` | `part > 1/2 of whole` |
/// | `SuperMajority` | `part > 2/3 of whole` |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Threshold {
    StrongMinority,
    Majority,
    SuperMajority,
}

impl Threshold {
    /// Whether `part` out of `whole` meets this threshold.
    pub fn is_satisfied_by(self, part: u64, whole: u64) -> bool {
        let part = u128::from(part);
        let whole = u128::from(whole);
        match self {
            Threshold::StrongMinority => 3 * part >= whole,
            Threshold::Majority => 2 * part > whole,
            Threshold::SuperMajority => 3 * part > 2 * whole,
        }
    }
}
