//! # Signed States and Reservations
//!
//! A [`SignedState`] is shared between the stages that hash, validate and
//! persist it. Each holder keeps a [`ReservedSignedState`] guard; the state's
//! reservation count is the number of live guards. Dropping or closing a
//! guard releases its reservation exactly once.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use shared_types::{Hash, Timestamp};

/// The state resulting from handling one consensus round.
pub struct SignedState {
    round: u64,
    consensus_timestamp: Timestamp,
    leaves: Vec<Vec<u8>>,
    hash: RwLock<Option<Hash>>,
    reservations: AtomicUsize,
}

impl SignedState {
    pub fn new(round: u64, consensus_timestamp: Timestamp, leaves: Vec<Vec<u8>>) -> Arc<Self> {
        Arc::new(Self {
            round,
            consensus_timestamp,
            leaves,
            hash: RwLock::new(None),
            reservations: AtomicUsize::new(0),
        })
    }

    /// A state whose hash is already known, e.g. loaded from disk.
    pub fn with_hash(round: u64, consensus_timestamp: Timestamp, hash: Hash) -> Arc<Self> {
        let state = Self::new(round, consensus_timestamp, Vec::new());
        state.set_hash(hash);
        state
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn consensus_timestamp(&self) -> Timestamp {
        self.consensus_timestamp
    }

    pub fn leaves(&self) -> &[Vec<u8>] {
        &self.leaves
    }

    /// `None` until the state hasher has run.
    pub fn hash(&self) -> Option<Hash> {
        *self.hash.read()
    }

    pub fn set_hash(&self, hash: Hash) {
        *self.hash.write() = Some(hash);
    }

    pub fn reservation_count(&self) -> usize {
        self.reservations.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for SignedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedState")
            .field("round", &self.round)
            .field("leaves", &self.leaves.len())
            .field("hash", &self.hash().map(|h| shared_types::short_hex(&h)))
            .field("reservations", &self.reservation_count())
            .finish()
    }
}

/// Ownership token for one reservation on a [`SignedState`].
pub struct ReservedSignedState {
    state: Option<Arc<SignedState>>,
    reason: &'static str,
    closed: bool,
}

impl ReservedSignedState {
    pub fn new(state: Arc<SignedState>, reason: &'static str) -> Self {
        state.reservations.fetch_add(1, Ordering::SeqCst);
        Self {
            state: Some(state),
            reason,
            closed: false,
        }
    }

    /// A guard holding no state.
    pub fn null() -> Self {
        Self {
            state: None,
            reason: "null",
            closed: false,
        }
    }

    pub fn is_null(&self) -> bool {
        self.state.is_none() && !self.closed
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn reason(&self) -> &'static str {
        self.reason
    }

    /// The state, unless this guard is null or closed.
    pub fn get(&self) -> Option<&SignedState> {
        self.state.as_deref()
    }

    /// A second, independent reservation on the same state.
    pub fn get_and_reserve(&self, reason: &'static str) -> ReservedSignedState {
        match &self.state {
            Some(state) => ReservedSignedState::new(Arc::clone(state), reason),
            None => ReservedSignedState::null(),
        }
    }

    /// Release the reservation. Closing a closed guard does nothing.
    pub fn close(&mut self) {
        if let Some(state) = self.state.take() {
            state.reservations.fetch_sub(1, Ordering::SeqCst);
            self.closed = true;
        }
    }
}

impl Drop for ReservedSignedState {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for ReservedSignedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReservedSignedState")
            .field("reason", &self.reason)
            .field("round", &self.state.as_ref().map(|s| s.round))
            .field("closed", &self.closed)
            .finish()
    }
}

/// A freshly handled state plus a hint of how expensive hashing it will be.
#[derive(Debug)]
pub struct StateWithHashComplexity {
    pub reserved_state: ReservedSignedState,
    pub hash_complexity: u64,
}

impl StateWithHashComplexity {
    pub fn new(reserved_state: ReservedSignedState, hash_complexity: u64) -> Self {
        Self {
            reserved_state,
            hash_complexity,
        }
    }
}
