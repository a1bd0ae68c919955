//! # State Hasher
//!
//! Computes the merkle root of a handled round's state and stores it in the
//! state itself.

use std::time::Instant;

use shared_crypto::merkle_root;
use tracing::{debug, warn};

use super::config::StateHasherConfig;
use super::signed_state::{ReservedSignedState, StateWithHashComplexity};
use crate::metrics;

#[derive(Clone, Debug, Default)]
pub struct StateHasher {
    config: StateHasherConfig,
}

impl StateHasher {
    pub fn new(config: StateHasherConfig) -> Self {
        Self { config }
    }

    /// Hash the state in place and hand the same reservation back.
    ///
    /// Returns `None` only for a null or already closed reservation.
    pub fn hash_state(&self, input: StateWithHashComplexity) -> Option<ReservedSignedState> {
        let StateWithHashComplexity {
            reserved_state,
            hash_complexity,
        } = input;

        let state = reserved_state.get()?;
        let started = Instant::now();
        let hash = merkle_root(state.leaves());
        state.set_hash(hash);
        let elapsed = started.elapsed();

        metrics::observe_state_hash(elapsed);
        if elapsed > self.config.slow_hash_warning() {
            warn!(
                round = state.round(),
                hash_complexity,
                elapsed_ms = elapsed.as_millis() as u64,
                "State hashing was slow"
            );
        } else {
            debug!(
                round = state.round(),
                hash_complexity,
                hash = %shared_types::short_hex(&hash),
                "State hashed"
            );
        }

        Some(reserved_state)
    }
}
