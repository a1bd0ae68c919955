//! # State Validation Subsystem
//!
//! **Subsystem ID:** 4
//!
//! ## Purpose
//!
//! Hashes the state produced by each consensus round and checks that the
//! network agrees on it. A disagreement (an inconsistent state signature,
//! ISS) involving this node halts the platform.
//!
//! ## Flow
//!
//! ```text
//! consensus round ──→ StateHasher::hash_state ──→ IssDetector::handle_state
//!                                                        │
//! state signature txs ──→ handle_state_signature_transactions
//!                                                        │
//!                                              IssNotification (once per round)
//!                                                        ▼
//!                                    IssHandler ──→ CatastrophicFailure action
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | At most one notification per round | `domain/round.rs` - `notified` flag |
//! | INVARIANT-2 | One hash per signer per round | `domain/round.rs` - `add_signature()` |
//! | INVARIANT-3 | Reservations are released by the detector | `domain/iss_detector.rs` - `release()` |
//! | INVARIANT-4 | Only self or catastrophic ISS change platform status | `domain/mapping.rs` |

pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;

pub use domain::{
    map_iss_to_status_action, IssDetector, IssDetectorConfig, ReservedSignedState,
    RoundHashTally, SignedState, StateHasher, StateHasherConfig, StateValidationError,
    StateValidationResult, StateWithHashComplexity, DO_NOT_IGNORE_ROUNDS,
};
pub use ports::inbound::{IssDetectionApi, IssObserver};
pub use ports::outbound::StatusActionSubmitter;
pub use service::IssHandler;
