//! # Event Creation Subsystem
//!
//! **Subsystem ID:** 2
//!
//! ## Purpose
//!
//! Decides when this node may create a self event, picks its parents,
//! fills it from the transaction pool, then hashes and signs it for gossip.
//!
//! ## Pipeline
//!
//! ```text
//! [Transaction Pool] ──┐
//!                      ├──→ EventCreationRules ──→ TipsetEventCreator
//! [Platform Status] ───┘                                 │ UnsignedEvent
//!                                                        ▼
//!                                   EventHasher ──→ SelfEventSigner ──→ gossip
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | No event is created while any rule forbids it | `service.rs` - `maybe_create_event()` |
//! | INVARIANT-2 | No parent lies outside the current event window | `domain/creator.rs` - ancient filters |
//! | INVARIANT-3 | Equal events hash to equal digests on every node | `domain/hasher.rs` - fixed byte layout |
//! | INVARIANT-4 | The event window never moves backwards | `domain/creator.rs` - `set_event_window()` |
//!
//! ## Module Structure
//!
//! ```text
//! domain/rules.rs         - rate, status and health rules
//! domain/tipset.rs        - tipsets and advancement weights
//! domain/childless.rs     - other-parent candidates
//! domain/creator.rs       - TipsetEventCreator
//! domain/future_buffer.rs - events born ahead of the local window
//! domain/hasher.rs        - EventHasher
//! domain/signer.rs        - SelfEventSigner
//! service.rs              - EventCreationManager
//! ```

pub mod adapters;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::KeyPairHashSigner;
pub use domain::{
    EventCreationConfig, EventCreationError, EventCreationResult, EventCreationRules,
    EventCreationStatus, EventHasher, SelfEventSigner, TipsetEventCreator,
};
pub use ports::inbound::EventCreationApi;
pub use ports::outbound::{HashSigner, PendingSystemTransactions, TransactionSupplier};
pub use service::{EventCreationDependencies, EventCreationManager};
