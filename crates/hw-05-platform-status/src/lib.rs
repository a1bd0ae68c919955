//! # Platform Status Subsystem
//!
//! **Subsystem ID:** 5
//!
//! ## Purpose
//!
//! Owns the node's operating mode. Every other subsystem reports what
//! happened as a `PlatformStatusAction`; this crate alone decides the
//! resulting `PlatformStatus` and publishes each change.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | `CATASTROPHIC_FAILURE` is terminal | `domain/state_machine.rs` - `next_status()` |
//! | INVARIANT-2 | Transitions are a pure function of status, action and time | `domain/state_machine.rs` |
//! | INVARIANT-3 | Only actual changes are published | `service.rs` - `process_action()` |

pub mod adapters;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::WatchStatusPublisher;
pub use domain::{
    PlatformStatusConfig, PlatformStatusError, PlatformStatusResult, PlatformStatusStateMachine,
};
pub use ports::inbound::PlatformStatusApi;
pub use ports::outbound::StatusPublisher;
pub use service::PlatformStatusManager;
