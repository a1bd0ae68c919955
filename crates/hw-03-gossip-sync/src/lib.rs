//! # Gossip Sync Subsystem
//!
//! **Subsystem ID:** 3
//!
//! ## Purpose
//!
//! Detects that this node has fallen too far behind its peers to catch up
//! through gossip, and tells the reconnect layer when and from whom to
//! fetch a full state instead.
//!
//! ## Flow
//!
//! ```text
//! sync handshake ──→ get_status(self_window, peer_window)
//!                        │
//!                        ├── SELF_FALLEN_BEHIND ──→ report_fallen_behind(peer)
//!                        │                              │ threshold first exceeded
//!                        │                              ▼
//!                        │                     PlatformStatusAction::FallenBehind
//!                        └── otherwise ──────────→ sync proceeds or is skipped
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | A report is cleared only by reset or peer removal | `domain/fallen_behind.rs` |
//! | INVARIANT-2 | Reported count equals distinct tracked reporters | `domain/fallen_behind.rs` - `HashSet` under one lock |
//! | INVARIANT-3 | Both sides of a comparison agree on who is behind | `domain/evaluator.rs` - `get_status()` |

pub mod adapters;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::ChannelStatusActionSubmitter;
pub use domain::{
    get_status, FallenBehindManager, FallenBehindThreshold, SyncConfig, SyncError,
    SyncFallenBehindStatus, SyncResult,
};
pub use ports::inbound::FallenBehindApi;
pub use ports::outbound::StatusActionSubmitter;
pub use service::SyncManager;
