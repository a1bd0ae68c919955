//! # Runtime Stages
//!
//! Each stage owns its subsystem exclusively and runs as one tokio task.
//!
//! ```text
//! ConsensusRoundSource ──→ [consensus] ──IssNotification──→ [iss] ──┐
//!                              │  └──WindowUpdate─┐                 │
//!                              │                  ▼                 │
//!  GossipMessage ───────────────────────→ [event creation] ──→ GossipTransport
//!                              │                  ▲                 │
//!                              ▼                  │ status watch    ▼
//!                     PlatformStatusAction ──→ [status] ←───────────┘
//! ```

pub mod consensus;
pub mod event_creation;
pub mod health;
pub mod iss;
pub mod status;

pub use consensus::{ConsensusRoundHandler, WindowUpdate};
pub use event_creation::EventCreationStage;
pub use health::HealthMonitor;
pub use iss::IssStage;
pub use status::StatusStage;
