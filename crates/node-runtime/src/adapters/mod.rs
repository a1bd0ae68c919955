//! # Adapter Implementations
//!
//! Concrete implementations of the runtime's collaborator ports and of the
//! subsystem outbound ports that need runtime wiring.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  OUTER LAYER (Adapters)                      │
//! │  LoopbackOrdering, InMemoryStateStore, PoolStatusPublisher   │
//! └──────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌──────────────────────────────────────────────────────────────┐
//! │  ConsensusRoundSource, GossipTransport, StateStore,          │
//! │  StatusPublisher                                             │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod loopback;
pub mod memory;
pub mod status;

pub use loopback::LoopbackOrdering;
pub use memory::{ChannelRoundSource, InMemoryStateStore, RecordingGossip};
pub use status::PoolStatusPublisher;
