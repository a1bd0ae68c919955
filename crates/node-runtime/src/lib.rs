//! # Node Runtime Library
//!
//! Wires the Hashweave subsystems into a running node. The main entry point
//! is the `main.rs` binary; the modules are public for integration tests.
//!
//! ## Modules
//!
//! - `container/` - configuration and subsystem construction
//! - `handlers/` - one stage per subsystem owner
//! - `wiring/` - channels between the stages and the [`NodeRuntime`] handle
//! - `ports` / `adapters/` - the ordering oracle, gossip transport and state
//!   store, with in-memory implementations

#![allow(clippy::type_complexity)]

pub mod adapters;
pub mod codec;
pub mod container;
pub mod errors;
pub mod handlers;
pub mod ports;
pub mod wiring;

pub use container::{NodeConfig, SubsystemContainer};
pub use errors::{NodeError, NodeResult};
pub use ports::{
    ConsensusRoundSource, GossipMessage, GossipTransport, ReconnectState, StateStore,
};
pub use wiring::{NodeRuntime, RuntimeCollaborators};
