//! # Subsystem Container
//!
//! Configuration and construction of every subsystem of a node.

pub mod config;
pub mod subsystems;

pub use config::{NodeConfig, RosterMemberConfig, RuntimeConfig};
pub use subsystems::SubsystemContainer;
