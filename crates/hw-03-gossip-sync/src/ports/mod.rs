//! Ports for the gossip sync subsystem.

pub mod inbound;
pub mod outbound;
