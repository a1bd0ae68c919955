//! Ports for the platform status subsystem.

pub mod inbound;
pub mod outbound;
