//! Ports for the event creation subsystem.

pub mod inbound;
pub mod outbound;
