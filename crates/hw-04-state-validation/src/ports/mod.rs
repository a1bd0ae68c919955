//! Ports for state validation.

pub mod inbound;
pub mod outbound;
