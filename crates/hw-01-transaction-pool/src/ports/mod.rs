//! Ports layer for the transaction pool.

pub mod inbound;
