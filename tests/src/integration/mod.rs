//! # Integration Tests
//!
//! Cross-subsystem flows composed directly from the subsystem crates.

pub mod fallen_behind_flows;
pub mod gossip_flows;
pub mod iss_flows;
