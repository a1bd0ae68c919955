//! Domain layer for gossip sync.

pub mod config;
pub mod errors;
pub mod evaluator;
pub mod fallen_behind;

pub use config::{FallenBehindThreshold, SyncConfig};
pub use errors::{SyncError, SyncResult};
pub use evaluator::{get_status, SyncFallenBehindStatus};
pub use fallen_behind::FallenBehindManager;
