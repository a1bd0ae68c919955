//! # Node Errors
//!
//! Everything that can stop the node from starting. Once the stages run,
//! failures are logged by the stage that hit them.

use hw_01_transaction_pool::PoolError;
use hw_02_event_creation::EventCreationError;
use hw_03_gossip_sync::SyncError;
use hw_04_state_validation::StateValidationError;
use hw_05_platform_status::PlatformStatusError;
use shared_types::{EventWindowError, RosterError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid roster: {0}")]
    Roster(#[from] RosterError),

    #[error("Invalid event window: {0}")]
    EventWindow(#[from] EventWindowError),

    #[error("Transaction pool: {0}")]
    Pool(#[from] PoolError),

    #[error("Event creation: {0}")]
    EventCreation(#[from] EventCreationError),

    #[error("Gossip sync: {0}")]
    Sync(#[from] SyncError),

    #[error("State validation: {0}")]
    StateValidation(#[from] StateValidationError),

    #[error("Platform status: {0}")]
    PlatformStatus(#[from] PlatformStatusError),

    #[error("State store: {0}")]
    StateStore(String),

    #[error("Gossip transport: {0}")]
    Gossip(String),
}

pub type NodeResult<T> = Result<T, NodeError>;
