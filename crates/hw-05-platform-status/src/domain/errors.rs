//! Error types for the platform status subsystem.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformStatusError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type PlatformStatusResult<T> = Result<T, PlatformStatusError>;
