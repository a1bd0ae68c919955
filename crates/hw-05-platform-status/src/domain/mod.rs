//! Domain layer for the platform status subsystem.

pub mod config;
pub mod errors;
pub mod state_machine;

pub use config::PlatformStatusConfig;
pub use errors::{PlatformStatusError, PlatformStatusResult};
pub use state_machine::PlatformStatusStateMachine;
