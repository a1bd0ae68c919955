//! Driven Ports (SPI - Outbound Dependencies)
//!
//! Fallen-behind transitions leave through the platform-wide
//! [`StatusActionSubmitter`].

pub use shared_types::StatusActionSubmitter;
