//! Driven ports.

pub use shared_types::StatusActionSubmitter;
