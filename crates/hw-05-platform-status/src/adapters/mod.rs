//! Adapters for the platform status ports.

pub mod watch;

pub use watch::WatchStatusPublisher;
