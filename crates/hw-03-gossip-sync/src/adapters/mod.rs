//! Adapters for the gossip sync ports.

pub mod channel;

pub use channel::ChannelStatusActionSubmitter;
