//! Driving Ports (API - Inbound)
//!
//! The contract the gossip and reconnect layers use to decide whether, and
//! with whom, to reconnect.

use shared_types::NodeId;

pub trait FallenBehindApi: Send + Sync {
    /// Record that `peer` told us we are behind. Idempotent per peer.
    fn report_fallen_behind(&self, peer: NodeId);

    /// Forget every report, typically after a successful reconnect.
    fn reset_fallen_behind(&self);

    fn has_fallen_behind(&self) -> bool;

    fn num_reported_fallen_behind(&self) -> usize;

    /// Whether `peer` is an acceptable reconnect source.
    fn should_reconnect_from(&self, peer: NodeId) -> bool;

    /// Reconcile the tracked peer set with a roster change.
    fn add_remove_peers(&self, added: &[NodeId], removed: &[NodeId]);
}

