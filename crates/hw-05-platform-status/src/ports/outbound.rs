//! Driven Ports (SPI - Outbound)

use shared_types::PlatformStatus;

/// Receives every status change, in order.
pub trait StatusPublisher: Send + Sync {
    fn publish_status(&self, status: PlatformStatus);
}
