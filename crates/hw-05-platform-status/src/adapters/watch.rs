//! Status changes over a `tokio::sync::watch` channel.

use shared_types::PlatformStatus;
use tokio::sync::watch;
use tracing::debug;

use crate::ports::outbound::StatusPublisher;

/// Subscribers see the latest status; intermediate values may be skipped by
/// slow readers. The latest status is kept even while nobody subscribes.
#[derive(Debug)]
pub struct WatchStatusPublisher {
    sender: watch::Sender<PlatformStatus>,
}

impl WatchStatusPublisher {
    pub fn channel() -> (Self, watch::Receiver<PlatformStatus>) {
        let (sender, receiver) = watch::channel(PlatformStatus::default());
        (Self { sender }, receiver)
    }

    pub fn subscribe(&self) -> watch::Receiver<PlatformStatus> {
        self.sender.subscribe()
    }
}

impl StatusPublisher for WatchStatusPublisher {
    fn publish_status(&self, status: PlatformStatus) {
        self.sender.send_replace(status);
        if self.sender.receiver_count() == 0 {
            debug!(%status, "No status subscribers yet");
        }
    }
}
