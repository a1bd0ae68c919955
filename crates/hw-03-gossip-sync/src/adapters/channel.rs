//! Status actions over a tokio channel to the status machine stage.

use shared_types::PlatformStatusAction;
use tokio::sync::mpsc;
use tracing::warn;

use crate::ports::outbound::StatusActionSubmitter;

/// Unbounded so that peer threads never block and no action is dropped
/// while the receiver is alive.
#[derive(Clone, Debug)]
pub struct ChannelStatusActionSubmitter {
    sender: mpsc::UnboundedSender<PlatformStatusAction>,
}

impl ChannelStatusActionSubmitter {
    pub fn new(sender: mpsc::UnboundedSender<PlatformStatusAction>) -> Self {
        Self { sender }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PlatformStatusAction>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl StatusActionSubmitter for ChannelStatusActionSubmitter {
    fn submit_status_action(&self, action: PlatformStatusAction) {
        if let Err(err) = self.sender.send(action) {
            warn!(action = ?err.0, "Status machine stage is gone, dropping status action");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_actions_arrive_in_order() {
        let (submitter, mut receiver) = ChannelStatusActionSubmitter::channel();
        submitter.submit_status_action(PlatformStatusAction::FallenBehind);
        submitter.submit_status_action(PlatformStatusAction::CatastrophicFailure);

        assert_eq!(receiver.recv().await, Some(PlatformStatusAction::FallenBehind));
        assert_eq!(receiver.recv().await, Some(PlatformStatusAction::CatastrophicFailure));
    }

    #[test]
    fn test_closed_receiver_does_not_panic() {
        let (submitter, receiver) = ChannelStatusActionSubmitter::channel();
        drop(receiver);
        submitter.submit_status_action(PlatformStatusAction::FallenBehind);
    }
}
