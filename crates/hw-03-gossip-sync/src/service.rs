//! Sync Manager - fallen-behind state for the platform and for metrics

use std::sync::Arc;

use shared_types::{EventWindow, NodeId};
use tracing::debug;

use crate::domain::{get_status, FallenBehindManager, SyncFallenBehindStatus};
use crate::metrics;
use crate::ports::inbound::FallenBehindApi;

#[derive(Clone, Debug)]
pub struct SyncManager {
    fallen_behind: Arc<FallenBehindManager>,
}

impl SyncManager {
    pub fn new(fallen_behind: Arc<FallenBehindManager>) -> Self {
        Self { fallen_behind }
    }

    /// Compare windows at the start of a sync with `peer`, reporting the peer
    /// if it sees us behind. The sync must not proceed unless the result is
    /// `NoneFallenBehind`.
    pub fn check_sync_status(
        &self,
        self_window: &EventWindow,
        peer_window: &EventWindow,
        peer: NodeId,
    ) -> SyncFallenBehindStatus {
        let status = get_status(self_window, peer_window);
        metrics::record_sync_status(status.as_str());
        match status {
            SyncFallenBehindStatus::SelfFallenBehind => self.report_fallen_behind(peer),
            SyncFallenBehindStatus::OtherFallenBehind => {
                debug!(%peer, "Peer has fallen behind us, skipping sync");
            }
            SyncFallenBehindStatus::NoneFallenBehind => {}
        }
        status
    }

    fn refresh_gauges(&self) -> (bool, usize) {
        let (behind, reported) = self.fallen_behind.snapshot();
        metrics::set_fallen_behind(behind, reported);
        (behind, reported)
    }
}

impl FallenBehindApi for SyncManager {
    fn report_fallen_behind(&self, peer: NodeId) {
        self.fallen_behind.report_fallen_behind(peer);
        self.refresh_gauges();
    }

    fn reset_fallen_behind(&self) {
        self.fallen_behind.reset_fallen_behind();
        self.refresh_gauges();
    }

    fn has_fallen_behind(&self) -> bool {
        self.refresh_gauges().0
    }

    fn num_reported_fallen_behind(&self) -> usize {
        self.refresh_gauges().1
    }

    fn should_reconnect_from(&self, peer: NodeId) -> bool {
        self.fallen_behind.should_reconnect_from(peer)
    }

    fn add_remove_peers(&self, added: &[NodeId], removed: &[NodeId]) {
        self.fallen_behind.add_remove_peers(added, removed);
        self.refresh_gauges();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ChannelStatusActionSubmitter;
    use crate::domain::FallenBehindThreshold;
    use shared_types::{AncientMode, PlatformStatusAction};

    // The gauges are process-wide, so tests that drive them take turns.
    static GAUGES: parking_lot::Mutex<()> = parking_lot::const_mutex(());

    fn window(expired: u64, ancient: u64) -> EventWindow {
        EventWindow::new(ancient + 5, ancient + 6, ancient, expired, AncientMode::BirthRound).unwrap()
    }

    #[tokio::test]
    async fn test_behind_handshakes_trigger_fallen_behind_action() {
        let _gauges = GAUGES.lock();
        let (submitter, mut actions) = ChannelStatusActionSubmitter::channel();
        let manager = SyncManager::new(Arc::new(FallenBehindManager::new(
            [NodeId(1), NodeId(2), NodeId(3)],
            FallenBehindThreshold::default(),
            Arc::new(submitter),
        )));
        let ours = window(1, 5);
        let theirs = window(20, 30);

        assert_eq!(
            manager.check_sync_status(&ours, &theirs, NodeId(1)),
            SyncFallenBehindStatus::SelfFallenBehind
        );
        assert!(!manager.has_fallen_behind());
        manager.check_sync_status(&ours, &theirs, NodeId(2));
        assert!(manager.has_fallen_behind());
        assert_eq!(actions.recv().await, Some(PlatformStatusAction::FallenBehind));

        assert!(manager.should_reconnect_from(NodeId(2)));
        assert!(!manager.should_reconnect_from(NodeId(3)));

        manager.reset_fallen_behind();
        assert!(!manager.has_fallen_behind());
        assert_eq!(manager.num_reported_fallen_behind(), 0);
    }

    #[test]
    fn test_peer_behind_is_not_reported() {
        let _gauges = GAUGES.lock();
        let (submitter, _actions) = ChannelStatusActionSubmitter::channel();
        let manager = SyncManager::new(Arc::new(FallenBehindManager::new(
            [NodeId(1)],
            FallenBehindThreshold::default(),
            Arc::new(submitter),
        )));
        assert_eq!(
            manager.check_sync_status(&window(20, 30), &window(1, 5), NodeId(1)),
            SyncFallenBehindStatus::OtherFallenBehind
        );
        assert_eq!(manager.num_reported_fallen_behind(), 0);
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn test_gauges_follow_reports_without_a_query() {
        let _gauges = GAUGES.lock();
        let (submitter, _actions) = ChannelStatusActionSubmitter::channel();
        let manager = SyncManager::new(Arc::new(FallenBehindManager::new(
            [NodeId(1), NodeId(2), NodeId(3)],
            FallenBehindThreshold::default(),
            Arc::new(submitter),
        )));
        manager.reset_fallen_behind();
        assert_eq!(metrics::NUM_REPORTED_FALLEN_BEHIND.get(), 0);

        manager.report_fallen_behind(NodeId(1));
        assert_eq!(metrics::NUM_REPORTED_FALLEN_BEHIND.get(), 1);
        assert_eq!(metrics::HAS_FALLEN_BEHIND.get(), 0);

        manager.report_fallen_behind(NodeId(2));
        assert_eq!(metrics::NUM_REPORTED_FALLEN_BEHIND.get(), 2);
        assert_eq!(metrics::HAS_FALLEN_BEHIND.get(), 1);

        manager.add_remove_peers(&[], &[NodeId(1)]);
        assert_eq!(metrics::NUM_REPORTED_FALLEN_BEHIND.get(), 1);
    }
}
