//! # Fallen-Behind Flows
//!
//! Sync Manager ──FallenBehind──→ Platform Status Manager ──BEHIND──→ Event Creation
//!
//! Reconnect: reset reports, clear creation and pool, adopt the reconnect
//! window, then `ReconnectComplete` and `StateWrittenToDisk` bring the node
//! back to CHECKING.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hw_02_event_creation::{EventCreationApi, EventCreationStatus, EventHasher};
    use hw_03_gossip_sync::{
        FallenBehindApi, FallenBehindManager, FallenBehindThreshold, SyncFallenBehindStatus,
        SyncManager,
    };
    use hw_05_platform_status::{PlatformStatusApi, PlatformStatusConfig, PlatformStatusManager};
    use shared_types::{
        AncientMode, EventWindow, ManualTimeSource, NodeId, PlatformEvent, PlatformStatus,
        PlatformStatusAction, UnsignedEvent,
    };

    use crate::fixtures::{roster, RecordingSubmitter, TestNode};

    struct Platform {
        sync: SyncManager,
        actions: Arc<RecordingSubmitter>,
        status: PlatformStatusManager,
        node: TestNode,
    }

    impl Platform {
        fn new() -> Self {
            let roster = roster(4);
            let clock = Arc::new(ManualTimeSource::new(0));
            let actions = Arc::new(RecordingSubmitter::new());
            let fallen_behind = FallenBehindManager::new(
                roster.node_ids().filter(|id| *id != NodeId(0)),
                FallenBehindThreshold::default(),
                actions.clone(),
            );
            let config = PlatformStatusConfig {
                observing_status_delay_ms: 0,
                ..PlatformStatusConfig::default()
            };
            let mut status = PlatformStatusManager::new(&config, clock.clone(), vec![]).unwrap();
            for action in [
                PlatformStatusAction::StartedReplayingEvents,
                PlatformStatusAction::DoneReplayingEvents,
                PlatformStatusAction::TimeElapsed { now: 0 },
            ] {
                status.process_action(action);
            }
            let mut node = TestNode::new(0, roster, clock);
            node.set_status(status.current_status());
            Self {
                sync: SyncManager::new(Arc::new(fallen_behind)),
                actions,
                status,
                node,
            }
        }

        fn apply(&mut self, action: PlatformStatusAction) {
            self.status.process_action(action);
            self.node.set_status(self.status.current_status());
        }

        fn drain_actions(&mut self) {
            for action in self.actions.drain() {
                self.apply(action);
            }
        }

        fn sync_with(&mut self, peer: u64, peer_window: EventWindow) -> SyncFallenBehindStatus {
            let own = self.node.manager.current_event_window();
            self.sync.check_sync_status(&own, &peer_window, NodeId(peer))
        }
    }

    fn window(latest: u64, ancient: u64) -> EventWindow {
        EventWindow::new(latest, latest + 1, ancient, ancient, AncientMode::BirthRound).unwrap()
    }

    fn peer_event(creator: u64, birth_round: u64) -> PlatformEvent {
        EventHasher::new().hash_event(UnsignedEvent {
            creator: NodeId(creator),
            self_parent: None,
            other_parents: vec![],
            birth_round,
            generation: 10,
            time_created: 5,
            transactions: vec![],
        })
    }

    #[test]
    fn test_fallen_behind_suppresses_creation() {
        let mut platform = Platform::new();
        assert!(platform.node.manager.maybe_create_event().is_some());

        let ahead = window(200, 150);
        assert_eq!(
            platform.sync_with(1, ahead),
            SyncFallenBehindStatus::SelfFallenBehind
        );
        assert!(platform.actions.actions().is_empty());
        platform.sync_with(2, ahead);
        assert_eq!(
            platform.actions.actions(),
            vec![PlatformStatusAction::FallenBehind]
        );

        platform.drain_actions();
        assert_eq!(platform.status.current_status(), PlatformStatus::Behind);
        assert!(platform.node.manager.maybe_create_event().is_none());
        assert_eq!(
            platform.node.manager.status(),
            EventCreationStatus::PlatformStatus
        );
        assert!(platform.sync.should_reconnect_from(NodeId(1)));
        assert!(!platform.sync.should_reconnect_from(NodeId(3)));
    }

    #[test]
    fn test_peers_behind_us_are_not_reports() {
        let mut platform = Platform::new();
        platform.node.manager.set_event_window(window(300, 250));
        let behind = window(100, 50);
        for peer in 1..4 {
            assert_eq!(
                platform.sync_with(peer, behind),
                SyncFallenBehindStatus::OtherFallenBehind
            );
        }
        assert!(!platform.sync.has_fallen_behind());
        assert!(platform.actions.actions().is_empty());
    }

    #[test]
    fn test_recovery_after_reconnect() {
        let mut platform = Platform::new();
        assert!(platform.node.manager.maybe_create_event().is_some());
        assert!(platform
            .node
            .pool
            .submit_system_transaction(b"stale signature".to_vec()));

        let ahead = window(200, 150);
        for peer in 1..3 {
            platform.sync_with(peer, ahead);
        }
        platform.drain_actions();
        assert_eq!(platform.status.current_status(), PlatformStatus::Behind);

        // Reconnect to the peers' state at round 200.
        platform.sync.reset_fallen_behind();
        platform.node.manager.clear();
        platform.node.pool.clear();
        platform.node.manager.set_event_window(ahead);
        platform.apply(PlatformStatusAction::ReconnectComplete { round: 200 });
        assert_eq!(
            platform.status.current_status(),
            PlatformStatus::ReconnectComplete
        );
        platform.apply(PlatformStatusAction::StateWrittenToDisk {
            round: 200,
            is_freeze_state: false,
        });
        assert_eq!(platform.status.current_status(), PlatformStatus::Checking);

        assert!(!platform.sync.has_fallen_behind());
        assert!(!platform.node.pool.has_buffered_system_transactions());
        assert_eq!(
            platform.sync_with(1, ahead),
            SyncFallenBehindStatus::NoneFallenBehind
        );

        // Earlier self events are unknown now: no parentless event.
        assert!(platform.node.manager.maybe_create_event().is_none());
        assert_eq!(
            platform.node.manager.status(),
            EventCreationStatus::NoEligibleParents
        );

        let peer = peer_event(1, 201);
        platform.node.manager.register_event(peer.clone());
        let event = platform
            .node
            .manager
            .maybe_create_event()
            .expect("peer event is a legal other parent");
        assert_eq!(event.event.other_parents, vec![peer.descriptor]);
        assert_eq!(event.event.birth_round, 201);
        assert_eq!(event.event.generation, 11);
    }
}
