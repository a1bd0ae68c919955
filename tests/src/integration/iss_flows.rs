//! # ISS Flows
//!
//! ISS Detector ──→ ISS Handler ──→ Platform Status Manager ──→ Event Creation
//!
//! A disagreement about this node's own state halts event creation; a
//! disagreement elsewhere is only reported.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hw_02_event_creation::{EventCreationApi, EventCreationStatus};
    use hw_04_state_validation::{IssDetector, IssDetectorConfig, IssHandler, IssObserver};
    use hw_05_platform_status::{
        PlatformStatusApi, PlatformStatusConfig, PlatformStatusManager, WatchStatusPublisher,
    };
    use shared_types::{
        IssNotification, IssType, ManualTimeSource, NodeId, PlatformStatus,
        PlatformStatusAction,
    };
    use proptest::prelude::*;
    use tokio::sync::watch;

    use crate::fixtures::{hashed_state, roster, state_signature, RecordingSubmitter, TestNode};

    const H: [u8; 32] = [0x11; 32];
    const H_OTHER: [u8; 32] = [0x22; 32];

    struct Platform {
        detector: IssDetector,
        handler: IssHandler,
        actions: Arc<RecordingSubmitter>,
        status: PlatformStatusManager,
        statuses: watch::Receiver<PlatformStatus>,
        node: TestNode,
    }

    impl Platform {
        fn new() -> Self {
            let roster = roster(4);
            let clock = Arc::new(ManualTimeSource::new(0));
            let mut detector =
                IssDetector::new(NodeId(0), roster.clone(), &IssDetectorConfig::default())
                    .unwrap();
            detector.signal_end_of_preconsensus_replay();

            let actions = Arc::new(RecordingSubmitter::new());
            let handler = IssHandler::new(actions.clone());
            let (publisher, statuses) = WatchStatusPublisher::channel();
            let config = PlatformStatusConfig {
                observing_status_delay_ms: 0,
                ..PlatformStatusConfig::default()
            };
            let mut status =
                PlatformStatusManager::new(&config, clock.clone(), vec![Arc::new(publisher)])
                    .unwrap();
            for action in [
                PlatformStatusAction::StartedReplayingEvents,
                PlatformStatusAction::DoneReplayingEvents,
                PlatformStatusAction::TimeElapsed { now: 0 },
            ] {
                status.process_action(action);
            }
            assert_eq!(status.current_status(), PlatformStatus::Checking);

            let mut node = TestNode::new(0, roster, clock);
            node.set_status(status.current_status());
            Self {
                detector,
                handler,
                actions,
                status,
                statuses,
                node,
            }
        }

        /// Run the ISS handler on every notification and feed the resulting
        /// actions through the status machine into event creation.
        fn propagate(&mut self, notifications: Vec<IssNotification>) {
            for notification in notifications {
                self.handler.iss_observed(notification);
            }
            for action in self.actions.drain() {
                self.status.process_action(action);
            }
            let status = *self.statuses.borrow();
            self.node.set_status(status);
        }
    }

    #[test]
    fn test_self_iss_halts_event_creation() {
        let mut platform = Platform::new();
        assert!(platform.node.manager.maybe_create_event().is_some());

        let mut notifications = platform.detector.handle_state(hashed_state(1, H));
        notifications.extend(platform.detector.handle_state_signature_transactions(&[
            state_signature(1, 1, H_OTHER),
            state_signature(2, 1, H_OTHER),
            state_signature(3, 1, H_OTHER),
        ]));
        assert_eq!(notifications, vec![IssNotification::new(1, IssType::SelfIss)]);

        platform.propagate(notifications);
        assert_eq!(
            platform.status.current_status(),
            PlatformStatus::CatastrophicFailure
        );
        assert!(platform.node.manager.maybe_create_event().is_none());
        assert_eq!(
            platform.node.manager.status(),
            EventCreationStatus::PlatformStatus
        );
        assert!(!platform
            .node
            .pool
            .submit_application_transaction(b"after halt".to_vec()));
    }

    #[test]
    fn test_catastrophic_iss_halts_event_creation() {
        let mut platform = Platform::new();
        let mut notifications = platform.detector.handle_state(hashed_state(1, H));
        notifications.extend(platform.detector.handle_state_signature_transactions(&[
            state_signature(1, 1, [0xA1; 32]),
            state_signature(2, 1, [0xA2; 32]),
            state_signature(3, 1, [0xA3; 32]),
        ]));
        assert_eq!(
            notifications,
            vec![IssNotification::new(1, IssType::CatastrophicIss)]
        );

        platform.propagate(notifications);
        assert!(platform.node.manager.maybe_create_event().is_none());
    }

    #[test]
    fn test_other_iss_keeps_node_creating_events() {
        let mut platform = Platform::new();
        let mut notifications = platform.detector.handle_state(hashed_state(1, H));
        notifications.extend(platform.detector.handle_state_signature_transactions(&[
            state_signature(0, 1, H),
            state_signature(1, 1, H),
            state_signature(2, 1, H),
            state_signature(3, 1, H_OTHER),
        ]));
        assert_eq!(notifications, vec![IssNotification::new(1, IssType::OtherIss)]);

        platform.propagate(notifications);
        assert!(platform.actions.actions().is_empty());
        assert_eq!(platform.status.current_status(), PlatformStatus::Checking);
        assert!(platform.node.manager.maybe_create_event().is_some());
    }

    #[test]
    fn test_iss_notified_once_per_round() {
        let mut platform = Platform::new();
        let mut notifications = platform.detector.handle_state(hashed_state(1, H));
        for signer in 1..4 {
            notifications.extend(
                platform
                    .detector
                    .handle_state_signature_transactions(&[state_signature(signer, 1, H_OTHER)]),
            );
        }
        let later = platform.detector.handle_state(hashed_state(2, H));
        assert_eq!(notifications.len(), 1);
        assert!(later.is_empty());
    }

    proptest! {
        #[test]
        fn prop_single_dissenter_never_halts(
            dissenter in proptest::option::of(1u64..4),
            signatures_first in any::<bool>(),
        ) {
            let mut platform = Platform::new();
            let mut notifications = platform.detector.handle_state(hashed_state(1, H));
            let signatures: Vec<_> = (0..4)
                .map(|signer| {
                    let hash = if Some(signer) == dissenter { H_OTHER } else { H };
                    state_signature(signer, 2, hash)
                })
                .collect();
            if signatures_first {
                notifications.extend(platform.detector.handle_state_signature_transactions(&signatures));
                notifications.extend(platform.detector.handle_state(hashed_state(2, H)));
            } else {
                notifications.extend(platform.detector.handle_state(hashed_state(2, H)));
                notifications.extend(platform.detector.handle_state_signature_transactions(&signatures));
            }

            let expected = match dissenter {
                Some(_) => vec![IssNotification::new(2, IssType::OtherIss)],
                None => vec![],
            };
            prop_assert_eq!(&notifications, &expected);
            platform.propagate(notifications);
            prop_assert!(platform.actions.actions().is_empty());
            prop_assert_eq!(platform.status.current_status(), PlatformStatus::Checking);
        }
    }
}
