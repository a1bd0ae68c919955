//! # Status Machine Stage
//!
//! The only owner of the platform status state machine. Actions arrive from
//! every other stage through one unbounded channel, so the machine sees them
//! in submission order. A periodic tick feeds `TimeElapsed`.

use std::sync::Arc;
use std::time::Duration;

use hw_05_platform_status::PlatformStatusApi;
use shared_types::{PlatformStatus, PlatformStatusAction, TimeSource};
use tokio::sync::{mpsc, watch};
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};

pub struct StatusStage {
    machine: Box<dyn PlatformStatusApi>,
    actions: mpsc::UnboundedReceiver<PlatformStatusAction>,
    tick_interval: Duration,
    time: Arc<dyn TimeSource>,
}

impl StatusStage {
    pub fn new(
        machine: Box<dyn PlatformStatusApi>,
        actions: mpsc::UnboundedReceiver<PlatformStatusAction>,
        tick_interval: Duration,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            machine,
            actions,
            tick_interval,
            time,
        }
    }

    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(status = %self.machine.current_status(), "Status stage started");
        let mut ticker = time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                action = self.actions.recv() => match action {
                    Some(action) => {
                        self.apply(action);
                    }
                    None => {
                        warn!("All status action submitters dropped");
                        break;
                    }
                },
                _ = ticker.tick() => {
                    let now = self.time.now();
                    self.apply(PlatformStatusAction::TimeElapsed { now });
                }
                _ = shutdown.changed() => break,
            }
        }
        info!(status = %self.machine.current_status(), "Status stage stopped");
    }

    pub fn apply(&mut self, action: PlatformStatusAction) -> Option<PlatformStatus> {
        let previous = self.machine.current_status();
        let next = self.machine.process_action(action)?;
        hw_telemetry::record_platform_status(previous.as_str(), next.as_str());
        Some(next)
    }

    pub fn current_status(&self) -> PlatformStatus {
        self.machine.current_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hw_05_platform_status::{PlatformStatusConfig, PlatformStatusManager, WatchStatusPublisher};
    use shared_types::ManualTimeSource;

    fn stage(
        time: Arc<ManualTimeSource>,
    ) -> (
        StatusStage,
        mpsc::UnboundedSender<PlatformStatusAction>,
        watch::Receiver<PlatformStatus>,
    ) {
        let (publisher, statuses) = WatchStatusPublisher::channel();
        let config = PlatformStatusConfig {
            observing_status_delay_ms: 10,
            active_status_delay_ms: 1_000,
        };
        let manager =
            PlatformStatusManager::new(&config, time.clone(), vec![Arc::new(publisher)]).unwrap();
        let (sender, receiver) = mpsc::unbounded_channel();
        let stage = StatusStage::new(
            Box::new(manager),
            receiver,
            Duration::from_millis(1),
            time,
        );
        (stage, sender, statuses)
    }

    #[test]
    fn test_apply_reports_only_changes() {
        let time = Arc::new(ManualTimeSource::new(0));
        let (mut stage, _sender, _statuses) = stage(time);
        assert_eq!(
            stage.apply(PlatformStatusAction::StartedReplayingEvents),
            Some(PlatformStatus::ReplayingEvents)
        );
        assert_eq!(stage.apply(PlatformStatusAction::StartedReplayingEvents), None);
        assert_eq!(
            stage.apply(PlatformStatusAction::DoneReplayingEvents),
            Some(PlatformStatus::Observing)
        );
    }

    #[tokio::test]
    async fn test_ticks_move_observing_to_checking() {
        let time = Arc::new(ManualTimeSource::new(0));
        let (stage, sender, mut statuses) = stage(time.clone());
        let (shutdown_tx, shutdown) = watch::channel(false);

        sender
            .send(PlatformStatusAction::StartedReplayingEvents)
            .unwrap();
        sender.send(PlatformStatusAction::DoneReplayingEvents).unwrap();
        let task = tokio::spawn(stage.run(shutdown));

        statuses
            .wait_for(|status| *status == PlatformStatus::Observing)
            .await
            .unwrap();
        time.advance(Duration::from_millis(20));
        statuses
            .wait_for(|status| *status == PlatformStatus::Checking)
            .await
            .unwrap();

        shutdown_tx.send(true).unwrap();
        task.await.unwrap();
    }
}
