//! # Event Creation Stage
//!
//! ```text
//! status watch ──┐
//! WindowUpdate ──┼──→ EventCreationManager ──tick──→ GossipTransport
//! GossipMessage ─┘          │
//!       └─ SyncRequest ──→ SyncManager (fallen-behind bookkeeping)
//! ```
//!
//! A reconnect window clears the creation state and the transaction pool
//! before it is applied, then resets the fallen-behind bookkeeping.
//!
//! Creation attempts run at a fixed interval. Tick lag is reported as an
//! unhealthy duration to both the creation rules and the transaction pool.

use std::sync::Arc;
use std::time::Duration;

use hw_01_transaction_pool::TransactionPool;
use hw_02_event_creation::EventCreationApi;
use hw_03_gossip_sync::{FallenBehindApi, SyncFallenBehindStatus, SyncManager};
use shared_types::PlatformStatus;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::handlers::consensus::WindowUpdate;
use crate::handlers::health::HealthMonitor;
use crate::ports::{GossipMessage, GossipTransport};

pub struct EventCreationStage {
    pub(crate) creation: Box<dyn EventCreationApi>,
    pub(crate) sync: SyncManager,
    pub(crate) pool: Arc<TransactionPool>,
    pub(crate) gossip: Arc<dyn GossipTransport>,
    pub(crate) statuses: watch::Receiver<PlatformStatus>,
    pub(crate) windows: mpsc::UnboundedReceiver<WindowUpdate>,
    pub(crate) messages: mpsc::Receiver<GossipMessage>,
    pub(crate) attempt_interval: Duration,
    pub(crate) health: HealthMonitor,
}

impl EventCreationStage {
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_ms = self.attempt_interval.as_millis() as u64,
            "Event creation stage started"
        );
        let current = *self.statuses.borrow_and_update();
        self.on_status(current);
        let mut ticker = time::interval(self.attempt_interval);

        loop {
            tokio::select! {
                Ok(()) = self.statuses.changed() => {
                    let status = *self.statuses.borrow_and_update();
                    self.on_status(status);
                }
                Some(update) = self.windows.recv() => self.on_window(update),
                Some(message) = self.messages.recv() => self.on_message(message),
                deadline = ticker.tick() => {
                    self.on_tick(deadline, Instant::now());
                    self.attempt_creation().await;
                }
                _ = shutdown.changed() => break,
            }
        }
        info!("Event creation stage stopped");
    }

    fn on_status(&mut self, status: PlatformStatus) {
        debug!(%status, "Event creation sees new platform status");
        self.creation.update_platform_status(status);
    }

    pub fn on_window(&mut self, update: WindowUpdate) {
        match update {
            WindowUpdate::Advanced(window) => self.creation.set_event_window(window),
            WindowUpdate::Reconnected(window) => {
                self.creation.clear();
                self.pool.clear();
                self.creation.set_event_window(window);
                self.sync.reset_fallen_behind();
                info!(
                    round = window.latest_consensus_round(),
                    "Event creation restarted from reconnect state"
                );
            }
        }
    }

    pub fn on_message(&mut self, message: GossipMessage) {
        match message {
            GossipMessage::Event(event) => self.creation.register_event(event),
            GossipMessage::SyncRequest { peer, window } => {
                let own = self.creation.current_event_window();
                let status = self.sync.check_sync_status(&own, &window, peer);
                if status != SyncFallenBehindStatus::NoneFallenBehind {
                    debug!(%peer, %status, "Sync with peer not permitted");
                }
            }
        }
    }

    pub fn on_tick(&mut self, deadline: Instant, now: Instant) {
        if let Some(duration) = self.health.observe(deadline, now) {
            if duration.is_zero() {
                info!("Runtime caught up, node healthy again");
            } else {
                debug!(unhealthy_ms = duration.as_millis() as u64, "Creation tick running late");
            }
            self.creation.report_unhealthy_duration(duration);
            self.pool.report_unhealthy_duration(duration);
        }
    }

    pub async fn attempt_creation(&mut self) -> bool {
        let Some(event) = self.creation.maybe_create_event() else {
            return false;
        };
        let generation = event.event.generation;
        match self.gossip.broadcast_event(&event).await {
            Ok(()) => {
                hw_telemetry::SELF_EVENTS_GOSSIPED.inc();
                debug!(generation, "Self event gossiped");
                true
            }
            Err(err) => {
                warn!(generation, %err, "Failed to gossip self event");
                false
            }
        }
    }
}
