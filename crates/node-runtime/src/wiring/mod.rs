//! # Stage Wiring
//!
//! Moves each subsystem of a [`SubsystemContainer`] into the stage that owns
//! it and connects the stages with typed channels.
//!
//! | Channel | Kind | From | To |
//! |---------|------|------|----|
//! | rounds | collaborator | ordering | consensus |
//! | ISS notifications | bounded mpsc | consensus | ISS |
//! | event windows | unbounded mpsc | consensus | event creation |
//! | gossip messages | bounded mpsc | gossip layer | event creation |
//! | reconnect states | bounded mpsc | reconnect layer | consensus |
//! | status actions | unbounded mpsc | every stage | status |
//! | platform status | watch | status | event creation, callers |
//!
//! The transaction pool receives status changes synchronously from the
//! status stage and health reports from the event creation stage.

use std::sync::Arc;

use hw_01_transaction_pool::TransactionPool;
use hw_03_gossip_sync::SyncManager;
use hw_04_state_validation::IssObserver;
use shared_types::{
    NodeId, PlatformStatus, PlatformStatusAction, StatusActionSubmitter, TimeSource,
};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::container::{NodeConfig, SubsystemContainer};
use crate::errors::NodeResult;
use crate::handlers::{
    ConsensusRoundHandler, EventCreationStage, HealthMonitor, IssStage, StatusStage,
};
use crate::ports::{
    ConsensusRoundSource, GossipMessage, GossipTransport, ReconnectState, StateStore,
};

/// The outside world as seen by a node.
pub struct RuntimeCollaborators {
    pub rounds: Box<dyn ConsensusRoundSource>,
    pub gossip: Arc<dyn GossipTransport>,
    pub store: Arc<dyn StateStore>,
    pub time: Arc<dyn TimeSource>,
}

/// A running node.
pub struct NodeRuntime {
    self_id: NodeId,
    pool: Arc<TransactionPool>,
    sync: SyncManager,
    status_actions: Arc<dyn StatusActionSubmitter>,
    statuses: watch::Receiver<PlatformStatus>,
    gossip_sender: mpsc::Sender<GossipMessage>,
    reconnect_sender: mpsc::Sender<ReconnectState>,
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl NodeRuntime {
    /// Build every subsystem and spawn the stages.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(config: NodeConfig, collaborators: RuntimeCollaborators) -> NodeResult<Self> {
        let RuntimeCollaborators {
            rounds,
            gossip,
            store,
            time,
        } = collaborators;
        let capacity = config.runtime.channel_capacity.max(1);
        let status_tick = config.runtime.status_tick_interval();
        let attempt_interval = config.event_creation.creation_attempt_interval();
        let tolerated_lag = config.event_creation.maximum_permissible_unhealthy_duration();

        let SubsystemContainer {
            self_id,
            pool,
            signer,
            event_creation,
            sync,
            state_hasher,
            mut iss_detector,
            iss_handler,
            platform_status,
            status_publisher,
            status_actions,
            status_action_receiver,
            config,
            ..
        } = SubsystemContainer::new(config, time.clone())?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (notification_tx, notification_rx) = mpsc::channel(capacity);
        let (window_tx, window_rx) = mpsc::unbounded_channel();
        let (gossip_sender, gossip_rx) = mpsc::channel(capacity);
        let (reconnect_sender, reconnect_rx) = mpsc::channel(1);
        let status_actions: Arc<dyn StatusActionSubmitter> = status_actions;
        let statuses = status_publisher.subscribe();

        // No preconsensus stream is replayed on startup.
        iss_detector.signal_end_of_preconsensus_replay();
        status_actions.submit_status_action(PlatformStatusAction::StartedReplayingEvents);
        status_actions.submit_status_action(PlatformStatusAction::DoneReplayingEvents);

        let mut tasks = Vec::with_capacity(4);

        let status_stage = StatusStage::new(
            Box::new(platform_status),
            status_action_receiver,
            status_tick,
            time.clone(),
        );
        tasks.push(("status", tokio::spawn(status_stage.run(shutdown_rx.clone()))));

        let observers: Vec<Arc<dyn IssObserver>> = vec![iss_handler];
        let iss_stage = IssStage::new(notification_rx, observers);
        tasks.push(("iss", tokio::spawn(iss_stage.run(shutdown_rx.clone()))));

        let consensus = ConsensusRoundHandler {
            self_id,
            hasher: state_hasher,
            detector: Box::new(iss_detector),
            signer,
            pool: pool.clone(),
            store,
            status_actions: status_actions.clone(),
            notifications: notification_tx,
            windows: window_tx,
            rounds_non_ancient: config.iss_detector.rounds_non_ancient,
            rounds_expired: config.runtime.rounds_expired,
            ancient_mode: config.event_creation.ancient_mode,
            time,
        };
        tasks.push((
            "consensus",
            tokio::spawn(consensus.run(rounds, reconnect_rx, shutdown_rx.clone())),
        ));

        let creation = EventCreationStage {
            creation: Box::new(event_creation),
            sync: sync.clone(),
            pool: pool.clone(),
            gossip,
            statuses: status_publisher.subscribe(),
            windows: window_rx,
            messages: gossip_rx,
            attempt_interval,
            health: HealthMonitor::new(tolerated_lag),
        };
        tasks.push(("event_creation", tokio::spawn(creation.run(shutdown_rx))));

        info!(node = %self_id, stages = tasks.len(), "Node runtime started");
        Ok(Self {
            self_id,
            pool,
            sync,
            status_actions,
            statuses,
            gossip_sender,
            reconnect_sender,
            shutdown_tx,
            tasks,
        })
    }

    pub fn self_id(&self) -> NodeId {
        self.self_id
    }

    pub fn status(&self) -> PlatformStatus {
        *self.statuses.borrow()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<PlatformStatus> {
        self.statuses.clone()
    }

    /// Where the gossip layer delivers received events and sync requests.
    pub fn gossip_sender(&self) -> mpsc::Sender<GossipMessage> {
        self.gossip_sender.clone()
    }

    /// Where the reconnect layer hands over a state loaded from a peer.
    ///
    /// The node resets detection, event creation and the pool to it, then
    /// reports `ReconnectComplete` and `StateWrittenToDisk` for its round.
    pub fn reconnect_sender(&self) -> mpsc::Sender<ReconnectState> {
        self.reconnect_sender.clone()
    }

    pub fn pool(&self) -> &Arc<TransactionPool> {
        &self.pool
    }

    pub fn sync(&self) -> &SyncManager {
        &self.sync
    }

    /// For collaborators that report status actions of their own.
    pub fn status_actions(&self) -> Arc<dyn StatusActionSubmitter> {
        self.status_actions.clone()
    }

    /// Signal every stage to stop and wait for them.
    pub async fn shutdown(self) {
        info!("Initiating graceful shutdown...");
        if self.shutdown_tx.send(true).is_err() {
            info!("All stages already stopped");
        }
        for (stage, task) in self.tasks {
            if let Err(err) = task.await {
                error!(stage, %err, "Stage panicked during shutdown");
            }
        }
        info!("Shutdown complete");
    }
}
