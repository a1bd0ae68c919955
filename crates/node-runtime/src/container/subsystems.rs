//! # Subsystem Container
//!
//! Builds every subsystem from a [`NodeConfig`] and hands them to the wiring,
//! which moves each into the stage that owns it.
//!
//! ## Initialization Order
//!
//! ```text
//! Level 0: Roster, signing key, status action channel
//! Level 1: Transaction Pool, Fallen-Behind Manager
//! Level 2: Event Creation Manager, State Hasher, ISS Detector
//! Level 3: ISS Handler, Platform Status Manager (publishes to the pool)
//! ```

use std::sync::Arc;

use hw_01_transaction_pool::TransactionPool;
use hw_02_event_creation::{EventCreationDependencies, EventCreationManager, KeyPairHashSigner};
use hw_03_gossip_sync::{ChannelStatusActionSubmitter, FallenBehindManager, SyncManager};
use hw_04_state_validation::{IssDetector, IssHandler, StateHasher};
use hw_05_platform_status::{PlatformStatusManager, StatusPublisher, WatchStatusPublisher};
use shared_types::{NodeId, PlatformStatusAction, Roster, TimeSource};
use tokio::sync::mpsc;
use tracing::{info, instrument};

use crate::adapters::PoolStatusPublisher;
use crate::container::config::NodeConfig;
use crate::errors::NodeResult;

/// Every subsystem of one node, not yet running.
pub struct SubsystemContainer {
    pub self_id: NodeId,
    pub roster: Arc<Roster>,
    pub pool: Arc<TransactionPool>,
    pub signer: Arc<KeyPairHashSigner>,
    pub event_creation: EventCreationManager,
    pub sync: SyncManager,
    pub state_hasher: StateHasher,
    pub iss_detector: IssDetector,
    pub iss_handler: Arc<IssHandler>,
    pub platform_status: PlatformStatusManager,
    pub status_publisher: Arc<WatchStatusPublisher>,
    /// Shared by every stage that reports status actions.
    pub status_actions: Arc<ChannelStatusActionSubmitter>,
    pub status_action_receiver: mpsc::UnboundedReceiver<PlatformStatusAction>,
    pub config: NodeConfig,
}

impl SubsystemContainer {
    #[instrument(name = "subsystem_init", skip_all, fields(node = config.node_id))]
    pub fn new(config: NodeConfig, time: Arc<dyn TimeSource>) -> NodeResult<Self> {
        info!("Initializing Hashweave subsystem container");

        // Level 0
        config.validate()?;
        let self_id = config.self_id();
        let roster = Arc::new(config.build_roster()?);
        let signer = Arc::new(KeyPairHashSigner::new(config.signing_key()?));
        let (submitter, status_action_receiver) = ChannelStatusActionSubmitter::channel();
        let status_actions = Arc::new(submitter);
        info!(
            members = roster.len(),
            total_weight = roster.total_weight(),
            public_key = %hex::encode(signer.public_key()),
            "  [0] Roster and signing key ready"
        );

        // Level 1
        let pool = Arc::new(TransactionPool::new(config.transaction_pool.clone())?);
        info!(
            throttle_queue_size = config.transaction_pool.throttle_queue_size,
            "  [1] Transaction Pool initialized"
        );

        let peers = roster.node_ids().filter(|id| *id != self_id);
        let fallen_behind = Arc::new(FallenBehindManager::new(
            peers,
            config.sync.threshold()?,
            status_actions.clone(),
        ));
        let sync = SyncManager::new(fallen_behind);
        info!(
            threshold = config.sync.fallen_behind_threshold,
            "  [1] Fallen-Behind Manager initialized"
        );

        // Level 2
        let event_creation = EventCreationManager::new(
            self_id,
            roster.clone(),
            &config.event_creation,
            EventCreationDependencies::from_pool(pool.clone(), signer.clone(), time.clone()),
        )?;
        info!(
            max_creation_rate = config.event_creation.max_creation_rate,
            "  [2] Event Creation Manager initialized"
        );

        let state_hasher = StateHasher::new(config.state_hasher.clone());
        let iss_detector = IssDetector::new(self_id, roster.clone(), &config.iss_detector)?;
        info!(
            rounds_non_ancient = config.iss_detector.rounds_non_ancient,
            "  [2] State Hasher and ISS Detector initialized"
        );

        // Level 3
        let iss_handler = Arc::new(IssHandler::new(status_actions.clone()));
        let (watch_publisher, _) = WatchStatusPublisher::channel();
        let status_publisher = Arc::new(watch_publisher);
        let publishers: Vec<Arc<dyn StatusPublisher>> = vec![
            status_publisher.clone(),
            Arc::new(PoolStatusPublisher::new(pool.clone())),
        ];
        let platform_status =
            PlatformStatusManager::new(&config.platform_status, time, publishers)?;
        info!("  [3] ISS Handler and Platform Status Manager initialized");

        Ok(Self {
            self_id,
            roster,
            pool,
            signer,
            event_creation,
            sync,
            state_hasher,
            iss_detector,
            iss_handler,
            platform_status,
            status_publisher,
            status_actions,
            status_action_receiver,
            config,
        })
    }
}
