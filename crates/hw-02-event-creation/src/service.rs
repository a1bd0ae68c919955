//! Event Creation Manager - composes rules, creator, hasher and signer
//!
//! ```text
//! maybe_create_event()
//!     │
//!     ├── rules forbid ──────────────→ phase = blocking status, None
//!     │
//!     └── phase = AttemptingCreation
//!             ├── creator: None ─────→ phase = NoEligibleParents, None
//!             └── creator: event ────→ rules.event_was_created()
//!                                      phase = RateLimited
//!                                      hash → sign → Some(PlatformEvent)
//! ```

use std::sync::Arc;
use std::time::Duration;

use hw_01_transaction_pool::TransactionPool;
use shared_types::{EventWindow, NodeId, PlatformEvent, PlatformStatus, Roster, TimeSource};
use tracing::{debug, info};

use crate::domain::{
    EventCreationConfig, EventCreationResult, EventCreationRules, EventCreationStatus,
    EventHasher, FutureEventBuffer, RuleContext, SelfEventSigner, TipsetEventCreator,
};
use crate::metrics;
use crate::ports::inbound::EventCreationApi;
use crate::ports::outbound::{HashSigner, PendingSystemTransactions, TransactionSupplier};

/// Collaborators the manager is built from.
#[derive(Clone)]
pub struct EventCreationDependencies {
    pub transactions: Arc<dyn TransactionSupplier>,
    pub pending_system_transactions: Arc<dyn PendingSystemTransactions>,
    pub signer: Arc<dyn HashSigner>,
    pub time: Arc<dyn TimeSource>,
}

impl EventCreationDependencies {
    /// Wire both pool-backed ports to the same transaction pool.
    pub fn from_pool(
        pool: Arc<TransactionPool>,
        signer: Arc<dyn HashSigner>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            transactions: pool.clone(),
            pending_system_transactions: pool,
            signer,
            time,
        }
    }
}

pub struct EventCreationManager {
    creator: TipsetEventCreator,
    rules: EventCreationRules,
    hasher: EventHasher,
    signer: SelfEventSigner,
    future_events: FutureEventBuffer,
    pending_system_transactions: Arc<dyn PendingSystemTransactions>,
    time: Arc<dyn TimeSource>,
    platform_status: PlatformStatus,
    unhealthy_duration: Duration,
    phase: EventCreationStatus,
}

impl EventCreationManager {
    pub fn new(
        self_id: NodeId,
        roster: Arc<Roster>,
        config: &EventCreationConfig,
        deps: EventCreationDependencies,
    ) -> EventCreationResult<Self> {
        config.validate()?;
        let creator = TipsetEventCreator::new(
            self_id,
            roster,
            config,
            deps.transactions,
            Arc::clone(&deps.time),
        )?;
        Ok(Self {
            creator,
            rules: EventCreationRules::from_config(config),
            hasher: EventHasher::new(),
            signer: SelfEventSigner::new(deps.signer),
            future_events: FutureEventBuffer::new(),
            pending_system_transactions: deps.pending_system_transactions,
            time: deps.time,
            platform_status: PlatformStatus::default(),
            unhealthy_duration: Duration::ZERO,
            phase: EventCreationStatus::Idle,
        })
    }

    pub fn event_window(&self) -> &EventWindow {
        self.creator.event_window()
    }

    pub fn buffered_future_events(&self) -> usize {
        self.future_events.len()
    }

    fn rule_context(&self) -> RuleContext {
        RuleContext {
            now: self.time.now(),
            platform_status: self.platform_status,
            unhealthy_duration: self.unhealthy_duration,
            has_buffered_system_transactions: self
                .pending_system_transactions
                .has_buffered_system_transactions(),
        }
    }

    fn set_phase(&mut self, phase: EventCreationStatus) {
        if self.phase != phase {
            debug!(from = %self.phase, to = %phase, "Event creation phase changed");
        }
        self.phase = phase;
        metrics::record_attempt(phase.as_str());
    }
}

impl EventCreationApi for EventCreationManager {
    fn register_event(&mut self, event: PlatformEvent) {
        let window = *self.creator.event_window();
        if let Some(ready) = self.future_events.add_event(event, &window) {
            self.creator.register_event(&ready);
        }
        metrics::set_future_events_buffered(self.future_events.len());
    }

    fn set_event_window(&mut self, window: EventWindow) {
        self.creator.set_event_window(window);
        let current = *self.creator.event_window();
        for event in self.future_events.update_event_window(&current) {
            self.creator.register_event(&event);
        }
        metrics::set_future_events_buffered(self.future_events.len());
    }

    fn current_event_window(&self) -> EventWindow {
        *self.creator.event_window()
    }

    fn maybe_create_event(&mut self) -> Option<PlatformEvent> {
        let ctx = self.rule_context();
        if let Some(blocked) = self.rules.blocking_status(&ctx) {
            self.set_phase(blocked);
            return None;
        }

        self.set_phase(EventCreationStatus::AttemptingCreation);
        let Some(unsigned) = self.creator.maybe_create_event() else {
            self.set_phase(EventCreationStatus::NoEligibleParents);
            return None;
        };

        self.rules.event_was_created(ctx.now);
        self.set_phase(EventCreationStatus::RateLimited);

        let event = self.signer.sign_event(self.hasher.hash_event(unsigned));
        metrics::record_event_created();
        Some(event)
    }

    fn update_platform_status(&mut self, status: PlatformStatus) {
        self.platform_status = status;
    }

    fn report_unhealthy_duration(&mut self, duration: Duration) {
        self.unhealthy_duration = duration;
    }

    fn clear(&mut self) {
        self.creator.clear();
        self.future_events.clear();
        self.phase = EventCreationStatus::Idle;
        metrics::set_future_events_buffered(0);
        info!("Event creation cleared");
    }

    fn status(&self) -> EventCreationStatus {
        self.phase
    }
}
