//! Platform Status Manager - runs the state machine and fans out changes.

use std::sync::Arc;

use shared_types::{PlatformStatus, PlatformStatusAction, TimeSource};
use tracing::{debug, info};

use crate::domain::{PlatformStatusConfig, PlatformStatusResult, PlatformStatusStateMachine};
use crate::metrics;
use crate::ports::inbound::PlatformStatusApi;
use crate::ports::outbound::StatusPublisher;

pub struct PlatformStatusManager {
    machine: PlatformStatusStateMachine,
    publishers: Vec<Arc<dyn StatusPublisher>>,
}

impl PlatformStatusManager {
    pub fn new(
        config: &PlatformStatusConfig,
        time: Arc<dyn TimeSource>,
        publishers: Vec<Arc<dyn StatusPublisher>>,
    ) -> PlatformStatusResult<Self> {
        config.validate()?;
        Ok(Self {
            machine: PlatformStatusStateMachine::new(config, time),
            publishers,
        })
    }

    pub fn add_publisher(&mut self, publisher: Arc<dyn StatusPublisher>) {
        self.publishers.push(publisher);
    }
}

impl PlatformStatusApi for PlatformStatusManager {
    fn process_action(&mut self, action: PlatformStatusAction) -> Option<PlatformStatus> {
        let previous = self.machine.status();
        let Some(next) = self.machine.process_action(action) else {
            debug!(status = %previous, ?action, "Status action caused no transition");
            return None;
        };

        info!(from = %previous, to = %next, ?action, "Platform status changed");
        metrics::record_transition(previous.as_str(), next.as_str());
        for publisher in &self.publishers {
            publisher.publish_status(next);
        }
        Some(next)
    }

    fn current_status(&self) -> PlatformStatus {
        self.machine.status()
    }
}

impl std::fmt::Debug for PlatformStatusManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformStatusManager")
            .field("machine", &self.machine)
            .field("publishers", &self.publishers.len())
            .finish()
    }
}
