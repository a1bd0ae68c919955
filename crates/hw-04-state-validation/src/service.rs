//! ISS Handler and the detector's driving port.

use std::sync::Arc;

use shared_types::{IssNotification, IssType, StateSignatureTransaction};
use tracing::{error, warn};

use crate::domain::{map_iss_to_status_action, IssDetector, ReservedSignedState};
use crate::metrics;
use crate::ports::inbound::{IssDetectionApi, IssObserver};
use crate::ports::outbound::StatusActionSubmitter;

impl IssDetectionApi for IssDetector {
    fn handle_state(&mut self, state: ReservedSignedState) -> Vec<IssNotification> {
        IssDetector::handle_state(self, state)
    }

    fn handle_state_signature_transactions(
        &mut self,
        transactions: &[StateSignatureTransaction],
    ) -> Vec<IssNotification> {
        IssDetector::handle_state_signature_transactions(self, transactions)
    }

    fn overriding_state(&mut self, state: ReservedSignedState) -> Vec<IssNotification> {
        IssDetector::overriding_state(self, state)
    }

    fn signal_end_of_preconsensus_replay(&mut self) {
        IssDetector::signal_end_of_preconsensus_replay(self)
    }
}

/// Turns ISS notifications into platform status actions.
#[derive(Clone)]
pub struct IssHandler {
    status_actions: Arc<dyn StatusActionSubmitter>,
}

impl IssHandler {
    pub fn new(status_actions: Arc<dyn StatusActionSubmitter>) -> Self {
        Self { status_actions }
    }
}

impl IssObserver for IssHandler {
    fn iss_observed(&self, notification: IssNotification) {
        metrics::record_iss(notification.iss_type.as_str());
        match notification.iss_type {
            IssType::OtherIss => warn!(
                round = notification.round,
                iss_type = %notification.iss_type,
                "Another node computed a different state"
            ),
            IssType::SelfIss | IssType::CatastrophicIss => error!(
                round = notification.round,
                iss_type = %notification.iss_type,
                "Halting: this node can no longer trust its state"
            ),
        }
        if let Some(action) = map_iss_to_status_action(&notification) {
            self.status_actions.submit_status_action(action);
        }
    }
}

impl std::fmt::Debug for IssHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssHandler").finish_non_exhaustive()
    }
}
