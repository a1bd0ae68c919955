//! Driving Ports (API - Inbound)
//!
//! Called by the consensus-round stage in round order.

use shared_types::{IssNotification, StateSignatureTransaction};

use crate::domain::ReservedSignedState;

pub trait IssDetectionApi: Send {
    /// Every reservation passed in is released before returning.
    fn handle_state(&mut self, state: ReservedSignedState) -> Vec<IssNotification>;

    fn handle_state_signature_transactions(
        &mut self,
        transactions: &[StateSignatureTransaction],
    ) -> Vec<IssNotification>;

    fn overriding_state(&mut self, state: ReservedSignedState) -> Vec<IssNotification>;

    fn signal_end_of_preconsensus_replay(&mut self);
}

pub trait IssObserver: Send + Sync {
    fn iss_observed(&self, notification: IssNotification);
}
