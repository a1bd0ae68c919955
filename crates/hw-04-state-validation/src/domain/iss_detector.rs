//! # ISS Detector
//!
//! Compares the state hash this node computed for each round against the
//! hashes its peers signed. Signatures and local states arrive on separate
//! streams and in either order; both land in the same [`RoundHashTally`].
//!
//! With `L` the latest handled round and `N = rounds_non_ancient`, rounds
//! `L - N + 1 ..= L + N - 1` are tracked. A tally is created for every round
//! from `L` upward when the window moves.

use std::collections::BTreeMap;
use std::sync::Arc;

use shared_types::{
    short_hex, Hash, IssNotification, IssType, NodeId, Roster, StateSignatureTransaction,
    Threshold,
};
use tracing::{debug, error, info, warn};

use super::config::IssDetectorConfig;
use super::errors::{StateValidationError, StateValidationResult};
use super::round::RoundHashTally;
use super::signed_state::ReservedSignedState;

pub struct IssDetector {
    self_id: NodeId,
    roster: Arc<Roster>,
    rounds_non_ancient: u64,
    ignored_round: Option<u64>,
    ignore_preconsensus_signatures: bool,
    replay_complete: bool,
    latest_round: Option<u64>,
    rounds: BTreeMap<u64, RoundHashTally>,
}

impl IssDetector {
    pub fn new(
        self_id: NodeId,
        roster: Arc<Roster>,
        config: &IssDetectorConfig,
    ) -> StateValidationResult<Self> {
        config.validate()?;
        if !roster.contains(self_id) {
            return Err(StateValidationError::SelfNotInRoster(self_id));
        }
        Ok(Self {
            self_id,
            roster,
            rounds_non_ancient: config.rounds_non_ancient,
            ignored_round: config.ignored_round(),
            ignore_preconsensus_signatures: config.ignore_preconsensus_signatures,
            replay_complete: false,
            latest_round: None,
            rounds: BTreeMap::new(),
        })
    }

    pub fn latest_round(&self) -> Option<u64> {
        self.latest_round
    }

    pub fn tracked_rounds(&self) -> impl Iterator<Item = u64> + '_ {
        self.rounds.keys().copied()
    }

    pub fn signal_end_of_preconsensus_replay(&mut self) {
        self.replay_complete = true;
        info!(
            latest_round = ?self.latest_round,
            "Preconsensus replay complete, state signatures are now live"
        );
    }

    /// Record the locally computed hash of `state` and evaluate its round.
    pub fn handle_state(&mut self, mut state: ReservedSignedState) -> Vec<IssNotification> {
        let Some((round, hash)) = Self::release(&mut state) else {
            return Vec::new();
        };

        if let Some(latest) = self.latest_round {
            if round <= latest {
                warn!(round, latest, "State round is not newer than the latest round, ignored");
                return Vec::new();
            }
        }

        let mut notifications = self.shift_window(round);
        self.record_self_hash(round, hash, &mut notifications);
        notifications
    }

    /// Fold a batch of peer and self signatures into their rounds.
    pub fn handle_state_signature_transactions(
        &mut self,
        transactions: &[StateSignatureTransaction],
    ) -> Vec<IssNotification> {
        if self.ignore_preconsensus_signatures && !self.replay_complete {
            debug!(
                count = transactions.len(),
                "Ignoring state signatures during preconsensus replay"
            );
            return Vec::new();
        }

        let mut notifications = Vec::new();
        for transaction in transactions {
            if let Some(notification) = self.handle_state_signature(transaction) {
                notifications.push(notification);
            }
        }
        notifications
    }

    /// Restart tracking from a state loaded by reconnect or from disk.
    ///
    /// Tracked rounds are dropped without evaluation.
    pub fn overriding_state(&mut self, mut state: ReservedSignedState) -> Vec<IssNotification> {
        let Some((round, hash)) = Self::release(&mut state) else {
            return Vec::new();
        };

        let dropped = self.rounds.len();
        self.rounds.clear();
        self.latest_round = Some(round);
        self.create_rounds_from(round);
        info!(round, dropped, "ISS detector reset to an overriding state");

        let mut notifications = Vec::new();
        self.record_self_hash(round, hash, &mut notifications);
        notifications
    }

    /// Close the reservation, keeping only what detection needs.
    fn release(state: &mut ReservedSignedState) -> Option<(u64, Hash)> {
        let details = state.get().and_then(|s| match s.hash() {
            Some(hash) => Some((s.round(), hash)),
            None => {
                warn!(round = s.round(), "State reached the ISS detector without a hash");
                None
            }
        });
        state.close();
        details
    }

    fn lowest_tracked(&self, latest: u64) -> u64 {
        latest.saturating_sub(self.rounds_non_ancient - 1)
    }

    fn highest_tracked(&self, latest: u64) -> u64 {
        latest.saturating_add(self.rounds_non_ancient - 1)
    }

    fn is_tracked(&self, round: u64) -> bool {
        self.ignored_round != Some(round)
    }

    fn create_rounds_from(&mut self, from: u64) {
        let Some(latest) = self.latest_round else {
            return;
        };
        let total_weight = self.roster.total_weight();
        for round in from.max(latest)..=self.highest_tracked(latest) {
            if self.is_tracked(round) {
                self.rounds
                    .entry(round)
                    .or_insert_with(|| RoundHashTally::new(round, total_weight));
            }
        }
    }

    fn shift_window(&mut self, latest: u64) -> Vec<IssNotification> {
        self.latest_round = Some(latest);
        let lowest = self.lowest_tracked(latest);
        let retained = self.rounds.split_off(&lowest);
        let evicted = std::mem::replace(&mut self.rounds, retained);

        let mut notifications = Vec::new();
        for (round, tally) in evicted {
            if let Some(notification) = self.evaluate_evicted(round, &tally) {
                notifications.push(notification);
            }
        }
        self.create_rounds_from(latest);
        notifications
    }

    fn evaluate_evicted(&self, round: u64, tally: &RoundHashTally) -> Option<IssNotification> {
        if tally.is_notified() || tally.decided_hash().is_some() {
            return None;
        }
        let total_weight = self.roster.total_weight();
        if Threshold::SuperMajority.is_satisfied_by(tally.reported_weight(), total_weight) {
            error!(
                round,
                reported_weight = tally.reported_weight(),
                total_weight,
                "Catastrophic lack of data, no hash reached a majority"
            );
            Some(IssNotification::new(round, IssType::CatastrophicIss))
        } else {
            warn!(
                round,
                reported_weight = tally.reported_weight(),
                total_weight,
                "Round left the ISS window without enough signatures to decide"
            );
            None
        }
    }

    fn record_self_hash(&mut self, round: u64, hash: Hash, out: &mut Vec<IssNotification>) {
        let self_id = self.self_id;
        let Some(tally) = self.rounds.get_mut(&round) else {
            debug!(round, "No tally for state round");
            return;
        };
        tally.set_self_hash(hash);
        debug!(round, hash = %short_hex(&hash), "Self state hash recorded");
        if let Some(iss_type) = tally.evaluate(self_id) {
            out.push(Self::notification(tally, iss_type));
        }
    }

    fn handle_state_signature(
        &mut self,
        transaction: &StateSignatureTransaction,
    ) -> Option<IssNotification> {
        let round = transaction.round;
        let Some(weight) = self.roster.weight_of(transaction.signer) else {
            debug!(round, signer = %transaction.signer, "Signature from a node outside the roster");
            return None;
        };
        let self_id = self.self_id;
        let Some(tally) = self.rounds.get_mut(&round) else {
            debug!(round, signer = %transaction.signer, "Signature for an untracked round");
            return None;
        };
        if !tally.add_signature(transaction.signer, weight, transaction.state_hash) {
            debug!(round, signer = %transaction.signer, "Duplicate state signature");
            return None;
        }
        tally
            .evaluate(self_id)
            .map(|iss_type| Self::notification(tally, iss_type))
    }

    fn notification(tally: &RoundHashTally, iss_type: IssType) -> IssNotification {
        let round = tally.round();
        match iss_type {
            IssType::OtherIss => warn!(
                round,
                %iss_type,
                dissenters = ?tally.dissenters(),
                "Peer state hash disagrees with the network"
            ),
            IssType::SelfIss | IssType::CatastrophicIss => error!(
                round,
                %iss_type,
                self_hash = ?tally.self_hash().map(|h| short_hex(&h)),
                "State hash disagreement detected"
            ),
        }
        IssNotification::new(round, iss_type)
    }
}

impl std::fmt::Debug for IssDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssDetector")
            .field("self_id", &self.self_id)
            .field("latest_round", &self.latest_round)
            .field("tracked_rounds", &self.rounds.len())
            .field("replay_complete", &self.replay_complete)
            .finish()
    }
}
