//! # Tipset Event Creator
//!
//! Chooses parents for the next self event and assembles it.
//!
//! ## Parent Selection
//!
//! ```text
//! childless peer events ──→ shuffle (seeded) ──→ score by advancement weight
//!                                                       │
//!                               best score > 0 ─────────┴──→ other parent
//!                               no candidate ───→ genesis? create : None
//! ```
//!
//! Always taking the best score can starve a slow peer whose events never
//! advance as much as the others. Before scoring, a seeded roll with chance
//! `(max_selfishness - 1) / anti_selfishness_factor` instead picks among the
//! passed-over peers' childless events, weighted by selfishness score.
//!
//! The creator is single-writer: it is owned by the event creation stage and
//! takes `&mut self` everywhere.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use shared_types::{
    EventDescriptor, EventWindow, NodeId, PlatformEvent, Roster, TimeSource, Timestamp,
    UnsignedEvent,
};
use tracing::{debug, warn};

use super::childless::ChildlessEventTracker;
use super::config::EventCreationConfig;
use super::errors::{EventCreationError, EventCreationResult};
use super::hasher::EventHasher;
use super::tipset::{TipsetTracker, TipsetWeightCalculator};
use crate::ports::outbound::TransactionSupplier;

/// The last self event and what the next one needs from it.
#[derive(Clone, Copy, Debug)]
struct LastSelfEvent {
    descriptor: EventDescriptor,
    time_created: Timestamp,
    transaction_count: usize,
}

pub struct TipsetEventCreator {
    self_id: NodeId,
    roster: Arc<Roster>,
    ancient_mode: shared_types::AncientMode,
    window: EventWindow,
    tipsets: TipsetTracker,
    weights: TipsetWeightCalculator,
    childless: ChildlessEventTracker,
    last_self_event: Option<LastSelfEvent>,
    // Set by clear(): earlier self events exist but are no longer known, so a
    // parentless event would fork this node's own chain.
    self_history_lost: bool,
    hasher: EventHasher,
    rng: StdRng,
    anti_selfishness_factor: f64,
    transactions: Arc<dyn TransactionSupplier>,
    time: Arc<dyn TimeSource>,
}

impl TipsetEventCreator {
    pub fn new(
        self_id: NodeId,
        roster: Arc<Roster>,
        config: &EventCreationConfig,
        transactions: Arc<dyn TransactionSupplier>,
        time: Arc<dyn TimeSource>,
    ) -> EventCreationResult<Self> {
        let self_index = roster
            .index_of(self_id)
            .ok_or(EventCreationError::SelfNotInRoster(self_id))?;
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            self_id,
            tipsets: TipsetTracker::new(Arc::clone(&roster)),
            weights: TipsetWeightCalculator::new(Arc::clone(&roster), self_index),
            roster,
            ancient_mode: config.ancient_mode,
            window: EventWindow::genesis(config.ancient_mode),
            childless: ChildlessEventTracker::new(),
            last_self_event: None,
            self_history_lost: false,
            hasher: EventHasher::new(),
            rng,
            anti_selfishness_factor: config.anti_selfishness_factor,
            transactions,
            time,
        })
    }

    pub fn self_id(&self) -> NodeId {
        self.self_id
    }

    pub fn event_window(&self) -> &EventWindow {
        &self.window
    }

    /// Track a received (or replayed self) event for future parent selection.
    pub fn register_event(&mut self, event: &PlatformEvent) {
        let descriptor = event.descriptor;
        if self.window.is_ancient(&descriptor) {
            return;
        }
        if !self.roster.contains(descriptor.creator) {
            debug!(creator = %descriptor.creator, "Ignoring event from creator outside the roster");
            return;
        }

        if descriptor.creator == self.self_id {
            let is_newer = self
                .last_self_event
                .map_or(true, |last| descriptor.generation > last.descriptor.generation);
            if is_newer {
                self.last_self_event = Some(LastSelfEvent {
                    descriptor,
                    time_created: event.event.time_created,
                    transaction_count: event.event.transaction_count(),
                });
            }
            self.tipsets.add_event(&descriptor, event.event.all_parents());
            self.childless
                .register_self_event_parents(event.event.other_parents.iter());
        } else {
            self.tipsets.add_event(&descriptor, event.event.all_parents());
            self.childless.add_event(&descriptor, event.event.all_parents());
        }
    }

    /// Adopt a newer window. A window that would move backwards is ignored.
    pub fn set_event_window(&mut self, window: EventWindow) {
        if !self.window.is_superseded_by(&window) {
            warn!(
                current = self.window.latest_consensus_round(),
                proposed = window.latest_consensus_round(),
                "Ignoring event window that would move backwards"
            );
            return;
        }
        self.window = window;
        self.tipsets.set_event_window(&window);
        self.childless.set_event_window(&window);
    }

    /// Build the next self event if a legal parent pairing exists.
    pub fn maybe_create_event(&mut self) -> Option<UnsignedEvent> {
        let self_parent = self
            .last_self_event
            .filter(|last| !self.window.is_ancient(&last.descriptor));

        if self.roster.len() == 1 {
            if self_parent.is_none() && self.self_history_lost {
                return None;
            }
            let other_parents = self_parent.map(|last| last.descriptor).into_iter().collect();
            return Some(self.build_event(self_parent, other_parents));
        }

        let other_parent = self
            .reduce_selfishness()
            .or_else(|| self.select_other_parent());
        match other_parent {
            Some(other_parent) => Some(self.build_event(self_parent, vec![other_parent])),
            None if self.may_create_genesis_event() => {
                Some(self.build_event(None, Vec::new()))
            }
            None => None,
        }
    }

    fn may_create_genesis_event(&self) -> bool {
        self.window.is_genesis() && self.last_self_event.is_none() && !self.self_history_lost
    }

    /// Non-ancient childless peer events, in creator order.
    fn candidates(&self) -> Vec<EventDescriptor> {
        let mut candidates: Vec<EventDescriptor> = self
            .childless
            .childless_events()
            .filter(|event| event.creator != self.self_id && !self.window.is_ancient(event))
            .copied()
            .collect();
        candidates.sort_by_key(|event| event.creator);
        candidates
    }

    /// Pick a passed-over peer's event, or nothing if the roll misses or no
    /// such event would advance the snapshot.
    fn reduce_selfishness(&mut self) -> Option<EventDescriptor> {
        let max_selfishness = self.weights.max_selfishness_score();
        let be_nice_chance =
            max_selfishness.saturating_sub(1) as f64 / self.anti_selfishness_factor;
        if be_nice_chance <= 0.0 || self.rng.gen::<f64>() >= be_nice_chance {
            return None;
        }

        let mut ignored = Vec::new();
        let mut total_selfishness = 0u64;
        for candidate in self.candidates() {
            let selfishness = self.weights.selfishness_score_for_node(candidate.creator);
            if selfishness <= 1 {
                continue;
            }
            let Some(tipset) = self.tipsets.get(&candidate.hash) else {
                continue;
            };
            if self.weights.candidate_weight(tipset) > 0 {
                ignored.push((candidate, selfishness));
                total_selfishness += selfishness;
            }
        }
        if ignored.is_empty() {
            return None;
        }

        let choice = self.rng.gen_range(0..total_selfishness);
        let mut running = 0u64;
        for (candidate, selfishness) in ignored {
            running += selfishness;
            if choice < running {
                debug!(
                    creator = %candidate.creator,
                    selfishness,
                    max_selfishness,
                    "Choosing passed-over peer as other parent"
                );
                return Some(candidate);
            }
        }
        None
    }

    fn select_other_parent(&mut self) -> Option<EventDescriptor> {
        let mut candidates = self.candidates();
        candidates.shuffle(&mut self.rng);

        let mut best: Option<(EventDescriptor, u64)> = None;
        for candidate in candidates {
            let Some(tipset) = self.tipsets.get(&candidate.hash) else {
                continue;
            };
            let weight = self.weights.candidate_weight(tipset);
            if weight > 0 && best.map_or(true, |(_, best_weight)| weight > best_weight) {
                best = Some((candidate, weight));
            }
        }
        best.map(|(candidate, _)| candidate)
    }

    fn build_event(
        &mut self,
        self_parent: Option<LastSelfEvent>,
        other_parents: Vec<EventDescriptor>,
    ) -> UnsignedEvent {
        let now = self.time.now();
        let time_created = match self_parent {
            Some(last) => {
                let spacing = last.transaction_count.max(1) as u64;
                now.max(last.time_created.saturating_add(spacing))
            }
            None => now,
        };

        let self_parent_descriptor = self_parent.map(|last| last.descriptor);
        let generation = self_parent_descriptor
            .iter()
            .chain(other_parents.iter())
            .map(|parent| parent.generation)
            .max()
            .map_or(1, |max| max + 1);

        let event = UnsignedEvent {
            creator: self.self_id,
            self_parent: self_parent_descriptor,
            other_parents,
            birth_round: self.window.new_event_birth_round(),
            generation,
            time_created,
            transactions: self.transactions.get_transactions(),
        };
        self.record_self_event(&event);
        event
    }

    fn record_self_event(&mut self, event: &UnsignedEvent) {
        let descriptor = self.hasher.descriptor_of(event);
        let tipset = self.tipsets.add_event(&descriptor, event.all_parents());
        let snapshot_moved = self.weights.add_self_event(&tipset);
        self.childless
            .register_self_event_parents(event.other_parents.iter());
        if snapshot_moved {
            self.weights
                .update_selfishness_scores(self.childless.childless_events());
        }
        self.last_self_event = Some(LastSelfEvent {
            descriptor,
            time_created: event.time_created,
            transaction_count: event.transaction_count(),
        });
        debug!(
            generation = event.generation,
            birth_round = event.birth_round,
            transactions = event.transaction_count(),
            snapshot_moved,
            "Created self event"
        );
    }

    /// Drop all parent-tracking state and return to the genesis window.
    pub fn clear(&mut self) {
        self.tipsets.clear();
        self.weights.clear();
        self.childless.clear();
        self.last_self_event = None;
        self.self_history_lost = true;
        self.window = EventWindow::genesis(self.ancient_mode);
    }
}

impl std::fmt::Debug for TipsetEventCreator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TipsetEventCreator")
            .field("self_id", &self.self_id)
            .field("window", &self.window)
            .field("tracked_events", &self.tipsets.len())
            .field("childless_events", &self.childless.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use shared_types::{AncientMode, ManualTimeSource, RosterEntry, Transaction};

    #[derive(Default)]
    struct QueueSupplier {
        batches: Mutex<Vec<Vec<Transaction>>>,
    }

    impl TransactionSupplier for QueueSupplier {
        fn get_transactions(&self) -> Vec<Transaction> {
            self.batches.lock().pop().unwrap_or_default()
        }
    }

    fn roster(n: u64) -> Arc<Roster> {
        let entries = (0..n)
            .map(|i| RosterEntry {
                node_id: NodeId(i),
                weight: 10,
                public_key: [0u8; 32],
            })
            .collect();
        Arc::new(Roster::new(entries).unwrap())
    }

    struct Harness {
        creator: TipsetEventCreator,
        supplier: Arc<QueueSupplier>,
        clock: Arc<ManualTimeSource>,
    }

    fn harness(n: u64) -> Harness {
        harness_with_factor(n, EventCreationConfig::default().anti_selfishness_factor)
    }

    fn harness_with_factor(n: u64, anti_selfishness_factor: f64) -> Harness {
        let supplier = Arc::new(QueueSupplier::default());
        let clock = Arc::new(ManualTimeSource::new(1_000));
        let config = EventCreationConfig {
            rng_seed: Some(7),
            anti_selfishness_factor,
            ..EventCreationConfig::default()
        };
        let creator =
            TipsetEventCreator::new(NodeId(0), roster(n), &config, supplier.clone(), clock.clone())
                .unwrap();
        Harness {
            creator,
            supplier,
            clock,
        }
    }

    fn peer_event(
        creator: u64,
        self_parent: Option<EventDescriptor>,
        other_parents: Vec<EventDescriptor>,
    ) -> PlatformEvent {
        let generation = self_parent
            .iter()
            .chain(other_parents.iter())
            .map(|p| p.generation)
            .max()
            .map_or(1, |g| g + 1);
        EventHasher::new().hash_event(UnsignedEvent {
            creator: NodeId(creator),
            self_parent,
            other_parents,
            birth_round: 1,
            generation,
            time_created: 0,
            transactions: vec![],
        })
    }

    fn self_descriptor(event: &UnsignedEvent) -> EventDescriptor {
        EventHasher::new().descriptor_of(event)
    }

    #[test]
    fn test_self_not_in_roster_rejected() {
        let result = TipsetEventCreator::new(
            NodeId(99),
            roster(3),
            &EventCreationConfig::default(),
            Arc::new(QueueSupplier::default()),
            Arc::new(ManualTimeSource::new(0)),
        );
        assert!(matches!(result, Err(EventCreationError::SelfNotInRoster(NodeId(99)))));
    }

    #[test]
    fn test_genesis_event_without_peers() {
        let mut h = harness(4);
        let genesis = h.creator.maybe_create_event().unwrap();
        assert_eq!(genesis.generation, 1);
        assert!(genesis.self_parent.is_none());
        assert!(genesis.other_parents.is_empty());

        // Only one parentless event is legal.
        assert!(h.creator.maybe_create_event().is_none());
    }

    #[test]
    fn test_uses_peer_event_as_other_parent() {
        let mut h = harness(4);
        let genesis = h.creator.maybe_create_event().unwrap();

        let peer = peer_event(1, None, vec![]);
        h.creator.register_event(&peer);

        let next = h.creator.maybe_create_event().unwrap();
        assert_eq!(next.self_parent, Some(self_descriptor(&genesis)));
        assert_eq!(next.other_parents, vec![peer.descriptor]);
        assert_eq!(next.generation, 2);

        // The peer event now has a self child and is no longer eligible.
        assert!(h.creator.maybe_create_event().is_none());
    }

    #[test]
    fn test_prefers_candidate_with_more_advancement() {
        let mut h = harness(4);
        h.creator.maybe_create_event().unwrap();

        let b = peer_event(1, None, vec![]);
        let c = peer_event(2, None, vec![]);
        // d knows about b and c, so it advances three peers at once.
        let d = peer_event(3, None, vec![b.descriptor, c.descriptor]);
        for event in [&b, &c, &d] {
            h.creator.register_event(event);
        }

        let next = h.creator.maybe_create_event().unwrap();
        assert_eq!(next.other_parents, vec![d.descriptor]);
    }

    #[test]
    fn test_size_one_network_always_creates() {
        let mut h = harness(1);
        let first = h.creator.maybe_create_event().unwrap();
        let second = h.creator.maybe_create_event().unwrap();
        let first_descriptor = self_descriptor(&first);
        assert_eq!(second.self_parent, Some(first_descriptor));
        assert_eq!(second.other_parents, vec![first_descriptor]);
        assert_eq!(second.generation, 2);
    }

    #[test]
    fn test_creation_time_spacing() {
        let mut h = harness(1);
        h.supplier.batches.lock().push(vec![
            Transaction::application(vec![1]),
            Transaction::application(vec![2]),
            Transaction::application(vec![3]),
        ]);
        let first = h.creator.maybe_create_event().unwrap();
        assert_eq!(first.time_created, 1_000);
        assert_eq!(first.transaction_count(), 3);

        // Clock did not move: spaced by the parent's transaction count.
        let second = h.creator.maybe_create_event().unwrap();
        assert_eq!(second.time_created, 1_003);

        // Empty parent still forces a one nanosecond gap.
        let third = h.creator.maybe_create_event().unwrap();
        assert_eq!(third.time_created, 1_004);

        h.clock.set(5_000);
        assert_eq!(h.creator.maybe_create_event().unwrap().time_created, 5_000);
    }

    #[test]
    fn test_birth_round_follows_window() {
        let mut h = harness(1);
        h.creator
            .set_event_window(EventWindow::new(4, 5, 1, 1, AncientMode::BirthRound).unwrap());
        assert_eq!(h.creator.maybe_create_event().unwrap().birth_round, 5);
    }

    #[test]
    fn test_window_regression_ignored() {
        let mut h = harness(2);
        let newer = EventWindow::new(8, 9, 4, 2, AncientMode::BirthRound).unwrap();
        h.creator.set_event_window(newer);
        h.creator
            .set_event_window(EventWindow::new(3, 4, 2, 1, AncientMode::BirthRound).unwrap());
        assert_eq!(h.creator.event_window(), &newer);
    }

    #[test]
    fn test_ancient_parents_never_used() {
        let mut h = harness(2);
        h.creator.maybe_create_event().unwrap();
        h.creator.register_event(&peer_event(1, None, vec![]));

        // Everything tracked so far was born in round 1.
        h.creator
            .set_event_window(EventWindow::new(5, 6, 3, 1, AncientMode::BirthRound).unwrap());
        assert!(h.creator.maybe_create_event().is_none());
    }

    #[test]
    fn test_ignores_unknown_creators_and_ancient_events() {
        let mut h = harness(2);
        h.creator.maybe_create_event().unwrap();
        h.creator.register_event(&peer_event(42, None, vec![]));
        assert!(h.creator.maybe_create_event().is_none());
    }

    #[test]
    fn test_replayed_self_event_only_replaces_if_newer() {
        let mut h = harness(2);
        let peer = peer_event(1, None, vec![]);
        let high = peer_event(0, None, vec![peer.descriptor]);
        let low = peer_event(0, None, vec![]);
        h.creator.register_event(&high);
        h.creator.register_event(&low);

        // `peer` already has a self child; offer its successor instead.
        h.creator
            .register_event(&peer_event(1, Some(peer.descriptor), vec![]));
        let next = h.creator.maybe_create_event().unwrap();
        assert_eq!(next.self_parent, Some(high.descriptor));
    }

    #[test]
    fn test_clear_then_create_returns_nothing() {
        let mut h = harness(4);
        h.creator.maybe_create_event().unwrap();
        h.creator.register_event(&peer_event(1, None, vec![]));
        h.creator
            .set_event_window(EventWindow::new(1, 2, 1, 1, AncientMode::BirthRound).unwrap());

        h.creator.clear();
        assert!(h.creator.event_window().is_genesis());
        assert!(h.creator.maybe_create_event().is_none());

        // Fresh peer events make creation possible again.
        let peer = peer_event(2, None, vec![]);
        h.creator.register_event(&peer);
        let next = h.creator.maybe_create_event().unwrap();
        assert!(next.self_parent.is_none());
        assert_eq!(next.other_parents, vec![peer.descriptor]);
    }

    #[test]
    fn test_cleared_single_node_waits_for_replayed_self_event() {
        let mut h = harness(1);
        let first = h.creator.maybe_create_event().unwrap();
        h.creator.clear();
        assert!(h.creator.maybe_create_event().is_none());

        h.creator.register_event(&EventHasher::new().hash_event(first));
        assert!(h.creator.maybe_create_event().is_some());
    }

    /// Two snapshot moves pass over node 3, then node 3 competes with a
    /// node 2 event worth twice as much. Returns that third self event.
    fn third_event_after_ignoring_node_3(h: &mut Harness) -> (UnsignedEvent, [EventDescriptor; 2]) {
        h.creator.maybe_create_event().unwrap();
        let slow = peer_event(3, None, vec![]);
        let b1 = peer_event(1, None, vec![]);
        let c1 = peer_event(2, None, vec![]);
        let b2 = peer_event(1, Some(b1.descriptor), vec![c1.descriptor]);
        for event in [&slow, &b1, &c1, &b2] {
            h.creator.register_event(event);
        }
        let first = h.creator.maybe_create_event().unwrap();
        assert_eq!(first.other_parents, vec![b2.descriptor]);
        assert_eq!(h.creator.weights.selfishness_score_for_node(NodeId(3)), 1);

        let b3 = peer_event(1, Some(b2.descriptor), vec![]);
        let c2 = peer_event(2, Some(c1.descriptor), vec![b3.descriptor]);
        for event in [&b3, &c2] {
            h.creator.register_event(event);
        }
        let second = h.creator.maybe_create_event().unwrap();
        assert_eq!(second.other_parents, vec![c2.descriptor]);
        assert_eq!(h.creator.weights.selfishness_score_for_node(NodeId(3)), 2);

        let b4 = peer_event(1, Some(b3.descriptor), vec![c2.descriptor]);
        let c3 = peer_event(2, Some(c2.descriptor), vec![b4.descriptor]);
        for event in [&b4, &c3] {
            h.creator.register_event(event);
        }
        let third = h.creator.maybe_create_event().unwrap();
        (third, [slow.descriptor, c3.descriptor])
    }

    #[test]
    fn test_passed_over_peer_gets_chosen() {
        // (2 - 1) / 1 is a certain roll.
        let mut h = harness_with_factor(4, 1.0);
        let (third, [slow, best]) = third_event_after_ignoring_node_3(&mut h);
        assert_eq!(third.other_parents, vec![slow]);

        // Advancing node 3 alone does not move the snapshot, so scores stand.
        assert_eq!(h.creator.weights.selfishness_score_for_node(NodeId(3)), 2);
        assert!(h.creator.candidates().iter().all(|c| c.creator != NodeId(3)));

        // Nobody left to be nice to: back to the best advancement.
        let fourth = h.creator.maybe_create_event().unwrap();
        assert_eq!(fourth.other_parents, vec![best]);
    }

    #[test]
    fn test_best_advancement_wins_when_roll_is_negligible() {
        let mut h = harness_with_factor(4, 1e12);
        let (third, [_, best]) = third_event_after_ignoring_node_3(&mut h);
        assert_eq!(third.other_parents, vec![best]);
        assert_eq!(h.creator.weights.selfishness_score_for_node(NodeId(3)), 3);
    }
}
