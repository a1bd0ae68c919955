//! # Tipsets
//!
//! A tipset records, for every roster member, the highest generation of that
//! member's events in an event's ancestry. Comparing the tipset of a would-be
//! self event against a snapshot tells how much of the network's progress the
//! new event would carry forward.

use std::collections::HashMap;
use std::sync::Arc;

use shared_types::{EventDescriptor, EventWindow, Hash, NodeId, Roster, Threshold};

/// Per-roster-index maximum generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tipset {
    generations: Vec<u64>,
}

impl Tipset {
    pub fn empty(roster_size: usize) -> Self {
        Self {
            generations: vec![0; roster_size],
        }
    }

    pub fn get(&self, index: usize) -> u64 {
        self.generations.get(index).copied().unwrap_or(0)
    }

    pub fn advance(&mut self, index: usize, generation: u64) {
        if let Some(slot) = self.generations.get_mut(index) {
            *slot = (*slot).max(generation);
        }
    }

    /// Element-wise maximum with `other`.
    pub fn merge(&mut self, other: &Tipset) {
        for (slot, theirs) in self.generations.iter_mut().zip(&other.generations) {
            *slot = (*slot).max(*theirs);
        }
    }

    pub fn merged(&self, other: &Tipset) -> Tipset {
        let mut merged = self.clone();
        merged.merge(other);
        merged
    }

    /// Weight of the non-self members whose entry is above `snapshot`.
    pub fn advancement_weight(&self, snapshot: &Tipset, roster: &Roster, self_index: usize) -> u64 {
        roster
            .entries()
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != self_index && self.get(*index) > snapshot.get(*index))
            .map(|(_, entry)| entry.weight)
            .sum()
    }
}

/// Tipsets of every non-ancient registered event, keyed by hash.
#[derive(Debug)]
pub struct TipsetTracker {
    roster: Arc<Roster>,
    tipsets: HashMap<Hash, (EventDescriptor, Tipset)>,
}

impl TipsetTracker {
    pub fn new(roster: Arc<Roster>) -> Self {
        Self {
            roster,
            tipsets: HashMap::new(),
        }
    }

    /// Compute and store the tipset of `event`.
    ///
    /// Parents that are unknown (never seen or already pruned) contribute
    /// nothing.
    pub fn add_event<'a>(
        &mut self,
        event: &EventDescriptor,
        parents: impl IntoIterator<Item = &'a EventDescriptor>,
    ) -> Tipset {
        if let Some((_, existing)) = self.tipsets.get(&event.hash) {
            return existing.clone();
        }

        let mut tipset = Tipset::empty(self.roster.len());
        for parent in parents {
            if let Some((_, parent_tipset)) = self.tipsets.get(&parent.hash) {
                tipset.merge(parent_tipset);
            }
        }
        if let Some(index) = self.roster.index_of(event.creator) {
            tipset.advance(index, event.generation);
        }

        self.tipsets.insert(event.hash, (*event, tipset.clone()));
        tipset
    }

    pub fn get(&self, hash: &Hash) -> Option<&Tipset> {
        self.tipsets.get(hash).map(|(_, tipset)| tipset)
    }

    pub fn len(&self) -> usize {
        self.tipsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tipsets.is_empty()
    }

    /// Forget events that became ancient.
    pub fn set_event_window(&mut self, window: &EventWindow) {
        self.tipsets
            .retain(|_, (descriptor, _)| !window.is_ancient(descriptor));
    }

    pub fn clear(&mut self) {
        self.tipsets.clear();
    }
}

/// Scores candidate parents against the snapshot of the last self event that
/// advanced a super majority.
///
/// Also keeps a selfishness score per roster index: the number of snapshot
/// moves in a row during which that peer had a childless event newer than
/// the snapshot, i.e. was passed over as other parent.
#[derive(Debug)]
pub struct TipsetWeightCalculator {
    roster: Arc<Roster>,
    self_index: usize,
    snapshot: Tipset,
    latest_self_tipset: Tipset,
    latest_self_advancement: u64,
    selfishness: Vec<u64>,
}

impl TipsetWeightCalculator {
    pub fn new(roster: Arc<Roster>, self_index: usize) -> Self {
        let size = roster.len();
        Self {
            roster,
            self_index,
            snapshot: Tipset::empty(size),
            latest_self_tipset: Tipset::empty(size),
            latest_self_advancement: 0,
            selfishness: vec![0; size],
        }
    }

    /// Additional advancement gained by adding `candidate` as other parent of
    /// the next self event.
    pub fn candidate_weight(&self, candidate: &Tipset) -> u64 {
        self.latest_self_tipset
            .merged(candidate)
            .advancement_weight(&self.snapshot, &self.roster, self.self_index)
            .saturating_sub(self.latest_self_advancement)
    }

    /// Record a new self event. Returns true if the snapshot moved.
    pub fn add_self_event(&mut self, tipset: &Tipset) -> bool {
        let advancement = tipset.advancement_weight(&self.snapshot, &self.roster, self.self_index);
        let self_weight = self
            .roster
            .entries()
            .get(self.self_index)
            .map(|entry| entry.weight)
            .unwrap_or(0);

        self.latest_self_tipset = tipset.clone();
        if Threshold::SuperMajority.is_satisfied_by(
            advancement.saturating_add(self_weight),
            self.roster.total_weight(),
        ) {
            self.snapshot = tipset.clone();
            self.latest_self_advancement = 0;
            true
        } else {
            self.latest_self_advancement = advancement;
            false
        }
    }

    /// Call after the snapshot moved, with the childless events still
    /// available as other parents.
    pub fn update_selfishness_scores<'a>(
        &mut self,
        childless: impl IntoIterator<Item = &'a EventDescriptor>,
    ) {
        let mut passed_over = vec![false; self.roster.len()];
        for event in childless {
            match self.roster.index_of(event.creator) {
                Some(index)
                    if index != self.self_index && event.generation > self.snapshot.get(index) =>
                {
                    passed_over[index] = true;
                }
                _ => {}
            }
        }
        for (score, passed_over) in self.selfishness.iter_mut().zip(passed_over) {
            *score = if passed_over { *score + 1 } else { 0 };
        }
    }

    pub fn selfishness_score_for_node(&self, node: NodeId) -> u64 {
        self.roster
            .index_of(node)
            .and_then(|index| self.selfishness.get(index).copied())
            .unwrap_or(0)
    }

    pub fn max_selfishness_score(&self) -> u64 {
        self.selfishness.iter().copied().max().unwrap_or(0)
    }

    pub fn snapshot(&self) -> &Tipset {
        &self.snapshot
    }

    pub fn clear(&mut self) {
        let size = self.roster.len();
        self.snapshot = Tipset::empty(size);
        self.latest_self_tipset = Tipset::empty(size);
        self.latest_self_advancement = 0;
        self.selfishness = vec![0; size];
    }
}
