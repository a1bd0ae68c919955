//! Per-round accumulation of state hashes.

use std::collections::HashMap;

use shared_types::{Hash, IssType, NodeId, Threshold};

/// Every hash reported for one round, weighted by signer.
#[derive(Clone, Debug)]
pub struct RoundHashTally {
    round: u64,
    total_weight: u64,
    signatures: HashMap<NodeId, Hash>,
    weight_by_hash: HashMap<Hash, u64>,
    reported_weight: u64,
    self_hash: Option<Hash>,
    notified: bool,
}

impl RoundHashTally {
    pub fn new(round: u64, total_weight: u64) -> Self {
        Self {
            round,
            total_weight,
            signatures: HashMap::new(),
            weight_by_hash: HashMap::new(),
            reported_weight: 0,
            self_hash: None,
            notified: false,
        }
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn reported_weight(&self) -> u64 {
        self.reported_weight
    }

    pub fn self_hash(&self) -> Option<Hash> {
        self.self_hash
    }

    pub fn is_notified(&self) -> bool {
        self.notified
    }

    /// Returns `false` for a signer that has already reported.
    pub fn add_signature(&mut self, signer: NodeId, weight: u64, hash: Hash) -> bool {
        if self.signatures.contains_key(&signer) {
            return false;
        }
        self.signatures.insert(signer, hash);
        *self.weight_by_hash.entry(hash).or_insert(0) += weight;
        self.reported_weight += weight;
        true
    }

    pub fn set_self_hash(&mut self, hash: Hash) {
        self.self_hash = Some(hash);
    }

    /// The hash held by a majority of the total weight.
    pub fn decided_hash(&self) -> Option<Hash> {
        self.weight_by_hash
            .iter()
            .find(|(_, weight)| Threshold::Majority.is_satisfied_by(**weight, self.total_weight))
            .map(|(hash, _)| *hash)
    }

    /// No hash can reach a majority any more, even with all missing weight.
    pub fn is_catastrophic(&self) -> bool {
        let largest = self.weight_by_hash.values().copied().max().unwrap_or(0);
        let remaining = self.total_weight.saturating_sub(self.reported_weight);
        !Threshold::Majority.is_satisfied_by(largest + remaining, self.total_weight)
    }

    /// Classify the round, at most once.
    pub fn evaluate(&mut self, self_id: NodeId) -> Option<IssType> {
        if self.notified {
            return None;
        }
        let outcome = match self.decided_hash() {
            Some(decided) => {
                let self_hash = self.self_hash?;
                if self_hash != decided {
                    Some(IssType::SelfIss)
                } else if self
                    .signatures
                    .iter()
                    .any(|(signer, hash)| *signer != self_id && *hash != decided)
                {
                    Some(IssType::OtherIss)
                } else {
                    None
                }
            }
            None if self.is_catastrophic() => Some(IssType::CatastrophicIss),
            None => None,
        };
        if outcome.is_some() {
            self.notified = true;
        }
        outcome
    }

    /// Signers whose hash differs from the decided one.
    pub fn dissenters(&self) -> Vec<NodeId> {
        let Some(decided) = self.decided_hash() else {
            return Vec::new();
        };
        let mut dissenters: Vec<_> = self
            .signatures
            .iter()
            .filter(|(_, hash)| **hash != decided)
            .map(|(signer, _)| *signer)
            .collect();
        dissenters.sort();
        dissenters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SELF: NodeId = NodeId(0);

    #[test]
    fn test_undecided_until_majority() {
        let mut tally = RoundHashTally::new(1, 4);
        tally.set_self_hash([1; 32]);
        tally.add_signature(NodeId(0), 1, [1; 32]);
        tally.add_signature(NodeId(1), 1, [1; 32]);
        assert_eq!(tally.decided_hash(), None);
        assert_eq!(tally.evaluate(SELF), None);

        tally.add_signature(NodeId(2), 1, [1; 32]);
        assert_eq!(tally.decided_hash(), Some([1; 32]));
        assert_eq!(tally.evaluate(SELF), None);
        assert!(!tally.is_notified());
    }

    #[test]
    fn test_late_dissent_raises_other_iss_once() {
        let mut tally = RoundHashTally::new(1, 4);
        tally.set_self_hash([1; 32]);
        for id in 0..3 {
            tally.add_signature(NodeId(id), 1, [1; 32]);
        }
        assert_eq!(tally.evaluate(SELF), None);

        tally.add_signature(NodeId(3), 1, [9; 32]);
        assert_eq!(tally.evaluate(SELF), Some(IssType::OtherIss));
        assert_eq!(tally.evaluate(SELF), None);
        assert_eq!(tally.dissenters(), vec![NodeId(3)]);
    }

    #[test]
    fn test_self_iss_needs_self_hash() {
        let mut tally = RoundHashTally::new(1, 3);
        tally.add_signature(NodeId(1), 1, [1; 32]);
        tally.add_signature(NodeId(2), 1, [1; 32]);
        assert_eq!(tally.evaluate(SELF), None);

        tally.set_self_hash([2; 32]);
        assert_eq!(tally.evaluate(SELF), Some(IssType::SelfIss));
    }

    #[test]
    fn test_catastrophic_when_majority_unreachable() {
        let mut tally = RoundHashTally::new(1, 3);
        tally.add_signature(NodeId(0), 1, [1; 32]);
        tally.add_signature(NodeId(1), 1, [2; 32]);
        assert!(!tally.is_catastrophic());
        tally.add_signature(NodeId(2), 1, [3; 32]);
        assert!(tally.is_catastrophic());
        assert_eq!(tally.evaluate(SELF), Some(IssType::CatastrophicIss));
    }

    #[test]
    fn test_duplicate_signer_ignored() {
        let mut tally = RoundHashTally::new(1, 3);
        assert!(tally.add_signature(NodeId(1), 1, [1; 32]));
        assert!(!tally.add_signature(NodeId(1), 1, [2; 32]));
        assert_eq!(tally.reported_weight(), 1);
    }
}
