//! # Gossip Flows
//!
//! Several event creators exchanging every event they create, the way a
//! fully connected gossip network would.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    use hw_02_event_creation::{EventCreationApi, EventHasher};
    use shared_crypto::{Ed25519KeyPair, Ed25519Signature};
    use shared_types::{ManualTimeSource, PlatformEvent, PlatformStatus};

    use crate::fixtures::{roster, TestNode};

    fn network(size: u64) -> (Vec<TestNode>, Arc<ManualTimeSource>) {
        let roster = roster(size);
        let clock = Arc::new(ManualTimeSource::new(1));
        let mut nodes: Vec<TestNode> = (0..size)
            .map(|id| TestNode::new(id, roster.clone(), clock.clone()))
            .collect();
        for node in &mut nodes {
            node.set_status(PlatformStatus::Active);
        }
        (nodes, clock)
    }

    /// Each node in turn tries to create, and every event reaches everyone.
    fn gossip_rounds(
        nodes: &mut [TestNode],
        clock: &ManualTimeSource,
        rounds: usize,
    ) -> Vec<PlatformEvent> {
        let mut created = Vec::new();
        for _ in 0..rounds {
            for creator in 0..nodes.len() {
                clock.advance(Duration::from_millis(1));
                let Some(event) = nodes[creator].manager.maybe_create_event() else {
                    continue;
                };
                for (index, node) in nodes.iter_mut().enumerate() {
                    if index != creator {
                        node.manager.register_event(event.clone());
                    }
                }
                created.push(event);
            }
        }
        created
    }

    #[test]
    fn test_events_link_across_creators() {
        let (mut nodes, clock) = network(4);
        let events = gossip_rounds(&mut nodes, &clock, 5);
        assert!(events.len() >= 8);

        let hashes: HashSet<_> = events.iter().map(|e| e.hash()).collect();
        assert_eq!(hashes.len(), events.len());

        for event in &events {
            for parent in &event.event.other_parents {
                assert_ne!(parent.creator, event.creator());
                assert!(hashes.contains(&parent.hash));
            }
            if let Some(self_parent) = event.event.self_parent {
                assert_eq!(self_parent.creator, event.creator());
                assert!(event.event.generation > self_parent.generation);
            }
        }
        assert!(events.iter().skip(4).all(|e| !e.event.other_parents.is_empty()));
    }

    #[test]
    fn test_events_hash_and_sign_consistently() {
        let (mut nodes, clock) = network(3);
        let hasher = EventHasher::new();
        for event in gossip_rounds(&mut nodes, &clock, 3) {
            assert_eq!(hasher.hash(&event.event), event.hash());
            let seed = event.creator().0 as u8 + 1;
            let public = Ed25519KeyPair::from_seed([seed; 32]).public_key();
            let signature = event.signature.expect("self events leave the creator signed");
            assert!(public
                .verify_hash(&event.hash(), &Ed25519Signature::from_bytes(signature))
                .is_ok());
        }
    }

    #[test]
    fn test_transactions_included_exactly_once() {
        let (mut nodes, clock) = network(3);
        for i in 0..20u8 {
            assert!(nodes[0].pool.submit_application_transaction(vec![i; 16]));
        }
        let events = gossip_rounds(&mut nodes, &clock, 6);

        let included: Vec<_> = events
            .iter()
            .filter(|e| e.creator() == nodes[0].id)
            .flat_map(|e| e.event.transactions.iter())
            .map(|t| t.payload[0])
            .collect();
        assert_eq!(included, (0..20).collect::<Vec<_>>());
        assert_eq!(nodes[0].pool.buffered_transaction_count(), 0);
    }
}
