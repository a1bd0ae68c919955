//! # Event Hasher
//!
//! Computes the digest every node must agree on for a given event. The byte
//! layout is fixed by the typed hasher updates below; changing the order or
//! the domain tag forks the network.

use shared_crypto::Blake3Hasher;
use shared_types::{EventDescriptor, Hash, PlatformEvent, UnsignedEvent};

const EVENT_HASH_DOMAIN: &str = "hashweave.event.v1";

/// Stateless event digest calculator.
#[derive(Clone, Copy, Debug, Default)]
pub struct EventHasher;

impl EventHasher {
    pub fn new() -> Self {
        Self
    }

    /// Digest over the canonical encoding of `event`.
    pub fn hash(&self, event: &UnsignedEvent) -> Hash {
        let mut hasher = Blake3Hasher::with_domain(EVENT_HASH_DOMAIN);
        hasher
            .update_u64(event.creator.0)
            .update_optional(event.self_parent.as_ref().map(|p| p.hash.as_slice()))
            .update_u64(event.other_parents.len() as u64);
        for parent in &event.other_parents {
            hasher.update(&parent.hash);
        }
        hasher
            .update_u64(event.birth_round)
            .update_u64(event.generation)
            .update_u64(event.time_created)
            .update_u64(event.transactions.len() as u64);
        for tx in &event.transactions {
            hasher
                .update(&[u8::from(tx.is_system)])
                .update_bytes(&tx.payload);
        }
        hasher.finalize()
    }

    pub fn descriptor_of(&self, event: &UnsignedEvent) -> EventDescriptor {
        EventDescriptor {
            hash: self.hash(event),
            creator: event.creator,
            birth_round: event.birth_round,
            generation: event.generation,
        }
    }

    /// Attach the digest as the event's descriptor. The result is unsigned.
    pub fn hash_event(&self, event: UnsignedEvent) -> PlatformEvent {
        let descriptor = self.descriptor_of(&event);
        PlatformEvent {
            event,
            descriptor,
            signature: None,
        }
    }
}
