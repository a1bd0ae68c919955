//! Self-event signing over the event hash.

use std::sync::Arc;

use shared_types::PlatformEvent;

use crate::ports::outbound::HashSigner;

#[derive(Clone)]
pub struct SelfEventSigner {
    signer: Arc<dyn HashSigner>,
}

impl SelfEventSigner {
    pub fn new(signer: Arc<dyn HashSigner>) -> Self {
        Self { signer }
    }

    /// Sign `event.hash()`. An existing signature is replaced.
    pub fn sign_event(&self, event: PlatformEvent) -> PlatformEvent {
        let signature = self.signer.sign(&event.hash());
        event.with_signature(signature)
    }
}

impl std::fmt::Debug for SelfEventSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelfEventSigner").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::KeyPairHashSigner;
    use crate::domain::EventHasher;
    use shared_crypto::{Ed25519KeyPair, Ed25519Signature};
    use shared_types::{NodeId, UnsignedEvent};

    #[test]
    fn test_signature_verifies_over_hash() {
        let keypair = Ed25519KeyPair::from_seed([5u8; 32]);
        let public_key = keypair.public_key();
        let signer = SelfEventSigner::new(Arc::new(KeyPairHashSigner::new(keypair)));

        let unsigned = UnsignedEvent {
            creator: NodeId(0),
            self_parent: None,
            other_parents: vec![],
            birth_round: 1,
            generation: 1,
            time_created: 42,
            transactions: vec![],
        };
        let signed = signer.sign_event(EventHasher::new().hash_event(unsigned));

        let signature = Ed25519Signature::from_bytes(signed.signature.unwrap());
        assert!(public_key.verify_hash(&signed.hash(), &signature).is_ok());
    }
}
