//! Ed25519 key pair adapter for [`HashSigner`].

use shared_crypto::Ed25519KeyPair;
use shared_types::{Hash, PublicKey, Signature};

use crate::ports::outbound::HashSigner;

pub struct KeyPairHashSigner {
    keypair: Ed25519KeyPair,
}

impl KeyPairHashSigner {
    pub fn new(keypair: Ed25519KeyPair) -> Self {
        Self { keypair }
    }

    pub fn public_key(&self) -> PublicKey {
        *self.keypair.public_key().as_bytes()
    }
}

impl HashSigner for KeyPairHashSigner {
    fn sign(&self, hash: &Hash) -> Signature {
        self.keypair.sign_hash(hash).to_bytes()
    }
}
