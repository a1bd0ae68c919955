//! Adapters connecting event creation to the pool and the node key.

pub mod pool;
pub mod signer;

pub use signer::KeyPairHashSigner;
