//! # BLAKE3 Hashing
//!
//! Streaming and one-shot hashing plus the binary merkle root used for
//! state hashes.
//!
//! Hash inputs that must agree across nodes are fed through the typed
//! `update_*` methods, which fix the byte layout: integers are little
//! endian, variable-length fields are prefixed with their length.

use blake3::Hasher;

/// BLAKE3 hash output (256-bit).
pub type Hash = [u8; 32];

const MERKLE_LEAF_PREFIX: u8 = 0x00;
const MERKLE_NODE_PREFIX: u8 = 0x01;

/// Stateful BLAKE3 hasher.
pub struct Blake3Hasher {
    inner: Hasher,
}

impl Blake3Hasher {
    /// Create new hasher.
    pub fn new() -> Self {
        Self {
            inner: Hasher::new(),
        }
    }

    /// Create a hasher whose output is bound to `context`.
    ///
    /// Two hashers with different contexts never produce colliding digests
    /// for the same input.
    pub fn with_domain(context: &str) -> Self {
        let mut hasher = Self::new();
        hasher.update_bytes(context.as_bytes());
        hasher
    }

    /// Update with raw data.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update(data);
        self
    }

    /// Update with a length-prefixed byte string.
    pub fn update_bytes(&mut self, data: &[u8]) -> &mut Self {
        self.update_u64(data.len() as u64);
        self.inner.update(data);
        self
    }

    /// Update with a little-endian u64.
    pub fn update_u64(&mut self, value: u64) -> &mut Self {
        self.inner.update(&value.to_le_bytes());
        self
    }

    /// Update with a presence marker followed by the value, if any.
    pub fn update_optional(&mut self, value: Option<&[u8]>) -> &mut Self {
        match value {
            Some(bytes) => {
                self.inner.update(&[1]);
                self.update_bytes(bytes)
            }
            None => self.update(&[0]),
        }
    }

    /// Finalize and return hash.
    pub fn finalize(&self) -> Hash {
        let hash = self.inner.finalize();
        *hash.as_bytes()
    }

    /// Reset hasher for reuse.
    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

impl Default for Blake3Hasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash data with BLAKE3 (one-shot).
pub fn blake3_hash(data: &[u8]) -> Hash {
    *blake3::hash(data).as_bytes()
}

/// Binary merkle root over `leaves`.
///
/// Leaves and interior nodes are hashed with distinct prefixes. An odd node
/// at the end of a level is promoted unchanged. The root of no leaves is
/// `blake3("")`.
pub fn merkle_root<L: AsRef<[u8]>>(leaves: &[L]) -> Hash {
    if leaves.is_empty() {
        return blake3_hash(&[]);
    }

    let mut level: Vec<Hash> = leaves
        .iter()
        .map(|leaf| {
            let mut hasher = Blake3Hasher::new();
            hasher.update(&[MERKLE_LEAF_PREFIX]).update(leaf.as_ref());
            hasher.finalize()
        })
        .collect();

    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| {
                if let [left, right] = pair {
                    let mut hasher = Blake3Hasher::new();
                    hasher
                        .update(&[MERKLE_NODE_PREFIX])
                        .update(left)
                        .update(right);
                    hasher.finalize()
                } else {
                    pair[0]
                }
            })
            .collect();
    }

    level[0]
}
