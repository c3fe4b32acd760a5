//! Hash primitive and byte utilities.
//!
//! One canonical collision-resistant hash is used everywhere in the
//! protocol: leaves, internal Merkle nodes, MMR bagging, and committee
//! hashing all go through [`hash`].

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::fmt;

/// Fixed-width output of the canonical hash function.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    pub const ZERO: Digest = Digest([0u8; 32]);

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl From<[u8; 32]> for Digest {
    fn from(bytes: [u8; 32]) -> Self {
        Digest(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// The canonical hash function, `H`.
pub fn hash(bytes: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let out = hasher.finalize();
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&out);
    Digest(digest)
}

/// Concatenate a slice of byte-like things into one buffer before hashing.
pub fn concat<T: AsRef<[u8]>>(parts: &[T]) -> Vec<u8> {
    let mut out = Vec::with_capacity(parts.iter().map(|p| p.as_ref().len()).sum());
    for part in parts {
        out.extend_from_slice(part.as_ref());
    }
    out
}

/// Hash the concatenation of a slice of digests.
pub fn hash_concat(parts: &[Digest]) -> Digest {
    hash(&concat(parts))
}

/// Equality check. The adversary controls both sides of every comparison
/// in this protocol, so there is nothing secret to protect against timing
/// side channels here, plain `==` is fine.
pub fn eq(a: &Digest, b: &Digest) -> bool {
    a == b
}
