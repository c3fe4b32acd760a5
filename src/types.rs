//! Core data model: committees, periods, peaks, updates and prover records.

use crate::digest::{hash, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Size in bytes of a compressed BLS12-381 public key, the width used by
/// sync-committee beacon chains. The concrete signature scheme is out of
/// scope for this crate; only the byte width is needed to
/// compute a committee's hash.
pub const PUBLIC_KEY_SIZE: usize = 48;

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey(pub [u8; PUBLIC_KEY_SIZE]);

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0[..4] {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, "..")
    }
}

/// Ordered sequence of public keys active during a period.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Committee(pub Vec<PublicKey>);

impl Committee {
    pub fn new(keys: Vec<PublicKey>) -> Self {
        Committee(keys)
    }

    /// `H(concat(keys))`, used both as a Merkle leaf hash and to compare
    /// committees for equality without holding the full key list.
    pub fn hash(&self) -> Digest {
        let keys: Vec<&[u8]> = self.0.iter().map(|k| k.0.as_slice()).collect();
        hash(&keys.concat())
    }
}

/// Non-negative integer epoch index.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period(pub u64);

impl fmt::Debug for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Period({})", self.0)
    }
}

impl From<u64> for Period {
    fn from(v: u64) -> Self {
        Period(v)
    }
}

impl Add<u64> for Period {
    type Output = Period;
    fn add(self, rhs: u64) -> Period {
        Period(self.0 + rhs)
    }
}

impl Sub<u64> for Period {
    type Output = Period;
    fn sub(self, rhs: u64) -> Period {
        Period(self.0 - rhs)
    }
}

/// A query for a single leaf: either a concrete period or the rightmost
/// (most recent) leaf in the claimed MMR.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LeafQuery {
    Period(Period),
    Latest,
}

/// One perfect tree in an MMR.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Peak {
    pub root_hash: Digest,
    pub size: u64,
}

/// Opaque fraud-proof material attesting a committee transition. The
/// crate never interprets `signature`/`signed_header` itself; they are
/// handed whole to [`crate::store::SyncStore::sync_update_verify`].
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SyncUpdate {
    pub next_committee: Committee,
    pub signed_header: Vec<u8>,
    pub signature: Vec<u8>,
}

/// State tracked for one prover across a `sync()` invocation.
#[derive(Clone, Debug)]
pub struct ProverRecord {
    pub index: usize,
    pub root: Digest,
    pub peaks: Vec<Peak>,
    pub sync_committee: Option<Committee>,
}
