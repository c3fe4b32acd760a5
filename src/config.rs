//! Crate configuration.

use crate::prover::Prover;
use crate::store::SyncStore;
use std::sync::Arc;

/// `n` must equal the fan-out used by every prover when constructing its
/// MMR and Merkle trees; a mismatch is a configuration error rather than
/// something this crate can detect in-band (a prover using a different
/// `n` just looks structurally malformed and loses immediately).
pub struct Config {
    pub n: u8,
    pub provers: Vec<Arc<dyn Prover>>,
    pub store: Arc<dyn SyncStore>,
}

impl Config {
    /// `n` defaults to 2 (binary MMR/Merkle trees), matching the
    /// protocol's default fan-out.
    pub fn new(provers: Vec<Arc<dyn Prover>>, store: Arc<dyn SyncStore>) -> Self {
        Self {
            n: 2,
            provers,
            store,
        }
    }

    pub fn with_fanout(mut self, n: u8) -> Self {
        self.n = n;
        self
    }
}
