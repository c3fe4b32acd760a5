//! Sync store, verifier role.
//!
//! The four operations the core consumes from the verifier's own
//! trusted state: the genesis committee it was bootstrapped with, its
//! local clock (`current_period`), and the fraud-proof predicate that
//! checks one committee transition. The concrete signature scheme is
//! out of scope, `sync_update_verify` implementations own that
//! entirely; this crate only ever calls the predicate.

use crate::types::{Committee, Period, SyncUpdate};

/// Verifier-side sync store, consumed read-only during a `sync()` call.
pub trait SyncStore: Send + Sync {
    fn genesis_sync_committee(&self) -> Committee;
    fn genesis_period(&self) -> Period;
    fn current_period(&self) -> Period;

    /// `true` iff `update.next_committee == cur` and the aggregate
    /// signature carried in `update` verifies under `prev`'s keys over
    /// `H(update.signed_header)`. Implementations MUST return `false`
    /// rather than panic on any parse error or bad signature.
    fn sync_update_verify(&self, prev: &Committee, cur: &Committee, update: &SyncUpdate) -> bool;

    /// Number of leaves expected in every honest MMR:
    /// `currentPeriod - genesisPeriod + 1`.
    fn mmr_size(&self) -> u64 {
        self.current_period().0 - self.genesis_period().0 + 1
    }
}

/// A reference `SyncStore` backed by plain fields and a pluggable
/// verification predicate, for embedders who already hold genesis state
/// in memory and want to supply their own signature check as a closure
/// rather than implementing the trait by hand.
pub struct InMemoryStore<V> {
    genesis_committee: Committee,
    genesis_period: Period,
    current_period: Period,
    verify_update: V,
}

impl<V> InMemoryStore<V>
where
    V: Fn(&Committee, &Committee, &SyncUpdate) -> bool + Send + Sync,
{
    pub fn new(
        genesis_committee: Committee,
        genesis_period: Period,
        current_period: Period,
        verify_update: V,
    ) -> Self {
        Self {
            genesis_committee,
            genesis_period,
            current_period,
            verify_update,
        }
    }
}

impl<V> SyncStore for InMemoryStore<V>
where
    V: Fn(&Committee, &Committee, &SyncUpdate) -> bool + Send + Sync,
{
    fn genesis_sync_committee(&self) -> Committee {
        self.genesis_committee.clone()
    }

    fn genesis_period(&self) -> Period {
        self.genesis_period
    }

    fn current_period(&self) -> Period {
        self.current_period
    }

    fn sync_update_verify(&self, prev: &Committee, cur: &Committee, update: &SyncUpdate) -> bool {
        (self.verify_update)(prev, cur, update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PublicKey;

    fn committee(seed: u8) -> Committee {
        Committee::new(vec![PublicKey([seed; crate::types::PUBLIC_KEY_SIZE])])
    }

    #[test]
    fn mmr_size_is_inclusive_range() {
        let store = InMemoryStore::new(committee(0), Period(10), Period(13), |_, _, _| true);
        assert_eq!(store.mmr_size(), 4);
    }

    #[test]
    fn sync_update_verify_delegates_to_closure() {
        let store = InMemoryStore::new(committee(0), Period(0), Period(1), |prev, cur, _update| {
            prev != cur
        });
        let update = SyncUpdate {
            next_committee: committee(1),
            signed_header: vec![],
            signature: vec![],
        };
        assert!(store.sync_update_verify(&committee(0), &committee(1), &update));
        assert!(!store.sync_update_verify(&committee(0), &committee(0), &update));
    }
}
