//! Pairwise disagreement resolution: `peaksVsPeaks`, the single-leaf
//! fraud-proof check, and the tournament that reduces a pool of
//! surveyed provers down to the surviving honest equivalence class.

use crate::bisection::{tree_vs_tree, BisectionOutcome};
use crate::error::{Result, SuperlightError};
use crate::mmr;
use crate::prover::Prover;
use crate::store::SyncStore;
use crate::types::{Committee, LeafQuery, Peak, Period, ProverRecord};

/// Fetch and Merkle-verify a single committee leaf. Returns
/// `None` on any failure (transport error, bad proof, out-of-range
/// period): the caller is responsible for turning that into a loss.
pub async fn get_verified_sync_committee(
    prover: &dyn Prover,
    query: LeafQuery,
    peaks: &[Peak],
    n: u8,
) -> Option<Committee> {
    let leaf = prover.get_leaf_with_proof(query).await.ok()?;

    let (peak, local_index) = match query {
        LeafQuery::Latest => {
            let peak = *peaks.last()?;
            (peak, peak.size.checked_sub(1)?)
        }
        LeafQuery::Period(period) => mmr::get_peak_and_index(peaks, period.0)?,
    };

    let leaf_hash = leaf.sync_committee.hash();
    if crate::merkle::verify(n, leaf_hash, local_index, peak.root_hash, &leaf.proof) {
        Some(leaf.sync_committee)
    } else {
        None
    }
}

/// The two-sided adjudication table for a resolved disputed leaf. `ok_a`/`ok_b` are
/// whatever the two sides' correctness checks were for this leaf
/// (genesis-equality at period 0, or update verification above it).
fn adjudicate(ok_a: bool, ok_b: bool) -> Result<bool> {
    match (ok_a, ok_b) {
        (true, false) => Ok(true),
        (false, true) => Ok(false),
        (false, false) => Ok(false),
        (true, true) => Err(SuperlightError::ProtocolInvariantViolation(
            "checkNodeAndPrevUpdate: both sides verified at the disputed leaf".into(),
        )),
    }
}

/// Resolve the disputed leaf at `period` using the previous period's
/// committee and each side's signed update for it (or, at period 0, the
/// known genesis committee).
pub async fn check_node_and_prev_update(
    a: &ProverRecord,
    b: &ProverRecord,
    prover_a: &dyn Prover,
    prover_b: &dyn Prover,
    store: &dyn SyncStore,
    n: u8,
    period: u64,
) -> Result<bool> {
    let committee_a = get_verified_sync_committee(prover_a, LeafQuery::Period(Period(period)), &a.peaks, n).await;
    let committee_a = match committee_a {
        Some(c) => c,
        None => return Ok(false), // A's inclusion proof failed: A loses.
    };

    let committee_b = get_verified_sync_committee(prover_b, LeafQuery::Period(Period(period)), &b.peaks, n).await;
    let committee_b = match committee_b {
        Some(c) => c,
        None => return Ok(true), // B's inclusion proof failed: B loses.
    };

    if period == 0 {
        let genesis = store.genesis_sync_committee();
        return adjudicate(committee_a == genesis, committee_b == genesis);
    }

    let prev_committee =
        match get_verified_sync_committee(prover_a, LeafQuery::Period(Period(period - 1)), &a.peaks, n).await {
            Some(c) => c,
            None => return Ok(false), // A loses: even its own earlier leaf doesn't check out.
        };

    let update_a = prover_a.get_sync_updates(Period(period - 1), 1).await;
    let ok_a = matches!(&update_a, Ok(updates) if updates.first()
        .is_some_and(|u| store.sync_update_verify(&prev_committee, &committee_a, u)));

    let update_b = prover_b.get_sync_updates(Period(period - 1), 1).await;
    let ok_b = matches!(&update_b, Ok(updates) if updates.first()
        .is_some_and(|u| store.sync_update_verify(&prev_committee, &committee_b, u)));

    adjudicate(ok_a, ok_b)
}

/// Walk two peak lists to the first differing peak, bisect
/// within it, then resolve the disputed leaf. Returns `true` iff `a` is
/// the honest side.
pub async fn peaks_vs_peaks(
    a: &ProverRecord,
    b: &ProverRecord,
    prover_a: &dyn Prover,
    prover_b: &dyn Prover,
    store: &dyn SyncStore,
    n: u8,
) -> Result<bool> {
    if a.peaks.len() != b.peaks.len() {
        return Err(SuperlightError::ProtocolInvariantViolation(
            "peaksVsPeaks: mismatched peak-list lengths after audit".into(),
        ));
    }

    let mut offset = 0u64;
    for (peak_a, peak_b) in a.peaks.iter().zip(b.peaks.iter()) {
        if peak_a.root_hash == peak_b.root_hash {
            offset += peak_a.size;
            continue;
        }

        let depth = integer_log(n as u64, peak_a.size).ok_or_else(|| {
            SuperlightError::ProtocolInvariantViolation(
                "peaksVsPeaks: peak size is not a power of n".into(),
            )
        })?;

        let outcome =
            tree_vs_tree(prover_a, prover_b, n, peak_a.root_hash, peak_b.root_hash, depth).await?;

        return match outcome {
            BisectionOutcome::Winner(honest_a) => Ok(honest_a),
            BisectionOutcome::DisputedLeaf(local_leaf) => {
                let period = offset + local_leaf;
                check_node_and_prev_update(a, b, prover_a, prover_b, store, n, period).await
            }
        };
    }

    Err(SuperlightError::ProtocolInvariantViolation(
        "peaksVsPeaks: roots differ but no peak differs".into(),
    ))
}

/// `n^depth == size`, or `None` if `size` is not an exact power of `n`.
fn integer_log(n: u64, size: u64) -> Option<u32> {
    if size == 0 {
        return None;
    }
    let mut depth = 0u32;
    let mut value = 1u64;
    while value < size {
        value = value.checked_mul(n)?;
        depth += 1;
    }
    if value == size {
        Some(depth)
    } else {
        None
    }
}

/// Pool provers with identical roots, play one game per
/// divergent survivor, keep the winning equivalence class.
pub async fn run_tournament(
    survivors: Vec<ProverRecord>,
    provers: &[std::sync::Arc<dyn Prover>],
    store: &dyn SyncStore,
    n: u8,
) -> Result<Vec<ProverRecord>> {
    let mut iter = survivors.into_iter();
    let mut winners = vec![iter.next().expect("caller guarantees at least one survivor")];

    for candidate in iter {
        if candidate.root == winners[0].root {
            winners.push(candidate);
            continue;
        }

        let prover_a = provers[winners[0].index].as_ref();
        let prover_b = provers[candidate.index].as_ref();
        let a_honest = peaks_vs_peaks(&winners[0], &candidate, prover_a, prover_b, store, n).await?;

        if !a_honest {
            winners = vec![candidate];
        }
        // else: candidate is discarded, winners unchanged.
    }

    Ok(winners)
}
