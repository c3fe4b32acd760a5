//! Merkle Mountain Range verifier.
//!
//! An MMR is a forest of perfect `n`-ary trees whose sizes strictly
//! decrease left to right. This module checks that a claimed peak list
//! is well-formed for a claimed leaf count, bags peaks into a root, and
//! maps a global leaf index to the peak (and in-tree local index) that
//! contains it.

use crate::digest::{hash_concat, Digest};
use crate::types::Peak;

/// The base-`n` digit decomposition of `leaf_count`, expressed as the
/// sequence of peak sizes it implies: each non-zero digit `d` of the
/// highest power first contributes `d` peaks of that power, down to the
/// ones place. Empty iff `leaf_count == 0`.
///
/// Exposed so prover implementations can build an MMR whose peak list
/// the verifier will accept; `verify` below is the actual predicate.
pub fn expected_peak_sizes(n: u64, leaf_count: u64) -> Vec<u64> {
    if leaf_count == 0 {
        return Vec::new();
    }

    let mut powers = vec![1u64];
    while let Some(&last) = powers.last() {
        match last.checked_mul(n) {
            Some(next) if next <= leaf_count => powers.push(next),
            _ => break,
        }
    }

    let mut sizes = Vec::new();
    let mut remaining = leaf_count;
    for &power in powers.iter().rev() {
        let digit = remaining / power;
        for _ in 0..digit {
            sizes.push(power);
        }
        remaining %= power;
    }
    sizes
}

/// Bag a peak list right-to-left: `acc <- H(concat(peak_i, acc))`,
/// starting from the rightmost peak. `None` for an empty list.
pub fn bag_peaks(peaks: &[Peak]) -> Option<Digest> {
    let mut iter = peaks.iter().rev();
    let mut acc = iter.next()?.root_hash;
    for peak in iter {
        acc = hash_concat(&[peak.root_hash, acc]);
    }
    Some(acc)
}

/// The digest bagged peaks fold to when the MMR is empty. Not specified
/// by the protocol text; fixed here as the all-zero digest so `verify`
/// has a concrete acceptance condition for `leaf_count == 0` (see
/// DESIGN.md "empty MMR root").
pub const EMPTY_ROOT: Digest = Digest::ZERO;

/// Check that `peaks` is well-formed for `leaf_count` and bags to `root`.
pub fn verify(n: u8, root: Digest, peaks: &[Peak], leaf_count: u64) -> bool {
    if n < 2 {
        return false;
    }
    let expected = expected_peak_sizes(n as u64, leaf_count);
    if expected.len() != peaks.len() {
        return false;
    }
    if peaks.iter().zip(expected.iter()).any(|(p, s)| p.size != *s) {
        return false;
    }

    match bag_peaks(peaks) {
        Some(bagged) => bagged == root,
        None => leaf_count == 0 && root == EMPTY_ROOT,
    }
}

/// Map a global leaf index to the peak whose size-prefix-sum range
/// contains it, plus the in-tree local index. Plain linear scan over the
/// peak list's size prefix sums.
pub fn get_peak_and_index(peaks: &[Peak], global_index: u64) -> Option<(Peak, u64)> {
    let mut offset = 0u64;
    for peak in peaks {
        if global_index < offset + peak.size {
            return Some((*peak, global_index - offset));
        }
        offset += peak.size;
    }
    None
}
