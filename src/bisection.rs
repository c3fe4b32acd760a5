//! The tree-vs-tree bisection game.
//!
//! Given two nodes that are known to root two disagreeing subtrees,
//! binary-(or `n`-ary-)search down to the first leaf where the two
//! sides diverge, rejecting either side immediately if its claimed
//! children don't hash back to the node it claimed.

use crate::digest::{hash_concat, Digest};
use crate::error::{Result, SuperlightError};
use crate::prover::Prover;

/// Outcome of one bisection descent. Per the design notes this is
/// deliberately a tagged union rather than an overloaded int-or-bool:
/// either side already lost structurally (`Winner`), or bisection
/// bottomed out at a leaf that still needs a fraud-proof check
/// (`DisputedLeaf`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BisectionOutcome {
    /// `true` means `A` is the honest side.
    Winner(bool),
    /// In-tree index of the first leaf where `A` and `B` disagree.
    DisputedLeaf(u64),
}

fn children_valid(n: u8, response_children: Option<&[Digest]>, claimed_node: Digest) -> bool {
    match response_children {
        Some(children) => children.len() == n as usize && hash_concat(children) == claimed_node,
        None => false,
    }
}

/// Bisect from `root_a`/`root_b` (known to disagree) down `depth` levels.
///
/// `depth == 0` means the two peak roots being compared are themselves
/// leaves, so there is nothing to bisect, and the disputed leaf is
/// whichever index the caller is already at (`index 0` relative to this
/// subtree).
pub async fn tree_vs_tree(
    prover_a: &dyn Prover,
    prover_b: &dyn Prover,
    n: u8,
    root_a: Digest,
    root_b: Digest,
    depth: u32,
) -> Result<BisectionOutcome> {
    if depth == 0 {
        return Ok(BisectionOutcome::DisputedLeaf(0));
    }

    let mut node_a = root_a;
    let mut node_b = root_b;
    let mut index: u64 = 0;

    for _ in 0..depth {
        let (resp_a, resp_b) = tokio::join!(
            prover_a.get_node(root_a, node_a),
            prover_b.get_node(root_b, node_b)
        );

        let children_a = resp_a.ok().and_then(|r| r.children);
        if !children_valid(n, children_a.as_deref(), node_a) {
            return Ok(BisectionOutcome::Winner(false));
        }

        let children_b = resp_b.ok().and_then(|r| r.children);
        if !children_valid(n, children_b.as_deref(), node_b) {
            return Ok(BisectionOutcome::Winner(true));
        }

        let children_a = children_a.expect("validated above");
        let children_b = children_b.expect("validated above");

        let j = children_a
            .iter()
            .zip(children_b.iter())
            .position(|(x, y)| x != y);

        let j = j.ok_or_else(|| {
            SuperlightError::ProtocolInvariantViolation(
                "tree_vs_tree: claimed-differing nodes have identical children".into(),
            )
        })?;

        node_a = children_a[j];
        node_b = children_b[j];
        index = index * n as u64 + j as u64;
    }

    Ok(BisectionOutcome::DisputedLeaf(index))
}
