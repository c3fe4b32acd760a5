//! n-ary Merkle tree verifier.
//!
//! A balanced tree with fan-out `n`: leaf hash `= H(leafBytes)`, internal
//! node hash `= H(concat(children))`. [`verify`] recomputes the root from
//! a leaf and its sibling path and never panics on malformed input, any
//! shape mismatch is simply a rejection.

use crate::digest::{hash_concat, Digest};

/// Recompute the path from `leaf_hash` to `root` in an `n`-ary tree.
///
/// `proof[level]` holds the `n - 1` sibling hashes at that level, ordered
/// left-to-right with the current child's slot omitted. The current
/// child's position within its `n`-ary parent at `level` is
/// `(index / n^level) mod n`.
///
/// Accepts iff the recomputed root equals `root`. Malformed proofs
/// (wrong sibling count at any level, or fan-out `< 2`) and root
/// mismatches both yield `false`.
pub fn verify(n: u8, leaf_hash: Digest, index: u64, root: Digest, proof: &[Vec<Digest>]) -> bool {
    if n < 2 {
        return false;
    }
    let n_usize = n as usize;
    let n64 = n as u64;

    let mut current = leaf_hash;
    let mut idx = index;

    for siblings in proof {
        if siblings.len() != n_usize - 1 {
            return false;
        }
        let position = (idx % n64) as usize;

        let mut children = Vec::with_capacity(n_usize);
        let mut sib_iter = siblings.iter();
        for slot in 0..n_usize {
            if slot == position {
                children.push(current);
            } else {
                match sib_iter.next() {
                    Some(s) => children.push(*s),
                    None => return false,
                }
            }
        }

        current = hash_concat(&children);
        idx /= n64;
    }

    current == root
}
