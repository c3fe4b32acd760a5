//! In-process prover fakes used to drive full `sync()` runs end to end,
//! honest and adversarial, without any real network or signature scheme.
//! The `Prover` trait is the seam that lets adversarial provers drive
//! these tests.

use async_trait::async_trait;
use std::collections::HashMap;
use superlight_client::digest::hash_concat;
use superlight_client::mmr::{bag_peaks, expected_peak_sizes, EMPTY_ROOT};
use superlight_client::{
    Committee, Digest, LeafQuery, LeafWithProof, MmrInfo, NodeResponse, Peak, Period, Prover,
    ProverError, ProverResult, PublicKey, SyncUpdate,
};

pub const PUBLIC_KEY_SIZE: usize = superlight_client::types::PUBLIC_KEY_SIZE;

pub fn committee(seed: u8) -> Committee {
    Committee::new(vec![PublicKey([seed; PUBLIC_KEY_SIZE])])
}

/// The deterministic stand-in for "aggregate signature verifies under
/// prev's keys": a MAC over the two committees' hashes. Good enough to
/// exercise the fraud-proof wiring; not a real signature scheme.
pub fn expected_signature(prev: &Committee, cur: &Committee) -> Vec<u8> {
    hash_concat(&[prev.hash(), cur.hash()]).as_bytes().to_vec()
}

pub fn verify_update(prev: &Committee, cur: &Committee, update: &SyncUpdate) -> bool {
    update.next_committee == *cur && update.signature == expected_signature(prev, cur)
}

/// A straight update with a correctly computed signature.
pub fn honest_update(prev: &Committee, cur: &Committee) -> SyncUpdate {
    SyncUpdate {
        next_committee: cur.clone(),
        signed_header: vec![],
        signature: expected_signature(prev, cur),
    }
}

/// An update whose signature is garbage, models a prover that cannot
/// produce a valid aggregate signature for the committee it claims.
pub fn forged_update(cur: &Committee) -> SyncUpdate {
    SyncUpdate {
        next_committee: cur.clone(),
        signed_header: vec![],
        signature: vec![0xFFu8; 32],
    }
}

struct PerfectTreeProofs {
    root: Digest,
    proofs: Vec<Vec<Vec<Digest>>>,
}

fn build_perfect_tree(n: u8, leaves: &[Digest], nodes: &mut HashMap<Digest, Vec<Digest>>) -> PerfectTreeProofs {
    let n_usize = n as usize;
    let mut level: Vec<Digest> = leaves.to_vec();
    let mut proofs: Vec<Vec<Vec<Digest>>> = vec![Vec::new(); leaves.len()];
    let mut local_index: Vec<usize> = (0..leaves.len()).collect();

    if level.len() == 1 {
        return PerfectTreeProofs { root: level[0], proofs };
    }

    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len() / n_usize);
        for chunk in level.chunks(n_usize) {
            let parent = hash_concat(chunk);
            nodes.insert(parent, chunk.to_vec());
            next.push(parent);
        }

        for leaf_idx in 0..leaves.len() {
            let pos = local_index[leaf_idx];
            let group = pos / n_usize;
            let slot = pos % n_usize;
            let chunk_start = group * n_usize;
            let chunk = &level[chunk_start..chunk_start + n_usize];
            let siblings: Vec<Digest> = chunk
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != slot)
                .map(|(_, d)| *d)
                .collect();
            proofs[leaf_idx].push(siblings);
            local_index[leaf_idx] = group;
        }
        level = next;
    }

    PerfectTreeProofs { root: level[0], proofs }
}

/// A fully in-memory `Prover` over a chain of committees, one per
/// period. `updates[p]` is the signed transition from period `p` to
/// `p + 1`.
pub struct FakeProver {
    pub root: Digest,
    pub peaks: Vec<Peak>,
    nodes: HashMap<Digest, Vec<Digest>>,
    committees: Vec<Committee>,
    proofs: Vec<Vec<Vec<Digest>>>,
    updates: Vec<SyncUpdate>,
}

impl FakeProver {
    /// Build a prover over `committees` (one per period, starting at
    /// period 0) using honest updates throughout.
    pub fn honest(n: u8, committees: Vec<Committee>) -> Self {
        let updates = (0..committees.len().saturating_sub(1))
            .map(|p| honest_update(&committees[p], &committees[p + 1]))
            .collect();
        Self::with_updates(n, committees, updates)
    }

    /// Build a prover over `committees` with explicit updates, allowing
    /// a test to forge specific transitions.
    pub fn with_updates(n: u8, committees: Vec<Committee>, updates: Vec<SyncUpdate>) -> Self {
        let leaves: Vec<Digest> = committees.iter().map(|c| c.hash()).collect();
        let leaf_count = leaves.len() as u64;
        let sizes = expected_peak_sizes(n as u64, leaf_count);

        let mut nodes = HashMap::new();
        let mut peaks = Vec::new();
        let mut proofs = vec![Vec::new(); leaves.len()];
        let mut offset = 0usize;

        for size in sizes {
            let size = size as usize;
            let chunk = &leaves[offset..offset + size];
            let built = build_perfect_tree(n, chunk, &mut nodes);
            peaks.push(Peak {
                root_hash: built.root,
                size: size as u64,
            });
            for (i, proof) in built.proofs.into_iter().enumerate() {
                proofs[offset + i] = proof;
            }
            offset += size;
        }

        let root = bag_peaks(&peaks).unwrap_or(EMPTY_ROOT);

        Self {
            root,
            peaks,
            nodes,
            committees,
            proofs,
            updates,
        }
    }

    /// Corrupt the proof served for a single leaf index, simulating a
    /// prover that cannot produce a valid Merkle inclusion proof for it
    /// (used to model S6: passes the MMR audit, fails the final check).
    pub fn corrupt_proof_at(&mut self, index: usize) {
        if let Some(level) = self.proofs[index].first_mut() {
            if let Some(sibling) = level.first_mut() {
                let mut bytes = *sibling.as_bytes();
                bytes[0] ^= 0xFF;
                *sibling = Digest::from(bytes);
            }
        } else {
            self.proofs[index] = vec![vec![Digest::from([0xAB; 32])]];
        }
    }

    /// Corrupt whichever node the top-level peak resolves to, so the very
    /// first `getNode` call against this prover during a bisection serves
    /// children that don't hash back to the claimed node.
    pub fn corrupt_root_children(&mut self) {
        if let Some(peak) = self.peaks.iter().max_by_key(|p| p.size) {
            if let Some(children) = self.nodes.get_mut(&peak.root_hash) {
                if let Some(first) = children.first_mut() {
                    let mut bytes = *first.as_bytes();
                    bytes[0] ^= 0xFF;
                    *first = Digest::from(bytes);
                }
            }
        }
    }
}

#[async_trait]
impl Prover for FakeProver {
    async fn get_leaf_with_proof(&self, period: LeafQuery) -> ProverResult<LeafWithProof> {
        let index = match period {
            LeafQuery::Latest => self.committees.len().saturating_sub(1),
            LeafQuery::Period(p) => p.0 as usize,
        };
        if index >= self.committees.len() {
            return Err(ProverError::Transport("period out of range".into()));
        }
        Ok(LeafWithProof {
            sync_committee: self.committees[index].clone(),
            proof: self.proofs[index].clone(),
        })
    }

    async fn get_mmr_info(&self) -> ProverResult<MmrInfo> {
        Ok(MmrInfo {
            root_hash: self.root,
            peaks: self.peaks.clone(),
        })
    }

    async fn get_node(&self, _tree_root: Digest, node_hash: Digest) -> ProverResult<NodeResponse> {
        match self.nodes.get(&node_hash) {
            Some(children) => Ok(NodeResponse {
                is_leaf: false,
                children: Some(children.clone()),
            }),
            None => Ok(NodeResponse {
                is_leaf: true,
                children: None,
            }),
        }
    }

    async fn get_sync_updates(&self, start_period: Period, max_count: u32) -> ProverResult<Vec<SyncUpdate>> {
        let start = start_period.0 as usize;
        if start >= self.updates.len() {
            return Ok(vec![]);
        }
        let end = (start + max_count as usize).min(self.updates.len());
        Ok(self.updates[start..end].to_vec())
    }
}

/// Build a chain of `count` distinct committees, period 0..count.
pub fn chain(count: u8) -> Vec<Committee> {
    (0..count).map(committee).collect()
}
