//! Wires one honest and one dishonest in-memory prover and runs `sync()`
//! end to end, printing the committee the verifier ends up trusting.
//!
//! Run with `cargo run --example basic_sync`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use superlight_client::digest::{hash_concat, Digest};
use superlight_client::mmr::{bag_peaks, expected_peak_sizes, EMPTY_ROOT};
use superlight_client::{
    Committee, Config, InMemoryStore, LeafQuery, LeafWithProof, MmrInfo, NodeResponse, Peak,
    Period, Prover, ProverError, ProverResult, PublicKey, SuperlightClient, SyncUpdate,
};

const N: u8 = 2;

fn committee(seed: u8) -> Committee {
    Committee::new(vec![PublicKey([seed; superlight_client::types::PUBLIC_KEY_SIZE])])
}

fn signature_for(prev: &Committee, cur: &Committee) -> Vec<u8> {
    hash_concat(&[prev.hash(), cur.hash()]).as_bytes().to_vec()
}

fn verify_update(prev: &Committee, cur: &Committee, update: &SyncUpdate) -> bool {
    update.next_committee == *cur && update.signature == signature_for(prev, cur)
}

/// A minimal binary-tree in-memory prover, honest or otherwise depending
/// on what `committees` it was built from.
struct DemoProver {
    root: Digest,
    peaks: Vec<Peak>,
    nodes: HashMap<Digest, Vec<Digest>>,
    committees: Vec<Committee>,
    updates: Vec<SyncUpdate>,
    proofs: Vec<Vec<Vec<Digest>>>,
}

impl DemoProver {
    /// Build a prover whose updates are honestly derived from its own
    /// `committees` chain.
    fn new(committees: Vec<Committee>) -> Self {
        let updates = (0..committees.len().saturating_sub(1))
            .map(|p| SyncUpdate {
                next_committee: committees[p + 1].clone(),
                signed_header: vec![],
                signature: signature_for(&committees[p], &committees[p + 1]),
            })
            .collect();
        Self::with_updates(committees, updates)
    }

    /// Build a prover with explicit updates, letting a caller forge a
    /// specific transition's signature rather than having it derived
    /// (honestly) from its own chain.
    fn with_updates(committees: Vec<Committee>, updates: Vec<SyncUpdate>) -> Self {
        let leaves: Vec<Digest> = committees.iter().map(|c| c.hash()).collect();
        let sizes = expected_peak_sizes(N as u64, leaves.len() as u64);

        let mut nodes = HashMap::new();
        let mut peaks = Vec::new();
        let mut proofs = vec![Vec::new(); leaves.len()];
        let mut offset = 0usize;

        for size in sizes {
            let size = size as usize;
            let chunk = &leaves[offset..offset + size];
            let mut level = chunk.to_vec();
            let mut local_proofs: Vec<Vec<Digest>> = vec![Vec::new(); size];
            let mut local_index: Vec<usize> = (0..size).collect();

            while level.len() > 1 {
                let mut next = Vec::with_capacity(level.len() / 2);
                for pair in level.chunks(2) {
                    let parent = hash_concat(&[pair[0], pair[1]]);
                    nodes.insert(parent, pair.to_vec());
                    next.push(parent);
                }
                for leaf_idx in 0..size {
                    let pos = local_index[leaf_idx];
                    let sibling = level[pos ^ 1];
                    local_proofs[leaf_idx].push(sibling);
                    local_index[leaf_idx] = pos / 2;
                }
                level = next;
            }

            peaks.push(Peak {
                root_hash: level[0],
                size: size as u64,
            });
            for (i, proof) in local_proofs.into_iter().enumerate() {
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
            updates,
            proofs,
        }
    }
}

#[async_trait]
impl Prover for DemoProver {
    async fn get_leaf_with_proof(&self, period: LeafQuery) -> ProverResult<LeafWithProof> {
        let index = match period {
            LeafQuery::Latest => self.committees.len().saturating_sub(1),
            LeafQuery::Period(p) => p.0 as usize,
        };
        self.committees
            .get(index)
            .map(|c| LeafWithProof {
                sync_committee: c.clone(),
                proof: self.proofs[index].clone(),
            })
            .ok_or_else(|| ProverError::Transport("period out of range".into()))
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

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let genesis = committee(0);

    let mut honest_committees = vec![genesis.clone()];
    for seed in 1..4u8 {
        honest_committees.push(committee(seed));
    }

    // A dishonest prover that forges period 2's committee outright. It
    // cannot produce a genuine aggregate signature for a transition its
    // claimed previous committee never signed, so its period 1 -> 2
    // update carries a garbage signature rather than a derived one.
    let mut dishonest_committees = honest_committees.clone();
    dishonest_committees[2] = committee(200);
    let mut dishonest_updates: Vec<_> = (0..dishonest_committees.len().saturating_sub(1))
        .map(|p| SyncUpdate {
            next_committee: dishonest_committees[p + 1].clone(),
            signed_header: vec![],
            signature: signature_for(&dishonest_committees[p], &dishonest_committees[p + 1]),
        })
        .collect();
    dishonest_updates[1] = SyncUpdate {
        next_committee: dishonest_committees[2].clone(),
        signed_header: vec![],
        signature: vec![0xFFu8; 32],
    };

    let honest: Arc<dyn Prover> = Arc::new(DemoProver::new(honest_committees.clone()));
    let dishonest: Arc<dyn Prover> =
        Arc::new(DemoProver::with_updates(dishonest_committees, dishonest_updates));

    let store = Arc::new(InMemoryStore::new(
        genesis,
        Period(0),
        Period(3),
        verify_update,
    ));

    let client = SuperlightClient::new(Config::new(vec![honest, dishonest], store).with_fanout(N));

    let result = client.sync().await?;
    println!("provers left standing: {}", result.len());
    for record in &result {
        println!(
            "prover #{} trusted at committee {:?}",
            record.index, record.sync_committee
        );
    }

    Ok(())
}
