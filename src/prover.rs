//! Prover interface, the only thing an untrusted remote prover must
//! implement. Transport, retries, and encoding live entirely behind
//! this trait; the core never speaks a wire protocol directly.

use crate::digest::Digest;
use crate::types::{Committee, LeafQuery, Peak, Period, SyncUpdate};
use async_trait::async_trait;
use thiserror::Error;

/// A transport-level failure talking to a prover: timeout, connection
/// refused, undecodable body, and so on. The client treats this
/// identically to a structurally malformed `Ok` response, the
/// offending prover loses the current game or is dropped at audit,
/// never escalated to a fatal `sync()` error.
#[derive(Debug, Error)]
pub enum ProverError {
    #[error("prover transport error: {0}")]
    Transport(String),
    #[error("prover timed out")]
    Timeout,
}

pub type ProverResult<T> = Result<T, ProverError>;

#[derive(Clone, Debug)]
pub struct LeafWithProof {
    pub sync_committee: Committee,
    pub proof: Vec<Vec<Digest>>,
}

#[derive(Clone, Debug)]
pub struct MmrInfo {
    pub root_hash: Digest,
    pub peaks: Vec<Peak>,
}

/// Response to `getNode`. When `is_leaf` is `false`, `children` MUST
/// have length `n` and `H(concat(children)) == nodeHash`; the bisection
/// game's structural check enforces this rather than trusting `is_leaf`.
#[derive(Clone, Debug)]
pub struct NodeResponse {
    pub is_leaf: bool,
    pub children: Option<Vec<Digest>>,
}

#[async_trait]
pub trait Prover: Send + Sync {
    async fn get_leaf_with_proof(&self, period: LeafQuery) -> ProverResult<LeafWithProof>;
    async fn get_mmr_info(&self) -> ProverResult<MmrInfo>;
    async fn get_node(&self, tree_root: Digest, node_hash: Digest) -> ProverResult<NodeResponse>;
    async fn get_sync_updates(
        &self,
        start_period: Period,
        max_count: u32,
    ) -> ProverResult<Vec<SyncUpdate>>;
}
