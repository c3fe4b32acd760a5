pub mod bisection;
pub mod client;
pub mod config;
pub mod digest;
pub mod error;
pub mod merkle;
pub mod mmr;
pub mod prover;
pub mod store;
pub mod tournament;
pub mod types;

pub use client::SuperlightClient;
pub use config::Config;
pub use digest::Digest;
pub use error::{Result, SuperlightError};
pub use prover::{LeafWithProof, MmrInfo, NodeResponse, Prover, ProverError, ProverResult};
pub use store::{InMemoryStore, SyncStore};
pub use types::{Committee, LeafQuery, Peak, Period, ProverRecord, PublicKey, SyncUpdate};
