//! The superlight client, orchestrates prover audit, tournament,
//! and final committee adoption.

use crate::config::Config;
use crate::error::{Result, SuperlightError};
use crate::mmr;
use crate::tournament::{get_verified_sync_committee, run_tournament};
use crate::types::{LeafQuery, ProverRecord};

/// Owns one `Config` and runs `sync()` to completion. Holds no mutable
/// state between calls, each `sync()` invocation builds its own
/// survivor/winner lists from scratch.
pub struct SuperlightClient {
    config: Config,
}

impl SuperlightClient {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Obtain the latest trusted committee. Fails only if every validly
    /// shaped prover turns out dishonest.
    pub async fn sync(&self) -> Result<Vec<ProverRecord>> {
        let survivors = self.audit_provers().await;
        if survivors.is_empty() {
            return Err(SuperlightError::AllProversDishonest);
        }

        let winners = run_tournament(
            survivors,
            &self.config.provers,
            self.config.store.as_ref(),
            self.config.n,
        )
        .await?;

        self.adopt_latest_committee(winners).await
    }

    /// Query every prover for its MMR shape and keep only those whose
    /// claimed root bags correctly for the expected leaf count.
    /// Independent queries, so they run concurrently.
    async fn audit_provers(&self) -> Vec<ProverRecord> {
        let mmr_size = self.config.store.mmr_size();
        let n = self.config.n;

        let audits = self.config.provers.iter().enumerate().map(|(index, prover)| {
            let prover = prover.as_ref();
            async move {
                let info = prover.get_mmr_info().await.ok()?;
                if mmr::verify(n, info.root_hash, &info.peaks, mmr_size) {
                    Some(ProverRecord {
                        index,
                        root: info.root_hash,
                        peaks: info.peaks,
                        sync_committee: None,
                    })
                } else {
                    None
                }
            }
        });

        futures::future::join_all(audits).await.into_iter().flatten().collect()
    }

    /// Try each tournament winner's latest leaf in order;
    /// return the first that verifies.
    async fn adopt_latest_committee(&self, winners: Vec<ProverRecord>) -> Result<Vec<ProverRecord>> {
        let n = self.config.n;
        for mut record in winners {
            let prover = self.config.provers[record.index].as_ref();
            if let Some(committee) =
                get_verified_sync_committee(prover, LeafQuery::Latest, &record.peaks, n).await
            {
                record.sync_committee = Some(committee);
                return Ok(vec![record]);
            }
        }
        Err(SuperlightError::AllProversDishonest)
    }
}
