//! Periodic refresh of open proposals
//!
//! Both passes stop at the first failing proposal. Rows written earlier in
//! the pass stay written.

use super::GovModule;
use crate::error::{ResultExt, SyncError};
use crate::proposal::{ProposalStakingPoolSnapshot, TallyResult};
use chrono::{DateTime, Utc};
use tracing::{debug, error};

impl GovModule {
    /// Proposals still open at the last indexed block.
    ///
    /// Enumeration errors are logged and yield an empty list.
    async fn open_proposals(&self, block_time: DateTime<Utc>) -> Vec<u64> {
        match self.store.open_proposal_ids(block_time).await {
            Ok(ids) => ids,
            Err(e) => {
                error!(module = "gov", error = %e, "error while getting open proposal ids");
                Vec::new()
            }
        }
    }

    pub async fn update_all_active_proposals_tally_results(&self) -> Result<(), SyncError> {
        let block_time = self
            .store
            .last_block_timestamp()
            .await
            .context("error while getting last block time")?;
        let ids = self.open_proposals(block_time).await;
        let height = self
            .store
            .last_block_height()
            .await
            .context("error while getting latest block height")?;

        debug!(module = "gov", height, proposals = ids.len(), "refreshing tally results");

        for id in ids {
            self.update_proposal_tally_result(height, id)
                .await
                .map_err(|e| SyncError::Refresh {
                    what: "tally result",
                    proposal_id: id,
                    source: Box::new(e),
                })?;
        }
        Ok(())
    }

    pub async fn update_proposal_tally_result(&self, height: i64, id: u64) -> Result<(), SyncError> {
        let counts = self
            .chain
            .tally_result(height, id)
            .await
            .context("error while getting tally result")?;

        self.store
            .save_tally_results(&[TallyResult::new(id, counts, height)])
            .await
            .context("error while saving tally result")
    }

    pub async fn update_proposals_staking_pool_snapshot(&self) -> Result<(), SyncError> {
        let block_time = self
            .store
            .last_block_timestamp()
            .await
            .context("error while getting last block time")?;
        let ids = self.open_proposals(block_time).await;
        let height = self
            .store
            .last_block_height()
            .await
            .context("error while getting latest block height")?;

        debug!(module = "gov", height, proposals = ids.len(), "refreshing staking pool snapshots");

        for id in ids {
            self.update_proposal_staking_pool_snapshot(height, id)
                .await
                .map_err(|e| SyncError::Refresh {
                    what: "staking pool snapshot",
                    proposal_id: id,
                    source: Box::new(e),
                })?;
        }
        Ok(())
    }

    pub async fn update_proposal_staking_pool_snapshot(
        &self,
        height: i64,
        id: u64,
    ) -> Result<(), SyncError> {
        let pool = self
            .chain
            .staking_pool(height)
            .await
            .context("error while getting staking pool")?;

        self.store
            .save_proposal_staking_pool_snapshot(&ProposalStakingPoolSnapshot::new(id, pool))
            .await
            .context("error while saving staking pool snapshot")
    }

    /// Re-read one proposal at the chain tip: status, side effects, tally.
    pub async fn refresh_proposal(&self, id: u64) -> Result<(), SyncError> {
        let height = self
            .chain
            .latest_height()
            .await
            .context("error while getting chain height")?;

        self.update_proposal_status(height, Utc::now(), id).await?;
        self.update_proposal_tally_result(height, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gov::ParamsRegistry;
    use crate::proposal::{ProposalStatus, StoredProposal};
    use crate::store::memory::MemoryStore;
    use crate::testing::{chain_proposal, tally, text_content, time, FakeChain};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    async fn store_with_open(ids: &[u64]) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.set_last_block(200, time("2024-03-10T00:00:00Z")).await;
        for &id in ids {
            store
                .insert_proposal(StoredProposal {
                    proposal_id: id,
                    status: ProposalStatus::VotingPeriod,
                    deposit_end_time: None,
                    voting_start_time: None,
                    voting_end_time: Some(time("2024-03-15T12:00:00Z")),
                })
                .await;
        }
        store
    }

    #[tokio::test]
    async fn test_tally_pass_stops_at_first_failure() {
        let chain = FakeChain::new();
        chain.with_tally(3, tally("30"));
        chain.with_tally(9, tally("90"));
        chain.fail_tally(7);
        let store = store_with_open(&[3, 7, 9]).await;
        let gov = GovModule::new(chain.clone(), store.clone(), ParamsRegistry::new());

        let err = gov.update_all_active_proposals_tally_results().await.unwrap_err();

        match err {
            SyncError::Refresh { proposal_id, what, .. } => {
                assert_eq!(proposal_id, 7);
                assert_eq!(what, "tally result");
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(chain.calls(), vec!["tally:3@200", "tally:7@200"]);

        let tallies = store.tallies().await;
        assert_eq!(tallies.len(), 1);
        assert_eq!(tallies[0].proposal_id, 3);
        assert_eq!(tallies[0].yes, "30");
        assert_eq!(tallies[0].height, 200);
    }

    #[tokio::test]
    async fn test_snapshot_pass_stops_at_first_failure() {
        let chain = FakeChain::new();
        let store = store_with_open(&[3, 7, 9]).await;
        store.fail_snapshot(7).await;
        let gov = GovModule::new(chain.clone(), store.clone(), ParamsRegistry::new());

        let err = assert_err!(gov.update_proposals_staking_pool_snapshot().await);

        match err {
            SyncError::Refresh { proposal_id, what, .. } => {
                assert_eq!(proposal_id, 7);
                assert_eq!(what, "staking pool snapshot");
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(chain.calls(), vec!["pool@200", "pool@200"]);

        let ids: Vec<_> = store.snapshots().await.iter().map(|s| s.proposal_id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[tokio::test]
    async fn test_enumeration_failure_is_not_fatal() {
        let chain = FakeChain::new();
        let store = store_with_open(&[1, 2]).await;
        store.fail_open_proposal_ids(true);
        let gov = GovModule::new(chain.clone(), store.clone(), ParamsRegistry::new());

        assert_ok!(gov.update_all_active_proposals_tally_results().await);
        assert_ok!(gov.update_proposals_staking_pool_snapshot().await);

        assert!(chain.calls().is_empty());
        assert!(store.tallies().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_last_block_fails() {
        let gov = GovModule::new(FakeChain::new(), Arc::new(MemoryStore::new()), ParamsRegistry::new());
        let err = assert_err!(gov.update_all_active_proposals_tally_results().await);
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_snapshot_pass_covers_open_proposals() {
        let chain = FakeChain::new();
        let store = store_with_open(&[4, 5]).await;
        let gov = GovModule::new(chain.clone(), store.clone(), ParamsRegistry::new());

        assert_ok!(gov.update_proposals_staking_pool_snapshot().await);
        // repeated pass at the same height adds nothing
        assert_ok!(gov.update_proposals_staking_pool_snapshot().await);

        let snapshots = store.snapshots().await;
        let ids: Vec<_> = snapshots.iter().map(|s| s.proposal_id).collect();
        assert_eq!(ids, vec![4, 5]);
        assert!(snapshots.iter().all(|s| s.pool.height == 200));
        assert_eq!(snapshots[0].pool.bonded_tokens, "1000");
    }

    #[tokio::test]
    async fn test_refresh_proposal_uses_chain_tip() {
        let chain = FakeChain::new();
        chain.with_latest_height(310);
        chain.with_proposal(chain_proposal(6, ProposalStatus::VotingPeriod, text_content()));
        chain.with_tally(6, tally("66"));
        let store = Arc::new(MemoryStore::new());
        let gov = GovModule::new(chain.clone(), store.clone(), ParamsRegistry::new());

        gov.refresh_proposal(6).await.unwrap();

        assert_eq!(chain.calls(), vec!["proposal:6@310", "tally:6@310"]);
        assert_eq!(store.tallies().await[0].yes, "66");
    }
}
