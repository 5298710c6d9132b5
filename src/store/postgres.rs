//! PostgreSQL-backed governance store

use super::queries;
use super::GovStore;
use crate::error::SyncError;
use crate::modules::Subspace;
use crate::proposal::{
    Deposit, ProposalStakingPoolSnapshot, ProposalStatus, ProposalUpdate, StoredProposal,
    TallyResult, UpgradePlan,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;
use tracing::debug;

pub struct PostgresStore {
    pool: Pool,
}

impl PostgresStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

/// Proposal ids are u64 on chain and BIGINT in the database
fn db_id(id: u64) -> Result<i64, SyncError> {
    i64::try_from(id).map_err(|_| SyncError::Store(format!("proposal id {} exceeds BIGINT", id)))
}

fn chain_id(id: i64) -> Result<u64, SyncError> {
    u64::try_from(id).map_err(|_| SyncError::Store(format!("negative proposal id {} in store", id)))
}

#[async_trait]
impl GovStore for PostgresStore {
    async fn last_block_height(&self) -> Result<i64, SyncError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(queries::LAST_BLOCK_HEIGHT, &[])
            .await?
            .ok_or_else(|| SyncError::NotFound("no block stored yet".to_string()))?;
        Ok(row.get(0))
    }

    async fn last_block_timestamp(&self) -> Result<DateTime<Utc>, SyncError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(queries::LAST_BLOCK_TIMESTAMP, &[])
            .await?
            .ok_or_else(|| SyncError::NotFound("no block stored yet".to_string()))?;
        Ok(row.get(0))
    }

    async fn open_proposal_ids(&self, block_time: DateTime<Utc>) -> Result<Vec<u64>, SyncError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                queries::OPEN_PROPOSAL_IDS,
                &[
                    &ProposalStatus::DepositPeriod.as_str(),
                    &ProposalStatus::VotingPeriod.as_str(),
                    &ProposalStatus::deleted().as_str(),
                    &block_time,
                ],
            )
            .await?;

        rows.iter().map(|row| chain_id(row.get(0))).collect()
    }

    async fn proposal(&self, id: u64) -> Result<StoredProposal, SyncError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(queries::GET_PROPOSAL, &[&db_id(id)?])
            .await?
            .ok_or_else(|| SyncError::NotFound(format!("proposal {} not stored", id)))?;

        let status: String = row.get(1);
        Ok(StoredProposal {
            proposal_id: chain_id(row.get(0))?,
            status: status.parse().map_err(SyncError::Store)?,
            deposit_end_time: row.get(2),
            voting_start_time: row.get(3),
            voting_end_time: row.get(4),
        })
    }

    async fn update_proposal(&self, update: &ProposalUpdate) -> Result<(), SyncError> {
        let client = self.pool.get().await?;
        client
            .execute(
                queries::UPSERT_PROPOSAL_STATUS,
                &[
                    &db_id(update.proposal_id)?,
                    &update.status.as_str(),
                    &update.voting_start_time,
                    &update.voting_end_time,
                ],
            )
            .await?;

        debug!(proposal_id = update.proposal_id, status = %update.status, "proposal status stored");
        Ok(())
    }

    async fn save_deposits(&self, deposits: &[Deposit]) -> Result<(), SyncError> {
        if deposits.is_empty() {
            return Ok(());
        }

        let mut client = self.pool.get().await?;
        let transaction = client.transaction().await?;
        for deposit in deposits {
            let amount = serde_json::to_value(&deposit.amount)
                .map_err(|e| SyncError::Store(format!("cannot encode deposit amount: {}", e)))?;
            transaction
                .execute(
                    queries::INSERT_DEPOSIT,
                    &[
                        &db_id(deposit.proposal_id)?,
                        &deposit.depositor,
                        &amount,
                        &deposit.timestamp,
                        &deposit.height,
                    ],
                )
                .await?;
        }
        transaction.commit().await?;
        Ok(())
    }

    async fn save_tally_results(&self, tallies: &[TallyResult]) -> Result<(), SyncError> {
        let client = self.pool.get().await?;
        for tally in tallies {
            client
                .execute(
                    queries::INSERT_TALLY_RESULT,
                    &[
                        &db_id(tally.proposal_id)?,
                        &tally.yes,
                        &tally.abstain,
                        &tally.no,
                        &tally.no_with_veto,
                        &tally.height,
                    ],
                )
                .await?;
        }
        Ok(())
    }

    async fn save_proposal_staking_pool_snapshot(
        &self,
        snapshot: &ProposalStakingPoolSnapshot,
    ) -> Result<(), SyncError> {
        let client = self.pool.get().await?;
        client
            .execute(
                queries::INSERT_STAKING_POOL_SNAPSHOT,
                &[
                    &db_id(snapshot.proposal_id)?,
                    &snapshot.pool.bonded_tokens,
                    &snapshot.pool.not_bonded_tokens,
                    &snapshot.pool.height,
                ],
            )
            .await?;
        Ok(())
    }

    async fn save_software_upgrade_plan(
        &self,
        proposal_id: u64,
        plan: &UpgradePlan,
        height: i64,
    ) -> Result<(), SyncError> {
        let client = self.pool.get().await?;
        client
            .execute(
                queries::UPSERT_SOFTWARE_UPGRADE_PLAN,
                &[&db_id(proposal_id)?, &plan.name, &plan.height, &plan.info, &height],
            )
            .await?;
        Ok(())
    }

    async fn delete_software_upgrade_plan(&self, proposal_id: u64) -> Result<(), SyncError> {
        let client = self.pool.get().await?;
        client
            .execute(queries::DELETE_SOFTWARE_UPGRADE_PLAN, &[&db_id(proposal_id)?])
            .await?;
        Ok(())
    }

    async fn save_module_params(
        &self,
        subspace: Subspace,
        params: &serde_json::Value,
        height: i64,
    ) -> Result<(), SyncError> {
        let client = self.pool.get().await?;
        client
            .execute(queries::UPSERT_MODULE_PARAMS, &[&subspace.name(), params, &height])
            .await?;
        Ok(())
    }

    async fn save_inflation(&self, inflation: &str, height: i64) -> Result<(), SyncError> {
        let client = self.pool.get().await?;
        client
            .execute(queries::UPSERT_INFLATION, &[&inflation, &height])
            .await?;
        Ok(())
    }
}
