//! Store adapter
//!
//! Persistence of the governance mirror. Every write touches a single
//! proposal (or a single module row), so implementations only need per-row
//! atomicity; the engine never spans a transaction across proposals.

#[cfg(test)]
pub mod memory;
mod postgres;
mod queries;
pub mod schema;

pub use postgres::PostgresStore;

use crate::error::SyncError;
use crate::modules::Subspace;
use crate::proposal::{
    Deposit, ProposalStakingPoolSnapshot, ProposalUpdate, StoredProposal, TallyResult, UpgradePlan,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait GovStore: Send + Sync {
    async fn last_block_height(&self) -> Result<i64, SyncError>;

    async fn last_block_timestamp(&self) -> Result<DateTime<Utc>, SyncError>;

    /// Proposals still open as of `block_time`, ascending by id
    async fn open_proposal_ids(&self, block_time: DateTime<Utc>) -> Result<Vec<u64>, SyncError>;

    /// Fails with `SyncError::NotFound` when no row exists
    async fn proposal(&self, id: u64) -> Result<StoredProposal, SyncError>;

    /// Overwrite status and voting window of an existing proposal
    async fn update_proposal(&self, update: &ProposalUpdate) -> Result<(), SyncError>;

    async fn save_deposits(&self, deposits: &[Deposit]) -> Result<(), SyncError>;

    /// Append tally rows; a row already written for the same height is kept
    async fn save_tally_results(&self, tallies: &[TallyResult]) -> Result<(), SyncError>;

    async fn save_proposal_staking_pool_snapshot(
        &self,
        snapshot: &ProposalStakingPoolSnapshot,
    ) -> Result<(), SyncError>;

    async fn save_software_upgrade_plan(
        &self,
        proposal_id: u64,
        plan: &UpgradePlan,
        height: i64,
    ) -> Result<(), SyncError>;

    /// Deleting a plan that does not exist is not an error
    async fn delete_software_upgrade_plan(&self, proposal_id: u64) -> Result<(), SyncError>;

    async fn save_module_params(
        &self,
        subspace: Subspace,
        params: &serde_json::Value,
        height: i64,
    ) -> Result<(), SyncError>;

    async fn save_inflation(&self, inflation: &str, height: i64) -> Result<(), SyncError>;
}
