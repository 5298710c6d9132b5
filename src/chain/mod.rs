//! Chain source adapter
//!
//! Read-only view of governance, staking and mint state on a node,
//! pinned to a block height.

mod lcd;

pub use lcd::LcdClient;

use crate::error::SyncError;
use crate::modules::Subspace;
use crate::proposal::{ChainProposal, StakingPool, TallyCounts};
use async_trait::async_trait;

#[async_trait]
pub trait ChainSource: Send + Sync {
    /// Fails with `SyncError::NotFound` once the proposal is gone from state
    async fn proposal(&self, height: i64, id: u64) -> Result<ChainProposal, SyncError>;

    async fn tally_result(&self, height: i64, id: u64) -> Result<TallyCounts, SyncError>;

    async fn staking_pool(&self, height: i64) -> Result<StakingPool, SyncError>;

    /// Raw params JSON of one module
    async fn module_params(
        &self,
        subspace: Subspace,
        height: i64,
    ) -> Result<serde_json::Value, SyncError>;

    /// Current annual inflation as a decimal string
    async fn inflation(&self, height: i64) -> Result<String, SyncError>;

    async fn latest_height(&self) -> Result<i64, SyncError>;
}
