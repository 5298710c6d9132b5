//! Block-driven entry point

use super::{active_proposal_ids, BlockEvent, GovModule};
use crate::error::SyncError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

/// A committed block as handed over by the ingestion pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub height: i64,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub end_block_events: Vec<BlockEvent>,
    #[serde(default)]
    pub validators: Vec<Validator>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validator {
    pub address: String,
    pub voting_power: i64,
}

impl GovModule {
    /// Process the governance side of one block.
    ///
    /// Never fails: errors are logged so block ingestion keeps going.
    pub async fn handle_block(&self, block: &Block) -> Result<(), SyncError> {
        if let Err(e) = self
            .update_proposals_status(block.height, block.time, &block.end_block_events)
            .await
        {
            error!(
                module = "gov",
                height = block.height,
                error = %e,
                "error while updating proposals"
            );
        }
        Ok(())
    }

    /// Reconcile every proposal activated by `events`.
    ///
    /// A malformed event fails the whole block before any reconciliation;
    /// a failing proposal is logged and the rest still run.
    pub async fn update_proposals_status(
        &self,
        height: i64,
        block_time: DateTime<Utc>,
        events: &[BlockEvent],
    ) -> Result<(), SyncError> {
        let ids = active_proposal_ids(events)?;

        for id in ids {
            if let Err(e) = self.update_proposal_status(height, block_time, id).await {
                error!(
                    module = "gov",
                    height,
                    proposal_id = id,
                    error = %e,
                    "error while updating proposal status"
                );
            }
        }

        Ok(())
    }
}
