//! Proposal status reconciliation

use super::GovModule;
use crate::error::{ResultExt, SyncError};
use crate::proposal::ProposalUpdate;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

impl GovModule {
    /// Bring the stored status of proposal `id` in line with the chain at
    /// `height`, then fire its passed-proposal side effects.
    pub async fn update_proposal_status(
        &self,
        height: i64,
        block_time: DateTime<Utc>,
        id: u64,
    ) -> Result<(), SyncError> {
        let proposal = match self.chain.proposal(height, id).await {
            Ok(proposal) => proposal,
            Err(e) if e.is_not_found() => return self.handle_missing_proposal(block_time, id, e).await,
            Err(e) => return Err(e).context("error while getting proposal"),
        };

        debug!(
            module = "gov",
            proposal_id = id,
            height,
            status = %proposal.status,
            "updating proposal status"
        );

        self.store
            .update_proposal(&ProposalUpdate::from_chain(&proposal))
            .await
            .context("error while updating proposal status")?;

        self.handle_passed_proposal(&proposal, height)
            .await
            .with_context(|| format!("error while handling passed proposal {}", id))
    }

    /// A proposal missing from chain state was pruned if its voting window
    /// already closed; otherwise the not-found error is handed back as is.
    async fn handle_missing_proposal(
        &self,
        block_time: DateTime<Utc>,
        id: u64,
        not_found: SyncError,
    ) -> Result<(), SyncError> {
        let stored = match self.store.proposal(id).await {
            Ok(stored) => stored,
            Err(e) if e.is_not_found() => return Err(not_found),
            Err(e) => return Err(e).context("error while getting stored proposal"),
        };

        if !stored.voting_end_time.is_some_and(|end| block_time > end) {
            return Err(not_found);
        }

        info!(module = "gov", proposal_id = id, "proposal no longer on chain, marking deleted");

        self.store
            .update_proposal(&ProposalUpdate::deleted(&stored))
            .await
            .context("error while marking proposal deleted")
    }
}
