//! Side effects of passed proposals

use super::GovModule;
use crate::error::{ResultExt, SyncError};
use crate::proposal::{ChainProposal, ProposalContent, ProposalStatus};
use tracing::{debug, info};

impl GovModule {
    /// Apply the chain-level consequences of a passed proposal.
    ///
    /// Proposals in any other status are left alone.
    pub async fn handle_passed_proposal(
        &self,
        proposal: &ChainProposal,
        height: i64,
    ) -> Result<(), SyncError> {
        if proposal.status != ProposalStatus::Passed {
            return Ok(());
        }

        let content = ProposalContent::decode(&proposal.content)?;
        let id = proposal.proposal_id;

        match content {
            ProposalContent::ParameterChange { changes } => {
                info!(module = "gov", proposal_id = id, height, "propagating param changes");
                self.params.propagate(height, &changes).await
            }
            ProposalContent::SoftwareUpgrade { plan } => {
                info!(
                    module = "gov",
                    proposal_id = id,
                    plan = %plan.name,
                    upgrade_height = plan.height,
                    "storing software upgrade plan"
                );
                self.store
                    .save_software_upgrade_plan(id, &plan, height)
                    .await
                    .context("error while saving software upgrade plan")
            }
            ProposalContent::CancelSoftwareUpgrade => {
                info!(module = "gov", proposal_id = id, "deleting software upgrade plan");
                self.store
                    .delete_software_upgrade_plan(id)
                    .await
                    .context("error while deleting software upgrade plan")
            }
            ProposalContent::Other { type_url } => {
                debug!(module = "gov", proposal_id = id, %type_url, "no side effects");
                Ok(())
            }
        }
    }
}
