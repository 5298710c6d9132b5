//! On-demand batch refresh handlers

use crate::error::ApiResult;
use crate::models::MessageResponse;
use crate::scheduler::RefreshJob;
use crate::state::SharedState;
use axum::{extract::State, Json};
use tracing::info;

async fn run(state: &SharedState, job: RefreshJob) -> ApiResult<Json<MessageResponse>> {
    job.run(&state.gov).await?;

    info!(job = job.name(), "Refresh pass complete");
    Ok(Json(MessageResponse::new(format!("Refreshed {}", job.name()))))
}

/// Recompute tallies of every open proposal now
pub async fn refresh_tally_results(
    State(state): State<SharedState>,
) -> ApiResult<Json<MessageResponse>> {
    run(&state, RefreshJob::TallyResults).await
}

/// Snapshot the staking pool for every open proposal now
pub async fn refresh_staking_pool_snapshots(
    State(state): State<SharedState>,
) -> ApiResult<Json<MessageResponse>> {
    run(&state, RefreshJob::StakingPoolSnapshots).await
}
