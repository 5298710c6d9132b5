//! Single proposal route handlers

use crate::error::{validation_error, ApiResult};
use crate::models::{DepositRequest, ProposalAck, SuccessResponse};
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;
use validator::Validate;

/// Reconcile a proposal at the chain tip and refresh its tally
pub async fn refresh_proposal(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> ApiResult<Json<SuccessResponse<ProposalAck>>> {
    state.gov.refresh_proposal(id).await?;

    info!(proposal_id = id, "Proposal refreshed");
    Ok(Json(SuccessResponse::with_data(
        "Proposal refreshed",
        ProposalAck { proposal_id: id },
    )))
}

/// Record a deposit the block pipeline did not capture
pub async fn save_deposits(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    Json(payload): Json<DepositRequest>,
) -> ApiResult<Json<SuccessResponse<ProposalAck>>> {
    // Validate input
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let deposit = payload.into_deposit(id);
    state.store.save_deposits(&[deposit]).await?;

    info!(proposal_id = id, "Deposit saved");
    Ok(Json(SuccessResponse::with_data(
        "Deposit saved",
        ProposalAck { proposal_id: id },
    )))
}
