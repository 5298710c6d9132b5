//! Block ingestion route handlers

use crate::error::ApiResult;
use crate::gov::Block;
use crate::models::{BlockAck, SuccessResponse};
use crate::state::SharedState;
use axum::{extract::State, Json};
use tracing::debug;

/// Run the governance side of a committed block.
///
/// Governance failures are logged by the engine and never fail the request.
pub async fn handle_block(
    State(state): State<SharedState>,
    Json(block): Json<Block>,
) -> ApiResult<Json<SuccessResponse<BlockAck>>> {
    debug!(
        height = block.height,
        events = block.end_block_events.len(),
        validators = block.validators.len(),
        "Handling block"
    );

    state.gov.handle_block(&block).await?;

    Ok(Json(SuccessResponse::with_data(
        "Block processed",
        BlockAck {
            height: block.height,
        },
    )))
}
