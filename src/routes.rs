//! Route definitions and router setup
//!
//! Configures all API routes and middleware.

mod blocks;
mod proposals;
mod refresh;

use crate::state::SharedState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::Level;

/// Create the application router with all routes and middleware
pub fn create_router(state: SharedState) -> Router {
    // Build tracing/logging layer
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Build middleware stack
    let middleware = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .propagate_x_request_id();

    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Block ingestion
        .route("/api/blocks", post(blocks::handle_block))

        // Single proposal operations
        .route("/api/proposals/{id}/refresh", post(proposals::refresh_proposal))
        .route("/api/proposals/{id}/deposits", post(proposals::save_deposits))

        // Batch refresh passes
        .route("/api/refresh/tally", post(refresh::refresh_tally_results))
        .route("/api/refresh/snapshots", post(refresh::refresh_staking_pool_snapshots))

        // Apply middleware and state
        .layer(middleware)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "success": true,
        "message": "Server is running fine.",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
