//! Data models and DTOs (Data Transfer Objects)
//!
//! Request/response structures of the admin API. Engine types live in
//! `proposal` and `gov`.

pub mod deposit;

// Re-export commonly used types
pub use deposit::*;

use serde::Serialize;

/// Generic success response
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub data: Option<T>,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

/// Message-only response (no data)
#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Acknowledgement of a processed block
#[derive(Debug, Serialize)]
pub struct BlockAck {
    pub height: i64,
}

/// Acknowledgement of a single-proposal operation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalAck {
    pub proposal_id: u64,
}
