//! Error handling module
//!
//! `SyncError` is what the governance engine and its adapters return.
//! `AppError` is what the admin API hands back to HTTP callers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Governance synchronization error
#[derive(Error, Debug)]
pub enum SyncError {
    /// The requested entity does not exist in current chain (or store) state
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed block event data
    #[error("parse error: {0}")]
    Parse(String),

    /// Proposal content with an unknown or malformed encoding
    #[error("content decode error: {0}")]
    ContentDecode(String),

    /// A peer module failed to refresh its params
    #[error("error while updating {subspace} params: {source}")]
    Propagation {
        subspace: String,
        #[source]
        source: Box<SyncError>,
    },

    /// A batch refresh pass stopped at this proposal
    #[error("error while updating proposal {proposal_id} {what}: {source}")]
    Refresh {
        what: &'static str,
        proposal_id: u64,
        #[source]
        source: Box<SyncError>,
    },

    #[error("chain error: {0}")]
    Chain(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<SyncError>,
    },
}

impl SyncError {
    /// True when the error, or the error it wraps, is a not-found condition
    pub fn is_not_found(&self) -> bool {
        match self {
            SyncError::NotFound(_) => true,
            SyncError::Context { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    pub fn propagation(subspace: impl Into<String>, source: SyncError) -> Self {
        SyncError::Propagation {
            subspace: subspace.into(),
            source: Box::new(source),
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        SyncError::Chain(e.to_string())
    }
}

/// Attach operation context to a `SyncError` result
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T, SyncError>;

    fn with_context<F, S>(self, f: F) -> Result<T, SyncError>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> ResultExt<T> for Result<T, SyncError> {
    fn context(self, context: impl Into<String>) -> Result<T, SyncError> {
        self.map_err(|source| SyncError::Context {
            context: context.into(),
            source: Box::new(source),
        })
    }

    fn with_context<F, S>(self, f: F) -> Result<T, SyncError>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|source| SyncError::Context {
            context: f().into(),
            source: Box::new(source),
        })
    }
}

/// Application-wide error type for the admin API
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SyncError> for AppError {
    fn from(e: SyncError) -> Self {
        match e {
            e if e.is_not_found() => AppError::NotFound(e.to_string()),
            SyncError::Parse(_) | SyncError::ContentDecode(_) => AppError::BadRequest(e.to_string()),
            e => AppError::Internal(e.to_string()),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match &self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
                None,
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                msg.clone(),
                None,
            ),
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    Some(msg.clone()),
                )
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
            error: details,
            code: Some(error_code.to_string()),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

/// Helper function to create a validation error
pub fn validation_error(msg: impl Into<String>) -> AppError {
    AppError::Validation(msg.into())
}
