//! Application state management
//!
//! Contains shared state accessible across all handlers.

use crate::gov::GovModule;
use crate::store::GovStore;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// Governance engine driven by block ingestion and refresh requests
    pub gov: Arc<GovModule>,

    /// Store backing the engine, used directly for deposit ingestion
    pub store: Arc<dyn GovStore>,
}

impl AppState {
    pub fn new(gov: Arc<GovModule>, store: Arc<dyn GovStore>) -> Self {
        Self { gov, store }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
