//! Cross-module param propagation

use crate::error::SyncError;
use crate::modules::{InflationModule, ParamsModule, Subspace};
use crate::proposal::ParamChange;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Subspace -> module table handed to the engine at construction
#[derive(Clone, Default)]
pub struct ParamsRegistry {
    modules: HashMap<Subspace, Arc<dyn ParamsModule>>,
    inflation: Option<Arc<dyn InflationModule>>,
}

impl ParamsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, subspace: Subspace, module: Arc<dyn ParamsModule>) -> Self {
        self.modules.insert(subspace, module);
        self
    }

    /// Module recomputing inflation after mint params change
    pub fn with_inflation(mut self, module: Arc<dyn InflationModule>) -> Self {
        self.inflation = Some(module);
        self
    }

    /// Refresh the params of every subspace touched by `changes`.
    ///
    /// Subspaces run once each, in first-appearance order. The first
    /// failure stops the remaining ones; finished refreshes stay applied.
    pub async fn propagate(&self, height: i64, changes: &[ParamChange]) -> Result<(), SyncError> {
        for subspace in affected_subspaces(changes) {
            let Some(module) = self.modules.get(&subspace) else {
                warn!(module = "gov", %subspace, "no params module registered, skipping");
                continue;
            };

            module
                .update_params(height)
                .await
                .map_err(|e| SyncError::propagation(subspace.name(), e))?;

            // inflation is derived from mint params
            if subspace == Subspace::Mint {
                if let Some(inflation) = &self.inflation {
                    inflation
                        .update_inflation()
                        .await
                        .map_err(|e| SyncError::propagation(subspace.name(), e))?;
                }
            }
        }

        Ok(())
    }
}

fn affected_subspaces(changes: &[ParamChange]) -> Vec<Subspace> {
    let mut subspaces = Vec::new();
    for change in changes {
        match Subspace::from_name(&change.subspace) {
            Some(subspace) if !subspaces.contains(&subspace) => subspaces.push(subspace),
            Some(_) => {}
            None => debug!(module = "gov", subspace = %change.subspace, "ignoring unknown subspace"),
        }
    }
    subspaces
}
