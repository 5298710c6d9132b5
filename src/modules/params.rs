//! Generic params mirror for one subspace

use super::{ParamsModule, Subspace};
use crate::chain::ChainSource;
use crate::error::{ResultExt, SyncError};
use crate::store::GovStore;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub struct ChainParamsModule {
    subspace: Subspace,
    chain: Arc<dyn ChainSource>,
    store: Arc<dyn GovStore>,
}

impl ChainParamsModule {
    pub fn new(subspace: Subspace, chain: Arc<dyn ChainSource>, store: Arc<dyn GovStore>) -> Self {
        Self {
            subspace,
            chain,
            store,
        }
    }
}

#[async_trait]
impl ParamsModule for ChainParamsModule {
    async fn update_params(&self, height: i64) -> Result<(), SyncError> {
        debug!(module = %self.subspace, height, "updating params");

        let params = self
            .chain
            .module_params(self.subspace, height)
            .await
            .with_context(|| format!("error while getting {} params", self.subspace))?;

        self.store
            .save_module_params(self.subspace, &params, height)
            .await
            .with_context(|| format!("error while saving {} params", self.subspace))
    }
}
