//! Mint module: params plus the inflation derived from them

use super::{ChainParamsModule, InflationModule, ParamsModule, Subspace};
use crate::chain::ChainSource;
use crate::error::{ResultExt, SyncError};
use crate::store::GovStore;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub struct MintModule {
    params: ChainParamsModule,
    chain: Arc<dyn ChainSource>,
    store: Arc<dyn GovStore>,
}

impl MintModule {
    pub fn new(chain: Arc<dyn ChainSource>, store: Arc<dyn GovStore>) -> Self {
        Self {
            params: ChainParamsModule::new(Subspace::Mint, chain.clone(), store.clone()),
            chain,
            store,
        }
    }
}

#[async_trait]
impl ParamsModule for MintModule {
    async fn update_params(&self, height: i64) -> Result<(), SyncError> {
        self.params.update_params(height).await
    }
}

#[async_trait]
impl InflationModule for MintModule {
    /// Recompute inflation at the last indexed height
    async fn update_inflation(&self) -> Result<(), SyncError> {
        let height = self
            .store
            .last_block_height()
            .await
            .context("error while getting latest block height")?;

        debug!(module = "mint", height, "updating inflation");

        let inflation = self
            .chain
            .inflation(height)
            .await
            .context("error while getting inflation")?;

        self.store
            .save_inflation(&inflation, height)
            .await
            .context("error while saving inflation")
    }
}
