//! Peer subsystem modules
//!
//! Each module mirrors the params of one on-chain subspace. Mint also keeps
//! the inflation value derived from its params.

mod mint;
mod params;

pub use mint::MintModule;
pub use params::ChainParamsModule;

use crate::error::SyncError;
use async_trait::async_trait;
use std::fmt;

/// Registered name of a governed subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subspace {
    Distribution,
    Gov,
    Mint,
    Slashing,
    Staking,
}

impl Subspace {
    pub const ALL: [Subspace; 5] = [
        Subspace::Distribution,
        Subspace::Gov,
        Subspace::Mint,
        Subspace::Slashing,
        Subspace::Staking,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Subspace::Distribution => "distribution",
            Subspace::Gov => "gov",
            Subspace::Mint => "mint",
            Subspace::Slashing => "slashing",
            Subspace::Staking => "staking",
        }
    }

    /// `None` for subspaces the indexer does not model
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for Subspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[async_trait]
pub trait ParamsModule: Send + Sync {
    /// Refresh the stored params with the chain's values at `height`
    async fn update_params(&self, height: i64) -> Result<(), SyncError>;
}

#[async_trait]
pub trait InflationModule: Send + Sync {
    async fn update_inflation(&self) -> Result<(), SyncError>;
}
