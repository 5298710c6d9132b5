//! Governance synchronization engine
//!
//! Keeps the stored proposal mirror in line with the chain:
//!
//! 1. **Block path**: activated-proposal events of each block are
//!    reconciled against chain state, and passed proposals fire their
//!    side effects (param propagation, upgrade plan bookkeeping).
//! 2. **Refresh path**: a timer recomputes tallies and staking pool
//!    snapshots of every open proposal.
//!
//! The engine owns no tasks or locks. Both paths only issue per-proposal
//! writes, so they may run concurrently against the same store.

mod events;
mod handle_block;
mod params;
mod passed;
mod proposal;
mod refresh;

pub use events::{active_proposal_ids, BlockEvent, EventAttribute};
pub use handle_block::Block;
pub use params::ParamsRegistry;

use crate::chain::ChainSource;
use crate::store::GovStore;
use std::sync::Arc;

pub struct GovModule {
    chain: Arc<dyn ChainSource>,
    store: Arc<dyn GovStore>,
    params: ParamsRegistry,
}

impl GovModule {
    pub fn new(chain: Arc<dyn ChainSource>, store: Arc<dyn GovStore>, params: ParamsRegistry) -> Self {
        Self {
            chain,
            store,
            params,
        }
    }
}
