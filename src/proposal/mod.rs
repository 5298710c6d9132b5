//! Proposal module
//!
//! Governance records mirrored from the chain and the typed content
//! carried by proposals.

mod content;
mod models;

pub use content::*;
pub use models::*;
