//! End-block event extraction

use crate::error::SyncError;
use serde::{Deserialize, Serialize};

pub const EVENT_TYPE_ACTIVE_PROPOSAL: &str = "active_proposal";
pub const ATTRIBUTE_KEY_PROPOSAL_ID: &str = "proposal_id";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Vec<EventAttribute>,
}

impl BlockEvent {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }
}

/// Ids of proposals activated in this block, in event order.
///
/// One bad event fails the whole list; duplicates are kept.
pub fn active_proposal_ids(events: &[BlockEvent]) -> Result<Vec<u64>, SyncError> {
    events
        .iter()
        .filter(|e| e.kind == EVENT_TYPE_ACTIVE_PROPOSAL)
        .map(|event| {
            let raw = event.attribute(ATTRIBUTE_KEY_PROPOSAL_ID).ok_or_else(|| {
                SyncError::Parse(format!(
                    "{} event without {} attribute",
                    EVENT_TYPE_ACTIVE_PROPOSAL, ATTRIBUTE_KEY_PROPOSAL_ID
                ))
            })?;
            raw.parse::<u64>()
                .map_err(|e| SyncError::Parse(format!("invalid proposal id {:?}: {}", raw, e)))
        })
        .collect()
}
