//! Typed proposal content
//!
//! The chain hands content over as a JSON `Any` (`{"@type": ..., ...}`).
//! Kinds the indexer reacts to get their own variant; everything else is
//! kept as `Other` so callers can match exhaustively.

use crate::error::SyncError;
use crate::proposal::{ParamChange, UpgradePlan};
use serde::Deserialize;
use serde_json::Value;

pub const PARAMETER_CHANGE_TYPE_URL: &str = "/cosmos.params.v1beta1.ParameterChangeProposal";
pub const SOFTWARE_UPGRADE_TYPE_URL: &str = "/cosmos.upgrade.v1beta1.SoftwareUpgradeProposal";
pub const CANCEL_SOFTWARE_UPGRADE_TYPE_URL: &str =
    "/cosmos.upgrade.v1beta1.CancelSoftwareUpgradeProposal";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProposalContent {
    ParameterChange { changes: Vec<ParamChange> },
    SoftwareUpgrade { plan: UpgradePlan },
    CancelSoftwareUpgrade,
    Other { type_url: String },
}

#[derive(Deserialize)]
struct ParameterChangeBody {
    #[serde(default)]
    changes: Vec<ParamChange>,
}

#[derive(Deserialize)]
struct SoftwareUpgradeBody {
    plan: PlanBody,
}

#[derive(Deserialize)]
struct PlanBody {
    name: String,
    height: String,
    #[serde(default)]
    info: String,
}

impl ProposalContent {
    /// Decode a JSON `Any`
    pub fn decode(raw: &Value) -> Result<Self, SyncError> {
        let type_url = raw
            .get("@type")
            .and_then(Value::as_str)
            .ok_or_else(|| SyncError::ContentDecode("content has no @type".to_string()))?;

        let content = match type_url {
            PARAMETER_CHANGE_TYPE_URL => {
                let body: ParameterChangeBody = decode_body(type_url, raw)?;
                ProposalContent::ParameterChange { changes: body.changes }
            }
            SOFTWARE_UPGRADE_TYPE_URL => {
                let body: SoftwareUpgradeBody = decode_body(type_url, raw)?;
                let height = body.plan.height.parse::<i64>().map_err(|e| {
                    SyncError::ContentDecode(format!(
                        "invalid upgrade height {:?}: {}",
                        body.plan.height, e
                    ))
                })?;
                ProposalContent::SoftwareUpgrade {
                    plan: UpgradePlan {
                        name: body.plan.name,
                        height,
                        info: body.plan.info,
                    },
                }
            }
            CANCEL_SOFTWARE_UPGRADE_TYPE_URL => ProposalContent::CancelSoftwareUpgrade,
            other => ProposalContent::Other {
                type_url: other.to_string(),
            },
        };

        Ok(content)
    }
}

fn decode_body<T: serde::de::DeserializeOwned>(type_url: &str, raw: &Value) -> Result<T, SyncError> {
    T::deserialize(raw)
        .map_err(|e| SyncError::ContentDecode(format!("malformed {} content: {}", type_url, e)))
}
