//! Proposal data models
//!
//! Chain-side snapshots and the rows the indexer keeps for them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Proposal status as reported by the gov module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalStatus {
    #[serde(rename = "PROPOSAL_STATUS_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "PROPOSAL_STATUS_DEPOSIT_PERIOD")]
    DepositPeriod,
    #[serde(rename = "PROPOSAL_STATUS_VOTING_PERIOD")]
    VotingPeriod,
    #[serde(rename = "PROPOSAL_STATUS_PASSED")]
    Passed,
    #[serde(rename = "PROPOSAL_STATUS_REJECTED")]
    Rejected,
    #[serde(rename = "PROPOSAL_STATUS_FAILED")]
    Failed,
    /// Removed from chain state before it ever passed
    #[serde(rename = "PROPOSAL_STATUS_INVALID")]
    Invalid,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Unspecified => "PROPOSAL_STATUS_UNSPECIFIED",
            ProposalStatus::DepositPeriod => "PROPOSAL_STATUS_DEPOSIT_PERIOD",
            ProposalStatus::VotingPeriod => "PROPOSAL_STATUS_VOTING_PERIOD",
            ProposalStatus::Passed => "PROPOSAL_STATUS_PASSED",
            ProposalStatus::Rejected => "PROPOSAL_STATUS_REJECTED",
            ProposalStatus::Failed => "PROPOSAL_STATUS_FAILED",
            ProposalStatus::Invalid => "PROPOSAL_STATUS_INVALID",
        }
    }

    /// Status written for proposals that vanished from chain state
    pub const fn deleted() -> Self {
        ProposalStatus::Invalid
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProposalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s {
            "PROPOSAL_STATUS_UNSPECIFIED" => ProposalStatus::Unspecified,
            "PROPOSAL_STATUS_DEPOSIT_PERIOD" => ProposalStatus::DepositPeriod,
            "PROPOSAL_STATUS_VOTING_PERIOD" => ProposalStatus::VotingPeriod,
            "PROPOSAL_STATUS_PASSED" => ProposalStatus::Passed,
            "PROPOSAL_STATUS_REJECTED" => ProposalStatus::Rejected,
            "PROPOSAL_STATUS_FAILED" => ProposalStatus::Failed,
            "PROPOSAL_STATUS_INVALID" => ProposalStatus::Invalid,
            other => return Err(format!("unknown proposal status {}", other)),
        };
        Ok(status)
    }
}

/// A proposal as the chain reports it at some height
#[derive(Debug, Clone, PartialEq)]
pub struct ChainProposal {
    pub proposal_id: u64,
    pub status: ProposalStatus,
    /// Still-encoded content; decoded only when the proposal passed
    pub content: serde_json::Value,
    pub voting_start_time: DateTime<Utc>,
    pub voting_end_time: DateTime<Utc>,
}

/// The proposal row kept by the indexer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProposal {
    pub proposal_id: u64,
    pub status: ProposalStatus,
    pub deposit_end_time: Option<DateTime<Utc>>,
    pub voting_start_time: Option<DateTime<Utc>>,
    pub voting_end_time: Option<DateTime<Utc>>,
}

/// Status overwrite applied to a stored proposal
#[derive(Debug, Clone, PartialEq)]
pub struct ProposalUpdate {
    pub proposal_id: u64,
    pub status: ProposalStatus,
    pub voting_start_time: Option<DateTime<Utc>>,
    pub voting_end_time: Option<DateTime<Utc>>,
}

impl ProposalUpdate {
    pub fn from_chain(proposal: &ChainProposal) -> Self {
        Self {
            proposal_id: proposal.proposal_id,
            status: proposal.status,
            voting_start_time: Some(proposal.voting_start_time),
            voting_end_time: Some(proposal.voting_end_time),
        }
    }

    /// Mark a stored proposal deleted, keeping its voting window
    pub fn deleted(stored: &StoredProposal) -> Self {
        Self {
            proposal_id: stored.proposal_id,
            status: ProposalStatus::deleted(),
            voting_start_time: stored.voting_start_time,
            voting_end_time: stored.voting_end_time,
        }
    }
}

/// Vote weights of a proposal, as decimal strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyCounts {
    pub yes: String,
    pub abstain: String,
    pub no: String,
    pub no_with_veto: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyResult {
    pub proposal_id: u64,
    pub yes: String,
    pub abstain: String,
    pub no: String,
    pub no_with_veto: String,
    pub height: i64,
}

impl TallyResult {
    pub fn new(proposal_id: u64, counts: TallyCounts, height: i64) -> Self {
        Self {
            proposal_id,
            yes: counts.yes,
            abstain: counts.abstain,
            no: counts.no,
            no_with_veto: counts.no_with_veto,
            height,
        }
    }
}

/// Staking pool totals at a height
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingPool {
    pub bonded_tokens: String,
    pub not_bonded_tokens: String,
    pub height: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalStakingPoolSnapshot {
    pub proposal_id: u64,
    pub pool: StakingPool,
}

impl ProposalStakingPoolSnapshot {
    pub fn new(proposal_id: u64, pool: StakingPool) -> Self {
        Self { proposal_id, pool }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    pub proposal_id: u64,
    pub depositor: String,
    pub amount: Vec<Coin>,
    pub timestamp: DateTime<Utc>,
    pub height: i64,
}

/// Upgrade directive carried by a software-upgrade proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradePlan {
    pub name: String,
    pub height: i64,
    pub info: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamChange {
    pub subspace: String,
    pub key: String,
    pub value: String,
}
