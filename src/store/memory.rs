//! In-memory governance store used by the engine tests

use super::GovStore;
use crate::error::SyncError;
use crate::modules::Subspace;
use crate::proposal::{
    Deposit, ProposalStakingPoolSnapshot, ProposalStatus, ProposalUpdate, StoredProposal,
    TallyResult, UpgradePlan,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    last_block: Option<(i64, DateTime<Utc>)>,
    proposals: BTreeMap<u64, StoredProposal>,
    deposits: Vec<Deposit>,
    tallies: Vec<TallyResult>,
    snapshots: Vec<ProposalStakingPoolSnapshot>,
    upgrade_plans: HashMap<u64, (UpgradePlan, i64)>,
    module_params: HashMap<Subspace, (serde_json::Value, i64)>,
    inflation: Option<(String, i64)>,
    failing_snapshots: HashSet<u64>,
}

/// Thread-safe in-memory store
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    fail_open_proposal_ids: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_last_block(&self, height: i64, timestamp: DateTime<Utc>) {
        self.tables.write().await.last_block = Some((height, timestamp));
    }

    pub async fn insert_proposal(&self, proposal: StoredProposal) {
        self.tables
            .write()
            .await
            .proposals
            .insert(proposal.proposal_id, proposal);
    }

    /// Make snapshot writes for `proposal_id` fail
    pub async fn fail_snapshot(&self, proposal_id: u64) {
        self.tables.write().await.failing_snapshots.insert(proposal_id);
    }

    pub fn fail_open_proposal_ids(&self, fail: bool) {
        self.fail_open_proposal_ids.store(fail, Ordering::SeqCst);
    }

    pub async fn stored_proposal(&self, id: u64) -> Option<StoredProposal> {
        self.tables.read().await.proposals.get(&id).cloned()
    }

    pub async fn tallies(&self) -> Vec<TallyResult> {
        self.tables.read().await.tallies.clone()
    }

    pub async fn snapshots(&self) -> Vec<ProposalStakingPoolSnapshot> {
        self.tables.read().await.snapshots.clone()
    }

    pub async fn deposits(&self) -> Vec<Deposit> {
        self.tables.read().await.deposits.clone()
    }

    pub async fn upgrade_plan(&self, proposal_id: u64) -> Option<(UpgradePlan, i64)> {
        self.tables.read().await.upgrade_plans.get(&proposal_id).cloned()
    }

    pub async fn module_params(&self, subspace: Subspace) -> Option<(serde_json::Value, i64)> {
        self.tables.read().await.module_params.get(&subspace).cloned()
    }

    pub async fn inflation(&self) -> Option<(String, i64)> {
        self.tables.read().await.inflation.clone()
    }
}

#[async_trait]
impl GovStore for MemoryStore {
    async fn last_block_height(&self) -> Result<i64, SyncError> {
        self.tables
            .read()
            .await
            .last_block
            .map(|(height, _)| height)
            .ok_or_else(|| SyncError::NotFound("no block stored yet".to_string()))
    }

    async fn last_block_timestamp(&self) -> Result<DateTime<Utc>, SyncError> {
        self.tables
            .read()
            .await
            .last_block
            .map(|(_, timestamp)| timestamp)
            .ok_or_else(|| SyncError::NotFound("no block stored yet".to_string()))
    }

    async fn open_proposal_ids(&self, block_time: DateTime<Utc>) -> Result<Vec<u64>, SyncError> {
        if self.fail_open_proposal_ids.load(Ordering::SeqCst) {
            return Err(SyncError::Store("connection reset".to_string()));
        }

        let after = |t: Option<DateTime<Utc>>| t.is_some_and(|t| t > block_time);
        let tables = self.tables.read().await;
        Ok(tables
            .proposals
            .values()
            .filter(|p| match p.status {
                ProposalStatus::DepositPeriod | ProposalStatus::VotingPeriod => true,
                ProposalStatus::Invalid => after(p.voting_end_time) || after(p.deposit_end_time),
                _ => false,
            })
            .map(|p| p.proposal_id)
            .collect())
    }

    async fn proposal(&self, id: u64) -> Result<StoredProposal, SyncError> {
        self.stored_proposal(id)
            .await
            .ok_or_else(|| SyncError::NotFound(format!("proposal {} not stored", id)))
    }

    async fn update_proposal(&self, update: &ProposalUpdate) -> Result<(), SyncError> {
        let mut tables = self.tables.write().await;
        let proposal = tables
            .proposals
            .entry(update.proposal_id)
            .or_insert_with(|| StoredProposal {
                proposal_id: update.proposal_id,
                status: update.status,
                deposit_end_time: None,
                voting_start_time: None,
                voting_end_time: None,
            });
        proposal.status = update.status;
        proposal.voting_start_time = update.voting_start_time;
        proposal.voting_end_time = update.voting_end_time;
        Ok(())
    }

    async fn save_deposits(&self, deposits: &[Deposit]) -> Result<(), SyncError> {
        self.tables.write().await.deposits.extend_from_slice(deposits);
        Ok(())
    }

    async fn save_tally_results(&self, tallies: &[TallyResult]) -> Result<(), SyncError> {
        let mut tables = self.tables.write().await;
        for tally in tallies {
            let exists = tables
                .tallies
                .iter()
                .any(|t| t.proposal_id == tally.proposal_id && t.height == tally.height);
            if !exists {
                tables.tallies.push(tally.clone());
            }
        }
        Ok(())
    }

    async fn save_proposal_staking_pool_snapshot(
        &self,
        snapshot: &ProposalStakingPoolSnapshot,
    ) -> Result<(), SyncError> {
        let mut tables = self.tables.write().await;
        if tables.failing_snapshots.contains(&snapshot.proposal_id) {
            return Err(SyncError::Store("deadlock detected".to_string()));
        }
        let exists = tables.snapshots.iter().any(|s| {
            s.proposal_id == snapshot.proposal_id && s.pool.height == snapshot.pool.height
        });
        if !exists {
            tables.snapshots.push(snapshot.clone());
        }
        Ok(())
    }

    async fn save_software_upgrade_plan(
        &self,
        proposal_id: u64,
        plan: &UpgradePlan,
        height: i64,
    ) -> Result<(), SyncError> {
        let mut tables = self.tables.write().await;
        let newer = tables
            .upgrade_plans
            .get(&proposal_id)
            .map_or(true, |(_, stored)| *stored <= height);
        if newer {
            tables
                .upgrade_plans
                .insert(proposal_id, (plan.clone(), height));
        }
        Ok(())
    }

    async fn delete_software_upgrade_plan(&self, proposal_id: u64) -> Result<(), SyncError> {
        self.tables.write().await.upgrade_plans.remove(&proposal_id);
        Ok(())
    }

    async fn save_module_params(
        &self,
        subspace: Subspace,
        params: &serde_json::Value,
        height: i64,
    ) -> Result<(), SyncError> {
        let mut tables = self.tables.write().await;
        let newer = tables
            .module_params
            .get(&subspace)
            .map_or(true, |(_, stored)| *stored <= height);
        if newer {
            tables
                .module_params
                .insert(subspace, (params.clone(), height));
        }
        Ok(())
    }

    async fn save_inflation(&self, inflation: &str, height: i64) -> Result<(), SyncError> {
        let mut tables = self.tables.write().await;
        if tables.inflation.as_ref().map_or(true, |(_, stored)| *stored <= height) {
            tables.inflation = Some((inflation.to_string(), height));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal(id: u64, status: ProposalStatus, voting_end: Option<&str>) -> StoredProposal {
        StoredProposal {
            proposal_id: id,
            status,
            deposit_end_time: None,
            voting_start_time: None,
            voting_end_time: voting_end.map(|t| t.parse().unwrap()),
        }
    }

    #[tokio::test]
    async fn test_open_proposal_ids() {
        let store = MemoryStore::new();
        store.insert_proposal(proposal(1, ProposalStatus::Passed, None)).await;
        store.insert_proposal(proposal(2, ProposalStatus::VotingPeriod, None)).await;
        store.insert_proposal(proposal(3, ProposalStatus::DepositPeriod, None)).await;
        store
            .insert_proposal(proposal(4, ProposalStatus::Invalid, Some("2024-06-01T00:00:00Z")))
            .await;
        store
            .insert_proposal(proposal(5, ProposalStatus::Invalid, Some("2024-01-01T00:00:00Z")))
            .await;

        let ids = store
            .open_proposal_ids("2024-03-01T00:00:00Z".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[tokio::test]
    async fn test_tally_rows_are_append_only() {
        let store = MemoryStore::new();
        let tally = |yes: &str, height| TallyResult {
            proposal_id: 1,
            yes: yes.to_string(),
            abstain: "0".to_string(),
            no: "0".to_string(),
            no_with_veto: "0".to_string(),
            height,
        };

        store.save_tally_results(&[tally("10", 5)]).await.unwrap();
        store.save_tally_results(&[tally("99", 5)]).await.unwrap();
        store.save_tally_results(&[tally("20", 6)]).await.unwrap();

        let yes: Vec<_> = store.tallies().await.into_iter().map(|t| t.yes).collect();
        assert_eq!(yes, vec!["10", "20"]);
    }
}
