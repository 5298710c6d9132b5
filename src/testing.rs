//! Scripted collaborators shared by the engine tests

use crate::chain::ChainSource;
use crate::error::SyncError;
use crate::modules::{InflationModule, ParamsModule, Subspace};
use crate::proposal::{ChainProposal, ProposalStatus, StakingPool, TallyCounts};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub fn time(rfc3339: &str) -> DateTime<Utc> {
    rfc3339.parse().unwrap()
}

pub fn chain_proposal(id: u64, status: ProposalStatus, content: Value) -> ChainProposal {
    ChainProposal {
        proposal_id: id,
        status,
        content,
        voting_start_time: time("2024-03-01T12:00:00Z"),
        voting_end_time: time("2024-03-15T12:00:00Z"),
    }
}

pub fn text_content() -> Value {
    json!({ "@type": "/cosmos.gov.v1beta1.TextProposal", "title": "t", "description": "d" })
}

pub fn tally(yes: &str) -> TallyCounts {
    TallyCounts {
        yes: yes.to_string(),
        abstain: "0".to_string(),
        no: "0".to_string(),
        no_with_veto: "0".to_string(),
    }
}

/// Chain source answering from fixed tables and recording every query
#[derive(Default)]
pub struct FakeChain {
    proposals: Mutex<HashMap<u64, ChainProposal>>,
    failing_proposals: Mutex<HashSet<u64>>,
    tallies: Mutex<HashMap<u64, TallyCounts>>,
    failing_tallies: Mutex<HashSet<u64>>,
    params: Mutex<HashMap<Subspace, Value>>,
    inflation: Mutex<Option<String>>,
    latest_height: Mutex<i64>,
    calls: Mutex<Vec<String>>,
}

impl FakeChain {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_proposal(&self, proposal: ChainProposal) {
        self.proposals
            .lock()
            .unwrap()
            .insert(proposal.proposal_id, proposal);
    }

    /// Queries for this proposal fail with a non-not-found error
    pub fn fail_proposal(&self, id: u64) {
        self.failing_proposals.lock().unwrap().insert(id);
    }

    pub fn with_tally(&self, id: u64, counts: TallyCounts) {
        self.tallies.lock().unwrap().insert(id, counts);
    }

    pub fn fail_tally(&self, id: u64) {
        self.failing_tallies.lock().unwrap().insert(id);
    }

    pub fn with_params(&self, subspace: Subspace, params: Value) {
        self.params.lock().unwrap().insert(subspace, params);
    }

    pub fn with_inflation(&self, inflation: &str) {
        *self.inflation.lock().unwrap() = Some(inflation.to_string());
    }

    pub fn with_latest_height(&self, height: i64) {
        *self.latest_height.lock().unwrap() = height;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChainSource for FakeChain {
    async fn proposal(&self, height: i64, id: u64) -> Result<ChainProposal, SyncError> {
        self.record(format!("proposal:{}@{}", id, height));
        if self.failing_proposals.lock().unwrap().contains(&id) {
            return Err(SyncError::Chain("connection refused".to_string()));
        }
        self.proposals
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| SyncError::NotFound(format!("proposal {} doesn't exist", id)))
    }

    async fn tally_result(&self, height: i64, id: u64) -> Result<TallyCounts, SyncError> {
        self.record(format!("tally:{}@{}", id, height));
        if self.failing_tallies.lock().unwrap().contains(&id) {
            return Err(SyncError::Chain("deadline exceeded".to_string()));
        }
        Ok(self
            .tallies
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_else(|| tally("0")))
    }

    async fn staking_pool(&self, height: i64) -> Result<StakingPool, SyncError> {
        self.record(format!("pool@{}", height));
        Ok(StakingPool {
            bonded_tokens: "1000".to_string(),
            not_bonded_tokens: "50".to_string(),
            height,
        })
    }

    async fn module_params(&self, subspace: Subspace, height: i64) -> Result<Value, SyncError> {
        self.record(format!("params:{}@{}", subspace, height));
        self.params
            .lock()
            .unwrap()
            .get(&subspace)
            .cloned()
            .ok_or_else(|| SyncError::Chain(format!("{} params unavailable", subspace)))
    }

    async fn inflation(&self, height: i64) -> Result<String, SyncError> {
        self.record(format!("inflation@{}", height));
        self.inflation
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| SyncError::Chain("inflation unavailable".to_string()))
    }

    async fn latest_height(&self) -> Result<i64, SyncError> {
        Ok(*self.latest_height.lock().unwrap())
    }
}

/// Params module that only writes to a shared journal
pub struct RecordingModule {
    name: &'static str,
    journal: Arc<Mutex<Vec<String>>>,
    fail_params: bool,
    fail_inflation: bool,
}

impl RecordingModule {
    pub fn new(name: &'static str, journal: Arc<Mutex<Vec<String>>>) -> Arc<Self> {
        Arc::new(Self {
            name,
            journal,
            fail_params: false,
            fail_inflation: false,
        })
    }

    pub fn failing(name: &'static str, journal: Arc<Mutex<Vec<String>>>) -> Arc<Self> {
        Arc::new(Self {
            name,
            journal,
            fail_params: true,
            fail_inflation: false,
        })
    }

    /// Params refresh succeeds, inflation recomputation fails
    pub fn failing_inflation(name: &'static str, journal: Arc<Mutex<Vec<String>>>) -> Arc<Self> {
        Arc::new(Self {
            name,
            journal,
            fail_params: false,
            fail_inflation: true,
        })
    }
}

#[async_trait]
impl ParamsModule for RecordingModule {
    async fn update_params(&self, height: i64) -> Result<(), SyncError> {
        self.journal
            .lock()
            .unwrap()
            .push(format!("{}.params@{}", self.name, height));
        if self.fail_params {
            return Err(SyncError::Chain(format!("{} params unavailable", self.name)));
        }
        Ok(())
    }
}

#[async_trait]
impl InflationModule for RecordingModule {
    async fn update_inflation(&self) -> Result<(), SyncError> {
        self.journal
            .lock()
            .unwrap()
            .push(format!("{}.inflation", self.name));
        if self.fail_inflation {
            return Err(SyncError::Chain("inflation unavailable".to_string()));
        }
        Ok(())
    }
}

pub fn active_proposal_event(id: &str) -> crate::gov::BlockEvent {
    crate::gov::BlockEvent {
        kind: "active_proposal".to_string(),
        attributes: vec![crate::gov::EventAttribute {
            key: "proposal_id".to_string(),
            value: id.to_string(),
        }],
    }
}
