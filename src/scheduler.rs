//! Periodic refresh jobs
//!
//! Each job runs on its own tokio task and ticks independently of block
//! ingestion. Jobs stop when the shutdown channel flips to `true`.

use crate::config::RefreshConfig;
use crate::error::SyncError;
use crate::gov::GovModule;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshJob {
    TallyResults,
    StakingPoolSnapshots,
}

impl RefreshJob {
    pub fn name(&self) -> &'static str {
        match self {
            RefreshJob::TallyResults => "tally results",
            RefreshJob::StakingPoolSnapshots => "staking pool snapshots",
        }
    }

    pub async fn run(&self, gov: &GovModule) -> Result<(), SyncError> {
        match self {
            RefreshJob::TallyResults => gov.update_all_active_proposals_tally_results().await,
            RefreshJob::StakingPoolSnapshots => gov.update_proposals_staking_pool_snapshot().await,
        }
    }
}

/// Spawn one task per enabled job
pub fn spawn_refresh_jobs(
    gov: Arc<GovModule>,
    config: &RefreshConfig,
    shutdown: watch::Receiver<bool>,
) -> Vec<JoinHandle<()>> {
    [
        (RefreshJob::TallyResults, config.tally_interval),
        (RefreshJob::StakingPoolSnapshots, config.snapshot_interval),
    ]
    .into_iter()
    .filter_map(|(job, period)| match period {
        Some(period) => Some(tokio::spawn(run_job(
            job,
            period,
            gov.clone(),
            shutdown.clone(),
        ))),
        None => {
            info!(job = job.name(), "refresh job disabled");
            None
        }
    })
    .collect()
}

async fn run_job(
    job: RefreshJob,
    period: Duration,
    gov: Arc<GovModule>,
    mut shutdown: watch::Receiver<bool>,
) {
    info!(job = job.name(), period_secs = period.as_secs(), "starting refresh job");

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                debug!(job = job.name(), "running refresh job");
                if let Err(e) = job.run(&gov).await {
                    error!(job = job.name(), error = %e, "refresh job failed");
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!(job = job.name(), "stopping refresh job");
                    break;
                }
            }
        }
    }
}
