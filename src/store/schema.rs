//! Table definitions for the governance mirror

use deadpool_postgres::Pool;
use tracing::info;

/// Statements run at startup, in order. All of them are idempotent.
const CREATE_TABLES: &[&str] = &[
    // Owned by the block pipeline; declared here so a fresh database works
    "CREATE TABLE IF NOT EXISTS block (
        height BIGINT PRIMARY KEY,
        hash TEXT NOT NULL DEFAULT '',
        num_txs INTEGER DEFAULT 0,
        timestamp TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS proposal (
        id BIGINT PRIMARY KEY,
        title TEXT NOT NULL DEFAULT '',
        description TEXT NOT NULL DEFAULT '',
        content JSONB NOT NULL DEFAULT '{}'::JSONB,
        proposal_type TEXT NOT NULL DEFAULT '',
        submit_time TIMESTAMPTZ,
        deposit_end_time TIMESTAMPTZ,
        voting_start_time TIMESTAMPTZ,
        voting_end_time TIMESTAMPTZ,
        proposer_address TEXT NOT NULL DEFAULT '',
        status TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS proposal_status_index ON proposal (status)",
    "CREATE TABLE IF NOT EXISTS proposal_deposit (
        proposal_id BIGINT NOT NULL REFERENCES proposal (id),
        depositor_address TEXT NOT NULL,
        amount JSONB NOT NULL,
        timestamp TIMESTAMPTZ NOT NULL,
        height BIGINT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS proposal_deposit_proposal_id_index ON proposal_deposit (proposal_id)",
    "CREATE TABLE IF NOT EXISTS proposal_tally_result (
        proposal_id BIGINT NOT NULL REFERENCES proposal (id),
        yes TEXT NOT NULL,
        abstain TEXT NOT NULL,
        no TEXT NOT NULL,
        no_with_veto TEXT NOT NULL,
        height BIGINT NOT NULL,
        recorded_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        UNIQUE (proposal_id, height)
    )",
    "CREATE TABLE IF NOT EXISTS proposal_staking_pool_snapshot (
        proposal_id BIGINT NOT NULL REFERENCES proposal (id),
        bonded_tokens TEXT NOT NULL,
        not_bonded_tokens TEXT NOT NULL,
        height BIGINT NOT NULL,
        recorded_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        UNIQUE (proposal_id, height)
    )",
    "CREATE TABLE IF NOT EXISTS software_upgrade_plan (
        proposal_id BIGINT PRIMARY KEY REFERENCES proposal (id),
        plan_name TEXT NOT NULL,
        upgrade_height BIGINT NOT NULL,
        info TEXT NOT NULL,
        height BIGINT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS module_params (
        subspace TEXT PRIMARY KEY,
        params JSONB NOT NULL,
        height BIGINT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS inflation (
        one_row_id BOOLEAN PRIMARY KEY DEFAULT TRUE CHECK (one_row_id),
        value TEXT NOT NULL,
        height BIGINT NOT NULL
    )",
];

/// Create the governance tables if they don't exist
pub async fn create_tables(pool: &Pool) -> anyhow::Result<()> {
    let client = pool.get().await?;

    for statement in CREATE_TABLES {
        client.execute(*statement, &[]).await?;
    }

    info!("✅ Governance tables initialized");
    Ok(())
}
