//! SQL query constants
//!
//! Contains all SQL used by the Postgres store.

pub const LAST_BLOCK_HEIGHT: &str = r#"
    SELECT height FROM block ORDER BY height DESC LIMIT 1
"#;

pub const LAST_BLOCK_TIMESTAMP: &str = r#"
    SELECT timestamp FROM block ORDER BY height DESC LIMIT 1
"#;

/// Deposit/voting period proposals, plus deleted ones whose periods have
/// not ended yet (they may have been marked deleted by a transient failure)
pub const OPEN_PROPOSAL_IDS: &str = r#"
    SELECT id
    FROM proposal
    WHERE status = $1
        OR status = $2
        OR (status = $3 AND (voting_end_time > $4 OR deposit_end_time > $4))
    ORDER BY id
"#;

pub const GET_PROPOSAL: &str = r#"
    SELECT id, status, deposit_end_time, voting_start_time, voting_end_time
    FROM proposal
    WHERE id = $1
"#;

pub const UPSERT_PROPOSAL_STATUS: &str = r#"
    INSERT INTO proposal (id, status, voting_start_time, voting_end_time)
    VALUES ($1, $2, $3, $4)
    ON CONFLICT (id) DO UPDATE
        SET status = excluded.status,
            voting_start_time = excluded.voting_start_time,
            voting_end_time = excluded.voting_end_time
"#;

pub const INSERT_DEPOSIT: &str = r#"
    INSERT INTO proposal_deposit (proposal_id, depositor_address, amount, timestamp, height)
    VALUES ($1, $2, $3, $4, $5)
"#;

pub const INSERT_TALLY_RESULT: &str = r#"
    INSERT INTO proposal_tally_result (proposal_id, yes, abstain, no, no_with_veto, height)
    VALUES ($1, $2, $3, $4, $5, $6)
    ON CONFLICT (proposal_id, height) DO NOTHING
"#;

pub const INSERT_STAKING_POOL_SNAPSHOT: &str = r#"
    INSERT INTO proposal_staking_pool_snapshot (proposal_id, bonded_tokens, not_bonded_tokens, height)
    VALUES ($1, $2, $3, $4)
    ON CONFLICT (proposal_id, height) DO NOTHING
"#;

pub const UPSERT_SOFTWARE_UPGRADE_PLAN: &str = r#"
    INSERT INTO software_upgrade_plan (proposal_id, plan_name, upgrade_height, info, height)
    VALUES ($1, $2, $3, $4, $5)
    ON CONFLICT (proposal_id) DO UPDATE
        SET plan_name = excluded.plan_name,
            upgrade_height = excluded.upgrade_height,
            info = excluded.info,
            height = excluded.height
    WHERE software_upgrade_plan.height <= excluded.height
"#;

pub const DELETE_SOFTWARE_UPGRADE_PLAN: &str = r#"
    DELETE FROM software_upgrade_plan WHERE proposal_id = $1
"#;

pub const UPSERT_MODULE_PARAMS: &str = r#"
    INSERT INTO module_params (subspace, params, height)
    VALUES ($1, $2, $3)
    ON CONFLICT (subspace) DO UPDATE
        SET params = excluded.params,
            height = excluded.height
    WHERE module_params.height <= excluded.height
"#;

pub const UPSERT_INFLATION: &str = r#"
    INSERT INTO inflation (value, height)
    VALUES ($1, $2)
    ON CONFLICT (one_row_id) DO UPDATE
        SET value = excluded.value,
            height = excluded.height
    WHERE inflation.height <= excluded.height
"#;
