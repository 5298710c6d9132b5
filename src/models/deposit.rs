//! Manual deposit ingestion DTOs

use crate::proposal::{Coin, Deposit};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CoinRequest {
    #[validate(length(min = 1, max = 128, message = "Denom is required"))]
    pub denom: String,

    #[validate(custom(function = "validate_amount"))]
    pub amount: String,
}

/// Request to record deposits that the block pipeline missed
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    #[validate(length(min = 1, message = "Depositor address is required"))]
    pub depositor: String,

    #[validate(length(min = 1, message = "At least one coin is required"))]
    #[validate(nested)]
    pub amount: Vec<CoinRequest>,

    pub timestamp: DateTime<Utc>,

    #[validate(range(min = 0, message = "Height must not be negative"))]
    pub height: i64,
}

impl DepositRequest {
    pub fn into_deposit(self, proposal_id: u64) -> Deposit {
        Deposit {
            proposal_id,
            depositor: self.depositor,
            amount: self
                .amount
                .into_iter()
                .map(|c| Coin {
                    denom: c.denom,
                    amount: c.amount,
                })
                .collect(),
            timestamp: self.timestamp,
            height: self.height,
        }
    }
}

/// Coin amounts are unsigned decimal integers
fn validate_amount(amount: &str) -> Result<(), validator::ValidationError> {
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        let mut err = validator::ValidationError::new("invalid_amount");
        err.message = Some("Amount must be a non-negative integer".into());
        return Err(err);
    }
    Ok(())
}
