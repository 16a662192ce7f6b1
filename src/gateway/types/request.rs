//! Request DTOs for the ledger API
//!
//! - `CreateAccountRequest`: POST /accounts
//! - `ListAccountsQuery`: GET /accounts
//! - `TransferRequest`: POST /transfers

use serde::Deserialize;
use uuid::Uuid;

use crate::ledger::{ListParams, TransferTxParams};

use super::money::StrictDecimal;

/// Smallest and largest accepted `page_size`
pub const PAGE_SIZE_MIN: i64 = 5;
pub const PAGE_SIZE_MAX: i64 = 10;

/// Custom deserializer for non-empty strings
fn deserialize_non_empty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.trim().is_empty() {
        return Err(serde::de::Error::custom("string cannot be empty"));
    }
    Ok(s)
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccountRequest {
    #[serde(deserialize_with = "deserialize_non_empty_string")]
    pub owner: String,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ListAccountsQuery {
    pub page_num: i64,
    pub page_size: i64,
}

impl ListAccountsQuery {
    /// `page_num >= 1`, `page_size` within [PAGE_SIZE_MIN, PAGE_SIZE_MAX]
    pub fn validate(self) -> Result<ListParams, String> {
        if self.page_num < 1 {
            return Err(format!("page_num must be >= 1, got {}", self.page_num));
        }
        if !(PAGE_SIZE_MIN..=PAGE_SIZE_MAX).contains(&self.page_size) {
            return Err(format!(
                "page_size must be between {} and {}, got {}",
                PAGE_SIZE_MIN, PAGE_SIZE_MAX, self.page_size
            ));
        }
        ListParams::page(self.page_num, self.page_size)
            .ok_or_else(|| format!("page_num out of range: {}", self.page_num))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferRequest {
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    /// Format validated by StrictDecimal; sign checked by the ledger
    pub amount: StrictDecimal,
    pub currency: String,
}

impl TransferRequest {
    pub fn params(&self) -> TransferTxParams {
        TransferTxParams::new(self.from_account_id, self.to_account_id, self.amount.inner())
    }
}
