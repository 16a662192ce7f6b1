//! Data models for ledger storage
//!
//! Row types map 1:1 onto the `accounts`, `entries` and `transfers` tables.
//! Param structs are the inputs of the [`Querier`](super::Querier) operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValidationError;

// ============================================================================
// Rows
// ============================================================================

/// Account holding a currency-denominated balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    pub owner: String,
    pub balance: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

/// One side of a balance movement (negative = debit, positive = credit)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Entry {
    pub id: Uuid,
    pub account_id: Uuid,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Audit record of one logical movement of funds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Transfer {
    pub id: Uuid,
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Query params
// ============================================================================

#[derive(Debug, Clone)]
pub struct CreateAccountParams {
    pub owner: String,
    pub balance: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, Copy)]
pub struct UpdateAccountParams {
    pub id: Uuid,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Copy)]
pub struct CreateEntryParams {
    pub account_id: Uuid,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy)]
pub struct UpdateEntryParams {
    pub id: Uuid,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy)]
pub struct CreateTransferParams {
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy)]
pub struct UpdateTransferParams {
    pub id: Uuid,
    pub amount: Decimal,
}

/// Limit/offset pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParams {
    pub limit: i64,
    pub offset: i64,
}

impl ListParams {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }

    /// 1-based page number to limit/offset. `None` if the offset overflows.
    pub fn page(page_num: i64, page_size: i64) -> Option<Self> {
        let offset = page_num.checked_sub(1)?.checked_mul(page_size)?;
        Some(Self {
            limit: page_size,
            offset,
        })
    }
}

/// Entry listing, optionally restricted to one account
#[derive(Debug, Clone, Copy)]
pub struct ListEntriesParams {
    pub account_id: Option<Uuid>,
    pub page: ListParams,
}

/// Transfer listing, optionally restricted to transfers touching one account
#[derive(Debug, Clone, Copy)]
pub struct ListTransfersParams {
    pub account_id: Option<Uuid>,
    pub page: ListParams,
}

// ============================================================================
// Transfer transaction
// ============================================================================

/// Input of a transfer transaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransferTxParams {
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    pub amount: Decimal,
}

impl TransferTxParams {
    pub fn new(from_account_id: Uuid, to_account_id: Uuid, amount: Decimal) -> Self {
        Self {
            from_account_id,
            to_account_id,
            amount,
        }
    }

    /// Cheap checks that need no storage access
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(self.amount));
        }
        if self.from_account_id == self.to_account_id {
            return Err(ValidationError::SameAccount);
        }
        Ok(())
    }
}

/// Everything a committed transfer produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferTxResult {
    pub transfer: Transfer,
    pub from_account: Account,
    pub to_account: Account,
    pub from_entry: Entry,
    pub to_entry: Entry,
}
