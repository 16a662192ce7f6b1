//! In-memory Querier for testing the orchestrator without PostgreSQL

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::StoreError;
use super::models::{
    Account, CreateAccountParams, CreateEntryParams, CreateTransferParams, Entry,
    ListEntriesParams, ListParams, ListTransfersParams, Transfer, UpdateAccountParams,
    UpdateEntryParams, UpdateTransferParams,
};
use super::queries::{Querier, StoreResult};

#[derive(Default)]
pub struct MemoryQuerier {
    pub accounts: BTreeMap<Uuid, Account>,
    pub entries: Vec<Entry>,
    pub transfers: Vec<Transfer>,
    /// Track operations for verification, e.g. `"lock:<id>"`
    pub operations: Vec<String>,
    /// Operation name that fails with a storage error
    fail_on: Option<&'static str>,
}

impl MemoryQuerier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, owner: &str, balance: Decimal) -> (Self, Uuid) {
        let id = Uuid::new_v4();
        self.accounts.insert(
            id,
            Account {
                id,
                owner: owner.to_string(),
                balance,
                currency: "USD".to_string(),
                created_at: Utc::now(),
            },
        );
        (self, id)
    }

    pub fn set_fail_on(&mut self, op: &'static str) {
        self.fail_on = Some(op);
    }

    pub fn balance(&self, id: Uuid) -> Decimal {
        self.accounts[&id].balance
    }

    /// Operation names without arguments
    pub fn op_names(&self) -> Vec<&str> {
        self.operations
            .iter()
            .map(|op| op.split(':').next().unwrap_or(op))
            .collect()
    }

    fn record(&mut self, op: &'static str, arg: impl std::fmt::Display) -> StoreResult<()> {
        self.operations.push(format!("{op}:{arg}"));
        if self.fail_on == Some(op) {
            return Err(StoreError::Database(sqlx::Error::Protocol(format!(
                "injected failure in {op}"
            ))));
        }
        Ok(())
    }

    fn require_account(&self, id: Uuid) -> StoreResult<()> {
        if self.accounts.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::ConstraintViolation {
                constraint: Some("fkey".to_string()),
                message: format!("account {id} is not present"),
            })
        }
    }

    fn account(&self, id: Uuid) -> StoreResult<Account> {
        self.accounts
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("account", id))
    }
}

fn paginate<T: Clone>(rows: impl Iterator<Item = T>, page: ListParams) -> Vec<T> {
    rows.skip(page.offset as usize)
        .take(page.limit as usize)
        .collect()
}

#[async_trait]
impl Querier for MemoryQuerier {
    async fn create_account(&mut self, params: CreateAccountParams) -> StoreResult<Account> {
        self.record("create_account", &params.owner)?;
        let account = Account {
            id: Uuid::new_v4(),
            owner: params.owner,
            balance: params.balance,
            currency: params.currency,
            created_at: Utc::now(),
        };
        self.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn get_account(&mut self, id: Uuid) -> StoreResult<Account> {
        self.record("get_account", id)?;
        self.account(id)
    }

    async fn get_account_for_update(&mut self, id: Uuid) -> StoreResult<Account> {
        self.record("lock", id)?;
        self.account(id)
    }

    async fn list_accounts(&mut self, page: ListParams) -> StoreResult<Vec<Account>> {
        self.record("list_accounts", page.limit)?;
        Ok(paginate(self.accounts.values().cloned(), page))
    }

    async fn update_account(&mut self, params: UpdateAccountParams) -> StoreResult<()> {
        self.record("update_account", params.id)?;
        let account = self
            .accounts
            .get_mut(&params.id)
            .ok_or_else(|| StoreError::not_found("account", params.id))?;
        account.balance = params.balance;
        Ok(())
    }

    async fn delete_account(&mut self, id: Uuid) -> StoreResult<()> {
        self.record("delete_account", id)?;
        self.accounts
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("account", id))
    }

    async fn create_entry(&mut self, params: CreateEntryParams) -> StoreResult<Entry> {
        self.record("create_entry", params.account_id)?;
        self.require_account(params.account_id)?;
        let now = Utc::now();
        let entry = Entry {
            id: Uuid::new_v4(),
            account_id: params.account_id,
            amount: params.amount,
            created_at: now,
            updated_at: now,
        };
        self.entries.push(entry.clone());
        Ok(entry)
    }

    async fn get_entry(&mut self, id: Uuid) -> StoreResult<Entry> {
        self.record("get_entry", id)?;
        self.entries
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("entry", id))
    }

    async fn list_entries(&mut self, params: ListEntriesParams) -> StoreResult<Vec<Entry>> {
        self.record("list_entries", params.page.limit)?;
        let rows = self
            .entries
            .iter()
            .filter(|e| params.account_id.is_none_or(|id| e.account_id == id))
            .cloned();
        Ok(paginate(rows, params.page))
    }

    async fn update_entry(&mut self, params: UpdateEntryParams) -> StoreResult<()> {
        self.record("update_entry", params.id)?;
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == params.id)
            .ok_or_else(|| StoreError::not_found("entry", params.id))?;
        entry.amount = params.amount;
        entry.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_entry(&mut self, id: Uuid) -> StoreResult<()> {
        self.record("delete_entry", id)?;
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() == before {
            return Err(StoreError::not_found("entry", id));
        }
        Ok(())
    }

    async fn create_transfer(&mut self, params: CreateTransferParams) -> StoreResult<Transfer> {
        self.record("create_transfer", params.amount)?;
        self.require_account(params.from_account_id)?;
        self.require_account(params.to_account_id)?;
        let now = Utc::now();
        let transfer = Transfer {
            id: Uuid::new_v4(),
            from_account_id: params.from_account_id,
            to_account_id: params.to_account_id,
            amount: params.amount,
            created_at: now,
            updated_at: now,
        };
        self.transfers.push(transfer.clone());
        Ok(transfer)
    }

    async fn get_transfer(&mut self, id: Uuid) -> StoreResult<Transfer> {
        self.record("get_transfer", id)?;
        self.transfers
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("transfer", id))
    }

    async fn list_transfers(
        &mut self,
        params: ListTransfersParams,
    ) -> StoreResult<Vec<Transfer>> {
        self.record("list_transfers", params.page.limit)?;
        let rows = self
            .transfers
            .iter()
            .filter(|t| {
                params
                    .account_id
                    .is_none_or(|id| t.from_account_id == id || t.to_account_id == id)
            })
            .cloned();
        Ok(paginate(rows, params.page))
    }

    async fn update_transfer(&mut self, params: UpdateTransferParams) -> StoreResult<()> {
        self.record("update_transfer", params.id)?;
        let transfer = self
            .transfers
            .iter_mut()
            .find(|t| t.id == params.id)
            .ok_or_else(|| StoreError::not_found("transfer", params.id))?;
        transfer.amount = params.amount;
        transfer.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_transfer(&mut self, id: Uuid) -> StoreResult<()> {
        self.record("delete_transfer", id)?;
        let before = self.transfers.len();
        self.transfers.retain(|t| t.id != id);
        if self.transfers.len() == before {
            return Err(StoreError::not_found("transfer", id));
        }
        Ok(())
    }
}
