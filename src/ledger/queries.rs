//! Query layer for ledger storage
//!
//! [`Querier`] is implemented once, for [`PgConnection`]. Both a pooled
//! connection (`PoolConnection<Postgres>`) and an open transaction
//! (`Transaction<'_, Postgres>`) deref to `PgConnection`, so the same
//! operations run either directly against the database or inside a
//! transaction the caller controls.

use async_trait::async_trait;
use sqlx::PgConnection;
use uuid::Uuid;

use super::error::StoreError;
use super::models::{
    Account, CreateAccountParams, CreateEntryParams, CreateTransferParams, Entry,
    ListEntriesParams, ListParams, ListTransfersParams, Transfer, UpdateAccountParams,
    UpdateEntryParams, UpdateTransferParams,
};

pub type StoreResult<T> = Result<T, StoreError>;

const ACCOUNT: &str = "account";
const ENTRY: &str = "entry";
const TRANSFER: &str = "transfer";

/// Parameterized CRUD over accounts, entries and transfers
#[async_trait]
pub trait Querier: Send {
    // === Accounts ===
    async fn create_account(&mut self, params: CreateAccountParams) -> StoreResult<Account>;
    async fn get_account(&mut self, id: Uuid) -> StoreResult<Account>;
    /// Read an account and hold its row lock until the enclosing transaction ends.
    /// Outside a transaction the lock is released as soon as the statement completes.
    async fn get_account_for_update(&mut self, id: Uuid) -> StoreResult<Account>;
    async fn list_accounts(&mut self, page: ListParams) -> StoreResult<Vec<Account>>;
    async fn update_account(&mut self, params: UpdateAccountParams) -> StoreResult<()>;
    async fn delete_account(&mut self, id: Uuid) -> StoreResult<()>;

    // === Entries ===
    async fn create_entry(&mut self, params: CreateEntryParams) -> StoreResult<Entry>;
    async fn get_entry(&mut self, id: Uuid) -> StoreResult<Entry>;
    async fn list_entries(&mut self, params: ListEntriesParams) -> StoreResult<Vec<Entry>>;
    async fn update_entry(&mut self, params: UpdateEntryParams) -> StoreResult<()>;
    async fn delete_entry(&mut self, id: Uuid) -> StoreResult<()>;

    // === Transfers ===
    async fn create_transfer(&mut self, params: CreateTransferParams) -> StoreResult<Transfer>;
    async fn get_transfer(&mut self, id: Uuid) -> StoreResult<Transfer>;
    async fn list_transfers(&mut self, params: ListTransfersParams)
    -> StoreResult<Vec<Transfer>>;
    async fn update_transfer(&mut self, params: UpdateTransferParams) -> StoreResult<()>;
    async fn delete_transfer(&mut self, id: Uuid) -> StoreResult<()>;
}

#[async_trait]
impl Querier for PgConnection {
    async fn create_account(&mut self, params: CreateAccountParams) -> StoreResult<Account> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (id, owner, balance, currency)
            VALUES ($1, $2, $3, $4)
            RETURNING id, owner, balance, currency, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&params.owner)
        .bind(params.balance)
        .bind(&params.currency)
        .fetch_one(&mut *self)
        .await?;

        Ok(account)
    }

    async fn get_account(&mut self, id: Uuid) -> StoreResult<Account> {
        sqlx::query_as::<_, Account>(
            r#"SELECT id, owner, balance, currency, created_at FROM accounts WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&mut *self)
        .await?
        .ok_or_else(|| StoreError::not_found(ACCOUNT, id))
    }

    async fn get_account_for_update(&mut self, id: Uuid) -> StoreResult<Account> {
        // NO KEY UPDATE: does not conflict with the KEY SHARE locks taken by
        // foreign-key inserts into entries/transfers.
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, owner, balance, currency, created_at FROM accounts
            WHERE id = $1
            FOR NO KEY UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self)
        .await?
        .ok_or_else(|| StoreError::not_found(ACCOUNT, id))
    }

    async fn list_accounts(&mut self, page: ListParams) -> StoreResult<Vec<Account>> {
        let rows = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, owner, balance, currency, created_at FROM accounts
            ORDER BY created_at, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&mut *self)
        .await?;

        Ok(rows)
    }

    async fn update_account(&mut self, params: UpdateAccountParams) -> StoreResult<()> {
        let result = sqlx::query(r#"UPDATE accounts SET balance = $2 WHERE id = $1"#)
            .bind(params.id)
            .bind(params.balance)
            .execute(&mut *self)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(ACCOUNT, params.id));
        }
        Ok(())
    }

    async fn delete_account(&mut self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query(r#"DELETE FROM accounts WHERE id = $1"#)
            .bind(id)
            .execute(&mut *self)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(ACCOUNT, id));
        }
        Ok(())
    }

    async fn create_entry(&mut self, params: CreateEntryParams) -> StoreResult<Entry> {
        let entry = sqlx::query_as::<_, Entry>(
            r#"
            INSERT INTO entries (id, account_id, amount)
            VALUES ($1, $2, $3)
            RETURNING id, account_id, amount, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(params.account_id)
        .bind(params.amount)
        .fetch_one(&mut *self)
        .await?;

        Ok(entry)
    }

    async fn get_entry(&mut self, id: Uuid) -> StoreResult<Entry> {
        sqlx::query_as::<_, Entry>(
            r#"SELECT id, account_id, amount, created_at, updated_at FROM entries WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&mut *self)
        .await?
        .ok_or_else(|| StoreError::not_found(ENTRY, id))
    }

    async fn list_entries(&mut self, params: ListEntriesParams) -> StoreResult<Vec<Entry>> {
        let rows = sqlx::query_as::<_, Entry>(
            r#"
            SELECT id, account_id, amount, created_at, updated_at FROM entries
            WHERE ($1::uuid IS NULL OR account_id = $1)
            ORDER BY created_at, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(params.account_id)
        .bind(params.page.limit)
        .bind(params.page.offset)
        .fetch_all(&mut *self)
        .await?;

        Ok(rows)
    }

    async fn update_entry(&mut self, params: UpdateEntryParams) -> StoreResult<()> {
        let result =
            sqlx::query(r#"UPDATE entries SET amount = $2, updated_at = NOW() WHERE id = $1"#)
                .bind(params.id)
                .bind(params.amount)
                .execute(&mut *self)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(ENTRY, params.id));
        }
        Ok(())
    }

    async fn delete_entry(&mut self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query(r#"DELETE FROM entries WHERE id = $1"#)
            .bind(id)
            .execute(&mut *self)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(ENTRY, id));
        }
        Ok(())
    }

    async fn create_transfer(&mut self, params: CreateTransferParams) -> StoreResult<Transfer> {
        let transfer = sqlx::query_as::<_, Transfer>(
            r#"
            INSERT INTO transfers (id, from_account_id, to_account_id, amount)
            VALUES ($1, $2, $3, $4)
            RETURNING id, from_account_id, to_account_id, amount, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(params.from_account_id)
        .bind(params.to_account_id)
        .bind(params.amount)
        .fetch_one(&mut *self)
        .await?;

        Ok(transfer)
    }

    async fn get_transfer(&mut self, id: Uuid) -> StoreResult<Transfer> {
        sqlx::query_as::<_, Transfer>(
            r#"
            SELECT id, from_account_id, to_account_id, amount, created_at, updated_at
            FROM transfers WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self)
        .await?
        .ok_or_else(|| StoreError::not_found(TRANSFER, id))
    }

    async fn list_transfers(
        &mut self,
        params: ListTransfersParams,
    ) -> StoreResult<Vec<Transfer>> {
        let rows = sqlx::query_as::<_, Transfer>(
            r#"
            SELECT id, from_account_id, to_account_id, amount, created_at, updated_at
            FROM transfers
            WHERE ($1::uuid IS NULL OR from_account_id = $1 OR to_account_id = $1)
            ORDER BY created_at, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(params.account_id)
        .bind(params.page.limit)
        .bind(params.page.offset)
        .fetch_all(&mut *self)
        .await?;

        Ok(rows)
    }

    async fn update_transfer(&mut self, params: UpdateTransferParams) -> StoreResult<()> {
        let result =
            sqlx::query(r#"UPDATE transfers SET amount = $2, updated_at = NOW() WHERE id = $1"#)
                .bind(params.id)
                .bind(params.amount)
                .execute(&mut *self)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(TRANSFER, params.id));
        }
        Ok(())
    }

    async fn delete_transfer(&mut self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query(r#"DELETE FROM transfers WHERE id = $1"#)
            .bind(id)
            .execute(&mut *self)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(TRANSFER, id));
        }
        Ok(())
    }
}
