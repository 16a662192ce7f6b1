//! Account handlers (create, get, list)

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::ledger::{Account, CreateAccountParams, Querier};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, CreateAccountRequest, ListAccountsQuery, ok};

/// Create account with zero balance
///
/// POST /accounts
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateAccountRequest>,
) -> ApiResult<Account> {
    let currency = state.currencies.validate(&req.currency)?;

    let mut conn = state.store.conn().await?;
    let account = conn
        .create_account(CreateAccountParams {
            owner: req.owner.trim().to_string(),
            balance: Decimal::ZERO,
            currency: currency.into_string(),
        })
        .await?;

    tracing::info!(account_id = %account.id, owner = %account.owner, currency = %account.currency, "Account created");
    ok(account)
}

/// Get account by id
///
/// GET /accounts/{id}
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Account> {
    let mut conn = state.store.conn().await?;
    match conn.get_account(id).await {
        Ok(account) => ok(account),
        Err(e) if e.is_not_found() => ApiError::not_found(e.to_string()).into_err(),
        Err(e) => Err(e.into()),
    }
}

/// List accounts, one page at a time
///
/// GET /accounts?page_num=1&page_size=5
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListAccountsQuery>,
) -> ApiResult<Vec<Account>> {
    let page = query.validate().map_err(ApiError::bad_request)?;

    let mut conn = state.store.conn().await?;
    let accounts = conn.list_accounts(page).await?;
    ok(accounts)
}
