//! Transfer handler

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::ledger::{
    Account, Querier, RequestContext, StoreError, TransferTxResult, ValidationError,
};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, TransferRequest, ok};
use super::correlation_id;

/// Create transfer
///
/// POST /transfers
///
/// Both accounts must exist and hold `currency` before the ledger is asked
/// to move funds.
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<TransferRequest>,
) -> ApiResult<TransferTxResult> {
    let ctx = state.transfer_context(correlation_id(&headers));
    let span = tracing::info_span!("create_transfer", correlation_id = ctx.correlation_id());

    execute_transfer(&state, &ctx, req).instrument(span).await
}

async fn execute_transfer(
    state: &AppState,
    ctx: &RequestContext,
    req: TransferRequest,
) -> ApiResult<TransferTxResult> {
    let currency = state.currencies.validate(&req.currency)?;
    let params = req.params();
    params.validate()?;

    {
        let mut conn = state.store.conn().await?;
        valid_account(&mut *conn, params.from_account_id, currency.as_str()).await?;
        valid_account(&mut *conn, params.to_account_id, currency.as_str()).await?;
    }

    let result = state.store.transfer_tx(ctx, params).await?;
    ok(result)
}

/// Account exists and is denominated in `currency`
async fn valid_account<Q>(q: &mut Q, id: Uuid, currency: &str) -> Result<Account, ApiError>
where
    Q: Querier + ?Sized,
{
    let account = q.get_account(id).await.map_err(|e| match e {
        StoreError::NotFound { .. } => ApiError::not_found(e.to_string()),
        other => other.into(),
    })?;

    if account.currency != currency {
        return Err(ValidationError::CurrencyMismatch {
            account_id: id,
            account_currency: account.currency,
            requested: currency.to_string(),
        }
        .into());
    }
    Ok(account)
}
