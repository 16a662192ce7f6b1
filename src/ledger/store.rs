//! Store: query layer access plus transaction orchestration
//!
//! The store owns the connection pool. Non-transactional callers borrow a
//! pooled connection with [`Store::conn`] and use the [`Querier`](super::Querier)
//! operations on it; multi-statement work goes through [`Store::exec_tx`].

use futures::future::BoxFuture;
use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, PgPool, Postgres};
use tokio::time::Instant;
use tracing::{debug, error, warn};

use super::context::RequestContext;
use super::error::{LedgerError, StoreError, TxStage, is_query_canceled};

#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Borrow a pooled connection for direct (non-transactional) queries
    pub async fn conn(&self) -> Result<PoolConnection<Postgres>, StoreError> {
        Ok(self.pool.acquire().await?)
    }

    /// Run `unit_of_work` inside one database transaction.
    ///
    /// - success: commit, return the unit of work's value
    /// - failure: roll back and return the original error; if the rollback
    ///   fails too, both are returned in [`LedgerError::RollbackFailed`]
    /// - deadline in `ctx` passed: [`LedgerError::Cancelled`], rolled back
    ///
    /// The connection handed to `unit_of_work` is only valid for the lifetime
    /// of the returned future. Calls must not be nested.
    pub async fn exec_tx<T, F>(&self, ctx: &RequestContext, unit_of_work: F) -> Result<T, LedgerError>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, LedgerError>> + Send,
    {
        if ctx.is_expired() {
            return Err(LedgerError::cancelled(ctx.correlation_id()));
        }

        let begin = match ctx.deadline() {
            Some(deadline) => tokio::time::timeout_at(deadline, self.pool.begin())
                .await
                .map_err(|_| LedgerError::cancelled(ctx.correlation_id()))?,
            None => self.pool.begin().await,
        };
        let mut tx = begin.map_err(|source| {
            error!(correlation_id = ctx.correlation_id(), error = %source, "Failed to begin transaction");
            LedgerError::Transaction {
                stage: TxStage::Begin,
                source,
            }
        })?;

        let outcome = match ctx.deadline() {
            Some(deadline) => {
                let work = async {
                    set_statement_timeout(&mut tx, deadline).await?;
                    unit_of_work(&mut *tx).await
                };
                tokio::time::timeout_at(deadline, work)
                    .await
                    .unwrap_or_else(|_| Err(LedgerError::cancelled(ctx.correlation_id())))
            }
            None => unit_of_work(&mut *tx).await,
        };
        // Server-side timeout may fire before ours
        let outcome = outcome.map_err(|e| {
            if e.is_statement_timeout() {
                LedgerError::cancelled(ctx.correlation_id())
            } else {
                e
            }
        });

        match outcome {
            Ok(value) => {
                tx.commit().await.map_err(|source| {
                    error!(correlation_id = ctx.correlation_id(), error = %source, "Failed to commit transaction");
                    LedgerError::Transaction {
                        stage: TxStage::Commit,
                        source,
                    }
                })?;
                debug!(correlation_id = ctx.correlation_id(), "Transaction committed");
                Ok(value)
            }
            Err(err) => match tx.rollback().await {
                Ok(()) => {
                    debug!(correlation_id = ctx.correlation_id(), error = %err, "Transaction rolled back");
                    Err(err)
                }
                Err(rollback) => Err(resolve_rollback_failure(ctx, err, rollback)),
            },
        }
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// A statement dropped by our deadline may leave its server-side 57014
/// reply unread; the rollback then reads it. That is the cancellation itself,
/// and dropping the transaction still queues the ROLLBACK.
fn resolve_rollback_failure(
    ctx: &RequestContext,
    err: LedgerError,
    rollback: sqlx::Error,
) -> LedgerError {
    if err.is_cancelled() && is_query_canceled(&rollback) {
        debug!(correlation_id = ctx.correlation_id(), error = %err, "Transaction cancelled");
        return err;
    }
    warn!(
        correlation_id = ctx.correlation_id(),
        error = %err,
        rollback_error = %rollback,
        "Rollback failed"
    );
    LedgerError::RollbackFailed {
        original: Box::new(err),
        rollback,
    }
}

/// Bound every statement of the transaction by the remaining time, so a
/// statement blocked on a row lock is aborted server-side as well.
async fn set_statement_timeout(conn: &mut PgConnection, deadline: Instant) -> Result<(), LedgerError> {
    let remaining_ms = deadline
        .saturating_duration_since(Instant::now())
        .as_millis()
        .max(1);
    sqlx::query(&format!("SET LOCAL statement_timeout = {remaining_ms}"))
        .execute(&mut *conn)
        .await
        .map_err(LedgerError::Storage)?;
    Ok(())
}
