//! Ledger Error Types
//!
//! Three layers:
//! - [`StoreError`]: what the query layer reports (not-found vs constraint vs infra)
//! - [`ValidationError`]: caller mistakes detected without touching storage
//! - [`LedgerError`]: the taxonomy returned by the transaction executor and
//!   the transfer orchestrator

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Query layer
// ============================================================================

#[derive(Error, Debug)]
pub enum StoreError {
    /// Zero rows matched. Recoverable.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Constraint violation: {message}")]
    ConstraintViolation {
        constraint: Option<String>,
        message: String,
    },

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        StoreError::NotFound { entity, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e
            && is_constraint_kind(db_err.kind())
        {
            return StoreError::ConstraintViolation {
                constraint: db_err.constraint().map(str::to_owned),
                message: db_err.message().to_owned(),
            };
        }
        StoreError::Database(e)
    }
}

/// Storage rejected the write because of schema rules
pub(crate) fn is_constraint_kind(kind: sqlx::error::ErrorKind) -> bool {
    use sqlx::error::ErrorKind;
    matches!(
        kind,
        ErrorKind::ForeignKeyViolation
            | ErrorKind::CheckViolation
            | ErrorKind::UniqueViolation
            | ErrorKind::NotNullViolation
    )
}

// ============================================================================
// Validation
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("same account")]
    SameAccount,

    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("amount would overflow the balance")]
    AmountOverflow,

    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("invalid currency code '{0}': expected 3 uppercase letters")]
    InvalidCurrencyCode(String),

    #[error("account [{account_id}] currency mismatch: {account_currency} vs {requested}")]
    CurrencyMismatch {
        account_id: Uuid,
        account_currency: String,
        requested: String,
    },
}

// ============================================================================
// Ledger taxonomy
// ============================================================================

/// Which transaction boundary failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStage {
    Begin,
    Commit,
}

impl fmt::Display for TxStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxStage::Begin => write!(f, "begin"),
            TxStage::Commit => write!(f, "commit"),
        }
    }
}

/// SQLSTATE for a statement cancelled by timeout or cancel request
const QUERY_CANCELED: &str = "57014";

/// Statement aborted by `statement_timeout` or a cancel request
pub(crate) fn is_query_canceled(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.code().is_some_and(|code| code == QUERY_CANCELED),
        _ => false,
    }
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Invalid transfer: {0}")]
    Validation(#[from] ValidationError),

    #[error(
        "Insufficient funds: account {account_id} has balance {balance}, transfer amount {requested}"
    )]
    InsufficientFunds {
        account_id: Uuid,
        balance: Decimal,
        requested: Decimal,
    },

    #[error("Constraint violation: {message}")]
    ConstraintViolation {
        constraint: Option<String>,
        message: String,
    },

    #[error("Storage error: {0}")]
    Storage(#[source] sqlx::Error),

    #[error("Transaction {stage} failed: {source}")]
    Transaction {
        stage: TxStage,
        #[source]
        source: sqlx::Error,
    },

    /// The unit of work failed and so did the rollback. Both are kept.
    #[error("Rollback failed: {rollback} (after: {original})")]
    RollbackFailed {
        #[source]
        original: Box<LedgerError>,
        rollback: sqlx::Error,
    },

    #[error("Transaction cancelled: deadline exceeded (correlation_id={correlation_id})")]
    Cancelled { correlation_id: String },
}

impl From<StoreError> for LedgerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { entity, id } => LedgerError::NotFound { entity, id },
            StoreError::ConstraintViolation {
                constraint,
                message,
            } => LedgerError::ConstraintViolation {
                constraint,
                message,
            },
            StoreError::Database(source) => LedgerError::Storage(source),
        }
    }
}

impl LedgerError {
    /// Error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::NotFound { .. } => "NOT_FOUND",
            LedgerError::Validation(ValidationError::SameAccount) => "SAME_ACCOUNT",
            LedgerError::Validation(ValidationError::NonPositiveAmount(_)) => "INVALID_AMOUNT",
            LedgerError::Validation(ValidationError::AmountOverflow) => "OVERFLOW",
            LedgerError::Validation(ValidationError::UnsupportedCurrency(_))
            | LedgerError::Validation(ValidationError::InvalidCurrencyCode(_)) => {
                "UNSUPPORTED_CURRENCY"
            }
            LedgerError::Validation(ValidationError::CurrencyMismatch { .. }) => {
                "CURRENCY_MISMATCH"
            }
            LedgerError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            LedgerError::ConstraintViolation { .. } => "CONSTRAINT_VIOLATION",
            LedgerError::Storage(_) => "STORAGE_ERROR",
            LedgerError::Transaction { .. } => "TRANSACTION_ERROR",
            LedgerError::RollbackFailed { .. } => "ROLLBACK_FAILED",
            LedgerError::Cancelled { .. } => "CANCELLED",
        }
    }

    /// HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            LedgerError::NotFound { .. } => 404,
            LedgerError::Validation(_) | LedgerError::InsufficientFunds { .. } => 400,
            LedgerError::ConstraintViolation { .. } => 409,
            LedgerError::Cancelled { .. } => 504,
            LedgerError::Storage(_)
            | LedgerError::Transaction { .. }
            | LedgerError::RollbackFailed { .. } => 500,
        }
    }

    /// True when the attempt was abandoned because its deadline passed,
    /// including when the following rollback also failed.
    pub fn is_cancelled(&self) -> bool {
        match self {
            LedgerError::Cancelled { .. } => true,
            LedgerError::RollbackFailed { original, .. } => original.is_cancelled(),
            _ => false,
        }
    }

    /// PostgreSQL aborted the statement because `statement_timeout` elapsed
    pub(crate) fn is_statement_timeout(&self) -> bool {
        match self {
            LedgerError::Storage(e) => is_query_canceled(e),
            _ => false,
        }
    }

    pub(crate) fn cancelled(correlation_id: &str) -> Self {
        LedgerError::Cancelled {
            correlation_id: correlation_id.to_string(),
        }
    }
}
