//! API Response types and error codes
//!
//! - `ApiResponse<T>`: Unified response wrapper
//! - `ApiError`: Error response carrying HTTP status and API code
//! - `error_codes`: Standard error code constants

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::ledger::{LedgerError, StoreError, ValidationError};

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// All API responses follow this structure:
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or null (error)
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Create error response
    pub fn error(code: i32, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const INSUFFICIENT_BALANCE: i32 = 1002;
    pub const UNSUPPORTED_CURRENCY: i32 = 1003;
    pub const CURRENCY_MISMATCH: i32 = 1004;

    // Resource errors (4xxx)
    pub const ACCOUNT_NOT_FOUND: i32 = 4001;
    pub const CONSTRAINT_VIOLATION: i32 = 4091;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
    pub const TIMEOUT: i32 = 5041;
}

// ============================================================================
// ApiError
// ============================================================================

/// Handler error, rendered as `ApiResponse` with `data: null`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
}

pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// 200 OK with data
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
        }
    }

    pub fn bad_request(msg: impl ToString) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            error_codes::INVALID_PARAMETER,
            msg.to_string(),
        )
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error_codes::ACCOUNT_NOT_FOUND, msg)
    }

    pub fn into_err<T>(self) -> ApiResult<T> {
        Err(self)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::error(self.code, self.msg))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        LedgerError::from(e).into()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        LedgerError::from(e).into()
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        // Cancelled, even if the rollback afterwards failed
        if e.is_cancelled() {
            tracing::warn!(error = %e, code = e.code(), "Request timed out");
            return Self::new(StatusCode::GATEWAY_TIMEOUT, error_codes::TIMEOUT, e.to_string());
        }

        let status =
            StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = match &e {
            LedgerError::NotFound { .. } => error_codes::ACCOUNT_NOT_FOUND,
            LedgerError::Validation(
                ValidationError::UnsupportedCurrency(_) | ValidationError::InvalidCurrencyCode(_),
            ) => error_codes::UNSUPPORTED_CURRENCY,
            LedgerError::Validation(ValidationError::CurrencyMismatch { .. }) => {
                error_codes::CURRENCY_MISMATCH
            }
            LedgerError::Validation(_) => error_codes::INVALID_PARAMETER,
            LedgerError::InsufficientFunds { .. } => error_codes::INSUFFICIENT_BALANCE,
            LedgerError::ConstraintViolation { .. } => error_codes::CONSTRAINT_VIOLATION,
            LedgerError::Cancelled { .. } => error_codes::TIMEOUT,
            LedgerError::Storage(_)
            | LedgerError::Transaction { .. }
            | LedgerError::RollbackFailed { .. } => error_codes::INTERNAL_ERROR,
        };
        // Infrastructure details stay in the logs
        let msg = if status.is_server_error() {
            tracing::error!(error = %e, code = e.code(), "Request failed");
            "internal error".to_string()
        } else {
            e.to_string()
        };
        Self { status, code, msg }
    }
}
