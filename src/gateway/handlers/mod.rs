//! HTTP handlers
//!
//! - [`health`]: welcome and health check
//! - [`account`]: create/get/list accounts
//! - [`transfer`]: create transfer

pub mod account;
pub mod health;
pub mod transfer;

use axum::http::HeaderMap;
use uuid::Uuid;

/// Header carrying the caller's correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id from `x-request-id`, or a fresh UUID
pub fn correlation_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
