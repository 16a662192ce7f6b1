//! Health check handler

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{Json, extract::State, http::StatusCode};

use super::super::state::AppState;
use super::super::types::{ApiResponse, ApiResult, error_codes, ok};

/// Health check response data
#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    /// Server timestamp in milliseconds
    pub timestamp_ms: u64,
    /// Build version (git hash)
    pub version: &'static str,
}

/// Welcome endpoint
///
/// GET /
pub async fn welcome() -> ApiResult<&'static str> {
    ok("Welcome to the bank ledger API")
}

/// Health check endpoint
///
/// - Healthy: 200 OK + {code: 0, data: {timestamp_ms, version}}
/// - Unhealthy: 503 Service Unavailable + {code: 5001, msg: "unavailable"}
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(HealthResponse {
                timestamp_ms: now_ms,
                version: env!("GIT_HASH"),
            })),
        ),
        Err(e) => {
            tracing::error!("[HEALTH] PostgreSQL ping failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    code: error_codes::SERVICE_UNAVAILABLE,
                    msg: "unavailable".to_string(),
                    data: None,
                }),
            )
        }
    }
}
