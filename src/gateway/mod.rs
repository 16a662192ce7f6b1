pub mod handlers;
pub mod state;
pub mod types;

use anyhow::Context;
use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Request},
    middleware::{Next, from_fn},
    response::Response,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::Instrument;

use handlers::REQUEST_ID_HEADER;
use state::AppState;

/// Ensure every request carries `x-request-id` and echo it on the response.
/// The id is the correlation id of the request span and of any transfer
/// started by the request.
async fn request_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let correlation_id = handlers::correlation_id(request.headers());
    let header = HeaderValue::from_str(&correlation_id).ok();
    if let Some(value) = header.clone() {
        request.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    let span = tracing::info_span!(
        "request",
        correlation_id = %correlation_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    let mut response = next.run(request).instrument(span).await;
    if let Some(value) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Build the ledger API router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::health::welcome))
        .route("/health", get(handlers::health::health_check))
        .route(
            "/accounts",
            post(handlers::account::create_account).get(handlers::account::list_accounts),
        )
        .route("/accounts/{id}", get(handlers::account::get_account))
        .route("/transfers", post(handlers::transfer::create_transfer))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Serve the ledger API until Ctrl-C
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);

    // Bind address
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {} (port may already be in use)", addr))?;

    tracing::info!("Gateway listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
