//! Bank Ledger server
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌──────────┐
//! │  Config  │───▶│ Postgres │───▶│  Store   │───▶│ Gateway  │
//! │  (YAML)  │    │(migrate) │    │(exec_tx) │    │  (axum)  │
//! └──────────┘    └──────────┘    └──────────┘    └──────────┘
//! ```
//!
//! Usage: `bank_ledger [--env dev] [--port 8080]`

use std::sync::Arc;

use anyhow::Context;

use bank_ledger::config::AppConfig;
use bank_ledger::db::Database;
use bank_ledger::gateway::{self, state::AppState};
use bank_ledger::ledger::Store;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let mut app_config = AppConfig::load(&env)?;
    if let Some(port) = get_port_override() {
        app_config.gateway.port = port;
    }
    let _log_guard = bank_ledger::logging::init_logging(&app_config);

    tracing::info!(
        version = env!("GIT_HASH"),
        "Starting bank ledger in {} mode",
        env
    );

    let currencies = app_config.currency_set()?;
    let database_url = app_config
        .postgres_url
        .as_deref()
        .context("postgres_url is not configured (set it in config or DATABASE_URL)")?;

    let db = Database::connect(database_url, &app_config.database)
        .await
        .context("Failed to connect to PostgreSQL")?;
    if app_config.database.run_migrations {
        db.migrate().await.context("Failed to apply migrations")?;
    }

    let state = Arc::new(AppState::new(
        Store::new(db.into_pool()),
        currencies,
        app_config.transfer.timeout(),
    ));

    gateway::run_server(&app_config.gateway.host, app_config.gateway.port, state).await
}
