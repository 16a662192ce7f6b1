use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

use crate::ledger::{CurrencySet, DEFAULT_CURRENCIES};

/// Environment variable that overrides `postgres_url`
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    /// PostgreSQL connection URL for the ledger
    #[serde(default)]
    pub postgres_url: Option<String>,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub transfer: TransferConfig,
    /// Currencies accounts and transfers may use
    #[serde(default = "default_currencies")]
    pub currencies: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
    /// Apply `migrations/` on startup
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 20,
            acquire_timeout_ms: 5000,
            run_migrations: true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TransferConfig {
    /// Per-request deadline for one transfer transaction
    pub timeout_ms: u64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self { timeout_ms: 10_000 }
    }
}

impl TransferConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_currencies() -> Vec<String> {
    DEFAULT_CURRENCIES.iter().map(|c| c.to_string()).collect()
}

impl AppConfig {
    pub fn load(env: &str) -> anyhow::Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path))?;
        let mut config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config yaml: {}", config_path))?;

        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            config.postgres_url = Some(url);
        }
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Validated, immutable currency whitelist
    pub fn currency_set(&self) -> anyhow::Result<CurrencySet> {
        CurrencySet::new(&self.currencies).context("Invalid currencies in config")
    }
}
