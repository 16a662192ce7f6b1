//! Bank Ledger - concurrency-safe money transfers on PostgreSQL
//!
//! Moves funds between accounts atomically, leaving a Transfer row and two
//! Entry rows as the audit trail, without double-spending or deadlocking
//! under concurrent transfers in either direction.
//!
//! # Modules
//!
//! - [`ledger`] - Query layer, transaction executor, transfer orchestration
//! - [`db`] - Connection pool and schema migrations
//! - [`gateway`] - HTTP API (accounts, transfers, health)
//! - [`config`] - YAML configuration
//! - [`logging`] - tracing subscriber setup

pub mod config;
pub mod db;
pub mod gateway;
pub mod ledger;
pub mod logging;

// Convenient re-exports at crate root
pub use ledger::{
    Account, Entry, LedgerError, Querier, RequestContext, Store, StoreError, Transfer,
    TransferTxParams, TransferTxResult,
};
