//! Ledger: accounts, entries and transfers on PostgreSQL
//!
//! # Layers
//!
//! - [`queries`] - `Querier` trait, parameterized CRUD on the three tables
//! - [`store`] - `Store::exec_tx`, begin/run/commit with rollback on failure
//! - [`transfer`] - `Store::transfer_tx`, the atomic funds movement
//!
//! # Safety Invariants
//!
//! 1. **Conservation**: committed transfers never change the sum of balances
//! 2. **Lock Ordering**: both account rows are locked lower id first
//! 3. **Check Under Lock**: sufficiency is decided on the locked balance

pub mod context;
pub mod error;
#[cfg(test)]
pub(crate) mod memory;
pub mod models;
pub mod queries;
pub mod store;
pub mod transfer;
pub mod validation;

pub use context::RequestContext;
pub use error::{LedgerError, StoreError, TxStage, ValidationError};
pub use models::{
    Account, CreateAccountParams, CreateEntryParams, CreateTransferParams, Entry,
    ListEntriesParams, ListParams, ListTransfersParams, Transfer, TransferTxParams,
    TransferTxResult, UpdateAccountParams, UpdateEntryParams, UpdateTransferParams,
};
pub use queries::{Querier, StoreResult};
pub use store::Store;
pub use transfer::lock_order;
pub use validation::{CurrencyCode, CurrencySet, DEFAULT_CURRENCIES};
