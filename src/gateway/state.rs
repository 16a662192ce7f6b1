use std::sync::Arc;
use std::time::Duration;

use crate::ledger::{CurrencySet, RequestContext, Store};

/// Gateway application state (shared)
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    /// Supported currencies (read-only)
    pub currencies: Arc<CurrencySet>,
    /// Deadline applied to each transfer request
    pub transfer_timeout: Duration,
}

impl AppState {
    pub fn new(store: Store, currencies: CurrencySet, transfer_timeout: Duration) -> Self {
        Self {
            store,
            currencies: Arc::new(currencies),
            transfer_timeout,
        }
    }

    /// Request context for one transfer
    pub fn transfer_context(&self, correlation_id: String) -> RequestContext {
        RequestContext::with_correlation_id(correlation_id).with_timeout(self.transfer_timeout)
    }
}
