//! Application state for the report API

use std::sync::Arc;

use crate::config::Config;
use crate::error::ApiError;
use crate::store::{self, ReportStore};

pub struct AppState {
    /// `None` when the store failed to initialize; data endpoints then
    /// answer 500 while health keeps reporting the degraded state
    store: Option<Arc<dyn ReportStore>>,
}

impl AppState {
    /// Open the configured store. Never fails: a store error is logged and
    /// the service starts degraded.
    pub async fn new(config: &Config) -> Self {
        let url = config.database_url();
        match store::open(&url, &config.reports_table, config.max_connections).await {
            Ok(store) => {
                tracing::info!("Report store ready ({})", store.backend());
                Self::with_store(store)
            }
            Err(e) => {
                tracing::warn!("Report store not initialized: {}", e);
                Self::degraded()
            }
        }
    }

    pub fn with_store(store: Arc<dyn ReportStore>) -> Self {
        Self { store: Some(store) }
    }

    pub fn degraded() -> Self {
        Self { store: None }
    }

    pub fn store_ready(&self) -> bool {
        self.store.is_some()
    }

    pub fn store(&self) -> Result<&dyn ReportStore, ApiError> {
        self.store.as_deref().ok_or(ApiError::StoreUnavailable)
    }
}
