//! Report persistence
//!
//! Handlers only see the [`ReportStore`] trait; the concrete backend is
//! chosen once at startup from the configured database URL.

use async_trait::async_trait;
use futures::stream::BoxStream;
use report_core::{Report, StoredReport};
use std::sync::Arc;
use thiserror::Error;

mod memory;
mod sqlite;

pub use memory::MemoryReportStore;
pub use sqlite::SqliteReportStore;

/// Database URL that selects the in-process store
pub const MEMORY_URL: &str = "memory";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid table name: {0:?}")]
    InvalidTable(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Durable keyed collection of normalized reports
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Persist one report and return its newly assigned id
    async fn insert(&self, report: &Report) -> Result<String, StoreError>;

    /// Stream every report, or only those whose sector matches exactly.
    /// No ordering is guaranteed.
    fn scan<'a>(
        &'a self,
        sector: Option<&'a str>,
    ) -> BoxStream<'a, Result<StoredReport, StoreError>>;

    /// Short backend name for logs
    fn backend(&self) -> &'static str;
}

/// Open the store named by `url`
pub async fn open(
    url: &str,
    table: &str,
    max_connections: u32,
) -> Result<Arc<dyn ReportStore>, StoreError> {
    if url == MEMORY_URL {
        return Ok(Arc::new(MemoryReportStore::new()));
    }
    let store = SqliteReportStore::connect(url, table, max_connections).await?;
    Ok(Arc::new(store))
}
