//! In-process report store
//!
//! Nothing is persisted across restarts. Selected with `DATABASE_URL=memory`
//! and used by the HTTP tests.

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use report_core::{Report, StoredReport};
use std::sync::RwLock;
use uuid::Uuid;

use super::{ReportStore, StoreError};

#[derive(Default)]
pub struct MemoryReportStore {
    reports: RwLock<Vec<StoredReport>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("memory store lock poisoned".to_string())
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn insert(&self, report: &Report) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let mut reports = self.reports.write().map_err(|_| poisoned())?;
        reports.push(StoredReport {
            id: id.clone(),
            report: report.clone(),
        });
        Ok(id)
    }

    fn scan<'a>(
        &'a self,
        sector: Option<&'a str>,
    ) -> BoxStream<'a, Result<StoredReport, StoreError>> {
        let snapshot: Vec<Result<StoredReport, StoreError>> = match self.reports.read() {
            Ok(reports) => reports
                .iter()
                .filter(|r| sector.map_or(true, |s| r.report.sector == s))
                .cloned()
                .map(Ok)
                .collect(),
            Err(_) => vec![Err(poisoned())],
        };
        stream::iter(snapshot).boxed()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
