//! SQLite-backed report store
//!
//! Each report is kept as one JSON document so fields this service does not
//! interpret survive a round trip. `sector` is duplicated into its own
//! indexed column for filtered scans.

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use report_core::{Report, StoredReport};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use super::{ReportStore, StoreError};

pub struct SqliteReportStore {
    pool: SqlitePool,
    insert_sql: String,
    scan_sql: String,
    scan_by_sector_sql: String,
}

impl SqliteReportStore {
    pub async fn connect(url: &str, table: &str, max_connections: u32) -> Result<Self, StoreError> {
        check_table_name(table)?;

        tracing::info!("Connecting to database: {}", url);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        Self::with_pool(pool, table).await
    }

    /// Wrap an existing pool, creating the reports table if it is missing
    pub async fn with_pool(pool: SqlitePool, table: &str) -> Result<Self, StoreError> {
        check_table_name(table)?;
        Self::ensure_schema(&pool, table).await?;

        Ok(Self {
            pool,
            insert_sql: format!(
                r#"INSERT INTO "{table}" (id, sector, document, created_at) VALUES (?, ?, ?, ?)"#
            ),
            scan_sql: format!(r#"SELECT id, document FROM "{table}""#),
            scan_by_sector_sql: format!(r#"SELECT id, document FROM "{table}" WHERE sector = ?"#),
        })
    }

    async fn ensure_schema(pool: &SqlitePool, table: &str) -> Result<(), StoreError> {
        tracing::info!("Ensuring table {} exists", table);

        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS "{table}" (
                id TEXT PRIMARY KEY,
                sector TEXT NOT NULL,
                document TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#
        ))
        .execute(pool)
        .await?;

        sqlx::query(&format!(
            r#"CREATE INDEX IF NOT EXISTS "idx_{table}_sector" ON "{table}"(sector)"#
        ))
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ReportStore for SqliteReportStore {
    async fn insert(&self, report: &Report) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let document = serde_json::to_string(report)?;

        sqlx::query(&self.insert_sql)
            .bind(&id)
            .bind(&report.sector)
            .bind(&document)
            .bind(&report.timestamp)
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    fn scan<'a>(
        &'a self,
        sector: Option<&'a str>,
    ) -> BoxStream<'a, Result<StoredReport, StoreError>> {
        let rows = match sector {
            Some(sector) => sqlx::query_as::<_, (String, String)>(&self.scan_by_sector_sql)
                .bind(sector)
                .fetch(&self.pool),
            None => sqlx::query_as::<_, (String, String)>(&self.scan_sql).fetch(&self.pool),
        };

        rows.map(|row| -> Result<StoredReport, StoreError> {
            let (id, document) = row?;
            let report: Report = serde_json::from_str(&document)?;
            Ok(StoredReport { id, report })
        })
        .boxed()
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

/// Table names are interpolated into SQL as quoted identifiers, so only
/// plain identifiers pass. Keywords such as `order` are fine once quoted.
fn check_table_name(table: &str) -> Result<(), StoreError> {
    let mut chars = table.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && table.len() <= 64;

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidTable(table.to_string()))
    }
}
