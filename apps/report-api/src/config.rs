//! Runtime configuration, resolved once at startup from flags and environment

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Command-line arguments for the report API server
#[derive(Parser, Debug, Clone)]
#[command(name = "report-api")]
#[command(about = "Citizen incident report ingestion and statistics API")]
pub struct Config {
    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// Database URL (`sqlite:...` or `memory`); defaults to a SQLite file
    /// in the platform data directory
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Table holding submitted reports
    #[arg(long, env = "REPORTS_TABLE", default_value = "reports")]
    pub reports_table: String,

    /// Maximum pooled database connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value = "5")]
    pub max_connections: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn database_url(&self) -> String {
        self.database_url.clone().unwrap_or_else(default_database_url)
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

/// SQLite file under the platform data directory, created if missing
fn default_database_url() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("civic-reports");
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::warn!(
            "Could not create data directory {}: {}",
            data_dir.display(),
            e
        );
    }
    format!("sqlite:{}/reports.db?mode=rwc", data_dir.display())
}
