//! Civic Reports API Server
//!
//! Provides REST endpoints for:
//! - Report submission (validated and normalized before storage)
//! - Report listing, optionally by sector
//! - Aggregate statistics by sector and city

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

mod config;
mod error;
mod handlers;
mod models;
mod state;
mod store;

use config::Config;
use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    // Reports are submitted from browser clients on other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/submit", post(handlers::submit_report))
        .route("/api/reports", get(handlers::list_reports))
        .route("/api/stats", get(handlers::stats))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::parse();

    let (api_level, core_level) = if config.verbose {
        ("report_api=debug", "report_core=debug")
    } else {
        ("report_api=info", "report_core=info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(api_level.parse()?)
                .add_directive(core_level.parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    info!("Initializing report API...");
    let state = Arc::new(AppState::new(&config).await);

    let app = router(state);

    let addr = config.bind_addr()?;
    info!("Starting report API on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
