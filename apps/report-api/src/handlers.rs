//! HTTP handlers for the report API

use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use futures::TryStreamExt;
use report_core::{normalize, validate, RawSubmission, Stats, StatsAccumulator, StoredReport};
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{HealthResponse, ReportsQuery, SubmitResponse};
use crate::state::AppState;

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        database: state.store_ready(),
    })
}

/// Validate, normalize and persist one report.
///
/// The body is read leniently: anything that is not a JSON object is
/// treated as an empty submission and fails validation.
pub async fn submit_report(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SubmitResponse>, ApiError> {
    let store = state.store()?;

    let submission = validate(RawSubmission::from_slice(&body))?;
    let report = normalize(submission, Utc::now());
    let id = store.insert(&report).await?;

    tracing::info!("Report submitted: {} (sector {:?})", id, report.sector);

    Ok(Json(SubmitResponse {
        message: "Report submitted".to_string(),
        id,
    }))
}

/// List stored reports, optionally restricted to one sector
pub async fn list_reports(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportsQuery>,
) -> Result<Json<Vec<StoredReport>>, ApiError> {
    let store = state.store()?;
    let reports: Vec<StoredReport> = store.scan(query.sector()).try_collect().await?;
    Ok(Json(reports))
}

/// Aggregate every stored report in one pass over the store
pub async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<Stats>, ApiError> {
    let store = state.store()?;

    let mut records = store.scan(None);
    let mut acc = StatsAccumulator::new();
    while let Some(record) = records.try_next().await? {
        acc.push(&record.report);
    }

    Ok(Json(acc.finish()))
}
