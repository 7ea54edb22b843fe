//! Response bodies for the report API

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Whether the report store initialized at startup
    pub database: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub message: String,
    pub id: String,
}

/// Query string for `GET /api/reports`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportsQuery {
    pub sector: Option<String>,
}

impl ReportsQuery {
    /// Sector to filter on; an empty parameter means no filter
    pub fn sector(&self) -> Option<&str> {
        self.sector.as_deref().filter(|s| !s.is_empty())
    }
}
