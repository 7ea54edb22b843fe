//! Data model for citizen incident reports
//!
//! A submission moves through three shapes:
//! - [`RawSubmission`]: whatever JSON object the client sent
//! - [`ValidSubmission`]: a raw submission that passed [`crate::validate`]
//! - [`Report`]: the canonical record produced by [`crate::normalize`]

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Channel recorded when the client does not name one
pub const DEFAULT_CHANNEL: &str = "web";

/// Maximum number of characters kept from a submitted sector
pub const MAX_SECTOR_CHARS: usize = 64;

/// Loosely-typed submission body, one JSON object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSubmission {
    fields: Map<String, Value>,
}

impl RawSubmission {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Build from any JSON value. Anything other than an object is treated
    /// as an empty submission, which then fails validation.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    /// Parse a request body leniently: unparseable bytes become an empty
    /// submission rather than an error.
    pub fn from_slice(bytes: &[u8]) -> Self {
        serde_json::from_slice::<Value>(bytes)
            .map(Self::from_value)
            .unwrap_or_default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Value> for RawSubmission {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

/// A submission whose required fields and location shape have been checked
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSubmission {
    pub(crate) fields: Map<String, Value>,
    pub(crate) location: Map<String, Value>,
}

impl ValidSubmission {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Geographic position of a report. `lat` and `lng` are kept exactly as
/// submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: Value,
    pub lng: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Canonical report as persisted by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub location: Location,
    pub sector: String,
    pub description: String,
    pub amount: Option<f64>,
    pub channel: String,
    pub city: Option<String>,
    /// Server time of insertion, RFC 3339 UTC
    pub timestamp: String,
    /// Submitted fields this system does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Report together with its store-assigned identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReport {
    pub id: String,
    #[serde(flatten)]
    pub report: Report,
}
