//! Derives the canonical stored [`Report`] from a validated submission

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::model::{Location, Report, ValidSubmission, DEFAULT_CHANNEL, MAX_SECTOR_CHARS};

/// Keys the server owns; client-supplied values are discarded
const SERVER_ASSIGNED: [&str; 2] = ["id", "timestamp"];

/// Coerce an optional JSON value to a finite number.
///
/// Numbers pass through; strings are parsed after trimming surrounding
/// whitespace. Absent values, `null`, empty or unparseable strings,
/// booleans, containers and non-finite results all give `None`.
pub fn try_parse_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Render a JSON value as text: strings verbatim, `null` as empty, anything
/// else as compact JSON.
pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Trim whitespace and keep at most [`MAX_SECTOR_CHARS`] characters
pub fn normalize_sector(value: &Value) -> String {
    coerce_text(value)
        .trim()
        .chars()
        .take(MAX_SECTOR_CHARS)
        .collect()
}

/// Build the stored form of a submission, stamped with `now`.
///
/// Never fails: every field either has a value guaranteed by validation or
/// a defined fallback.
pub fn normalize(submission: ValidSubmission, now: DateTime<Utc>) -> Report {
    let ValidSubmission {
        mut fields,
        mut location,
    } = submission;

    // A `null` sector is kept as empty text so it groups as Unknown rather
    // than under a literal "None" or "null" key
    let sector = fields
        .remove("sector")
        .map(|v| normalize_sector(&v))
        .unwrap_or_default();
    let description = fields
        .remove("description")
        .map(|v| coerce_text(&v))
        .unwrap_or_default();

    let raw_amount = fields.remove("amount");
    let amount = try_parse_number(raw_amount.as_ref());
    if amount.is_none() {
        if let Some(raw) = raw_amount.filter(|v| !is_blank(v)) {
            tracing::debug!("Dropping non-numeric amount: {}", raw);
        }
    }

    // `null` counts as not supplied for the optional fields, so a null
    // channel still gets the default instead of being stored as null
    let channel = fields
        .remove("channel")
        .filter(|v| !v.is_null())
        .map(|v| coerce_text(&v))
        .unwrap_or_else(|| DEFAULT_CHANNEL.to_string());
    let city = fields
        .remove("city")
        .filter(|v| !v.is_null())
        .map(|v| coerce_text(&v));

    for key in SERVER_ASSIGNED {
        fields.remove(key);
    }

    let location = Location {
        lat: location.remove("lat").unwrap_or(Value::Null),
        lng: location.remove("lng").unwrap_or(Value::Null),
        extra: location,
    };

    Report {
        location,
        sector,
        description,
        amount,
        channel,
        city,
        timestamp: now.to_rfc3339_opts(SecondsFormat::Micros, true),
        extra: fields,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
