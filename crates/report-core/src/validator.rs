//! Required-field and shape checks for incoming submissions

use serde_json::Value;
use thiserror::Error;

use crate::model::{RawSubmission, ValidSubmission};

/// Fields every submission must carry, checked in this order
pub const REQUIRED_FIELDS: [&str; 3] = ["location", "sector", "description"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("location must be an object with lat and lng")]
    InvalidLocation,
}

/// Check a raw submission and promote it to a [`ValidSubmission`].
///
/// Only key presence is checked: a field sent as `null` is present. A
/// present location is shape-checked before the remaining fields, so a
/// malformed location is reported even when `sector` or `description` are
/// also missing. The `lat` and `lng` values themselves are not inspected.
pub fn validate(raw: RawSubmission) -> Result<ValidSubmission, ValidationError> {
    let mut fields = raw.into_fields();

    let location = match fields.remove("location") {
        None => return Err(ValidationError::MissingField("location")),
        Some(Value::Object(location))
            if location.contains_key("lat") && location.contains_key("lng") =>
        {
            location
        }
        Some(_) => return Err(ValidationError::InvalidLocation),
    };

    if let Some(missing) = REQUIRED_FIELDS[1..]
        .iter()
        .copied()
        .find(|field| !fields.contains_key(*field))
    {
        return Err(ValidationError::MissingField(missing));
    }

    Ok(ValidSubmission { fields, location })
}
