//! Shape checks for inbound JSON payloads.
//!
//! Validation walks the payload against a fixed schema and reports the first
//! violation it meets. It never touches storage; checking that referenced ids
//! exist is the handler's job.

use serde_json::Value;

/// A payload does not match the expected schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SchemaValidationError {
    pub message: String,
}

impl SchemaValidationError {
    fn required(property: &str) -> Self {
        Self {
            message: format!("'{property}' is a required property"),
        }
    }

    fn wrong_type(value: &Value, expected: &str) -> Self {
        Self {
            message: format!("{value} is not of type '{expected}'"),
        }
    }
}

/// Validate a song write payload of the shape `{"file": {"id": <number>}}`.
///
/// Extra properties are allowed at every level.
pub fn validate_song_payload(payload: &Value) -> Result<(), SchemaValidationError> {
    let root = expect_object(payload)?;
    let file = root
        .get("file")
        .ok_or_else(|| SchemaValidationError::required("file"))?;

    let file = expect_object(file)?;
    let id = file
        .get("id")
        .ok_or_else(|| SchemaValidationError::required("id"))?;

    if !id.is_number() {
        return Err(SchemaValidationError::wrong_type(id, "number"));
    }
    Ok(())
}

fn expect_object(value: &Value) -> Result<&serde_json::Map<String, Value>, SchemaValidationError> {
    value
        .as_object()
        .ok_or_else(|| SchemaValidationError::wrong_type(value, "object"))
}
