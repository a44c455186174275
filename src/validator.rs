//! Shape validation for review API responses
//!
//! The review API hands back loosely-typed JSON. [`validate`] turns it into an
//! [`ApiResponse`] or fails with [`Error::MalformedResponse`] naming the first
//! violated field. An empty `homeworks` list is valid: it is the steady state
//! when nothing changed since the watermark. Only the first (newest) homework
//! has to decode; broken older entries are skipped.

use crate::error::{Error, Result};
use crate::types::{ApiResponse, HomeworkRecord};
use serde_json::Value;
use tracing::warn;

/// Validate a decoded response body
pub fn validate(raw: &Value) -> Result<ApiResponse> {
    let object = raw
        .as_object()
        .ok_or_else(|| malformed(format!("expected a JSON object, got {}", kind(raw))))?;

    let homeworks = match object.get("homeworks") {
        None | Some(Value::Null) => return Err(malformed("field \"homeworks\" is absent")),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(malformed(format!(
                "field \"homeworks\" must be a list, got {}",
                kind(other)
            )));
        }
    };

    let current_date = match object.get("current_date") {
        None | Some(Value::Null) => return Err(malformed("field \"current_date\" is absent")),
        Some(value) => value.as_i64().ok_or_else(|| {
            malformed(format!(
                "field \"current_date\" must be an integer timestamp, got {}",
                value
            ))
        })?,
    };

    // Only the newest homework is ever announced, so only it must decode.
    // Older entries that do not are dropped rather than failing the cycle.
    let mut records = Vec::with_capacity(homeworks.len());
    for (index, item) in homeworks.iter().enumerate() {
        match decode_record(index, item) {
            Ok(record) => records.push(record),
            Err(e) if index == 0 => return Err(e),
            Err(e) => warn!(error = %e, "skipping undecodable older homework"),
        }
    }

    Ok(ApiResponse {
        homeworks: records,
        current_date,
    })
}

fn decode_record(index: usize, item: &Value) -> Result<HomeworkRecord> {
    if !item.is_object() {
        return Err(malformed(format!(
            "homework #{} must be an object, got {}",
            index,
            kind(item)
        )));
    }
    serde_json::from_value::<HomeworkRecord>(item.clone())
        .map_err(|e| malformed(format!("homework #{}: {}", index, e)))
}

fn malformed(message: impl Into<String>) -> Error {
    Error::MalformedResponse(message.into())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
