//! Response validation: raw model text to an `AnalysisPayload`.
//!
//! Two separate checks live here:
//! - `validate_response` is shallow. It strips code fences, parses JSON and
//!   requires an object. It never inspects nested keys.
//! - `check_conformance` is the later stage that enforces the rating range. It does not
//!   reject missing keys.

use serde_json::Value;
use thiserror::Error;

use crate::analysis::models::AnalysisPayload;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("model response was empty")]
    Empty,

    #[error("model response is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("model response is a JSON {0}, expected an object")]
    NotAnObject(&'static str),
}

#[derive(Debug, Error)]
pub enum ConformanceError {
    #[error("aiFeedback.rating must be an integer between 1 and 10, got {0}")]
    RatingOutOfRange(Value),
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
///
/// Either fence may be missing. Any language tag after the opening fence is dropped.
/// Nested fences are peeled until none remain, so applying this twice is a no-op.
pub fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();
    loop {
        let before = text.len();
        if let Some(rest) = text.strip_prefix("```") {
            let tag_len = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
                .unwrap_or(rest.len());
            text = rest[tag_len..].trim_start();
        }
        if let Some(rest) = text.strip_suffix("```") {
            text = rest.trim_end();
        }
        if text.len() == before {
            return text;
        }
    }
}

/// Parses raw model output into a payload. The top-level value must be an object.
pub fn validate_response(raw: &str) -> Result<AnalysisPayload, ValidationError> {
    let normalized = strip_code_fences(raw);
    if normalized.is_empty() {
        return Err(ValidationError::Empty);
    }

    match serde_json::from_str::<Value>(normalized)? {
        Value::Object(map) => Ok(AnalysisPayload::from(map)),
        other => Err(ValidationError::NotAnObject(json_kind(&other))),
    }
}

/// Enforces `aiFeedback.rating` ∈ [1, 10] when a rating is present.
///
/// Whole-valued floats such as `8.0` count as integers.
pub fn check_conformance(payload: &AnalysisPayload) -> Result<(), ConformanceError> {
    match payload.rating() {
        None => Ok(()),
        Some(rating) => match rating.as_f64() {
            Some(r) if r.fract() == 0.0 && (1.0..=10.0).contains(&r) => Ok(()),
            _ => Err(ConformanceError::RatingOutOfRange(rating.clone())),
        },
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
