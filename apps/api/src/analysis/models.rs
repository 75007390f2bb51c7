use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Upload ceiling for a single resume document.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// An uploaded document, alive for the duration of one pipeline run.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub filename: String,
    /// Media type declared by the client. Informational only.
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// The model's analysis of one resume, exactly as the provider produced it.
///
/// The only guarantee is that the top-level value is a JSON object. Nested keys such as
/// `personalDetails` or `skills` are trusted, not checked, so readers must tolerate
/// their absence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisPayload(Map<String, Value>);

impl AnalysisPayload {
    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Top-level section by name, e.g. `skills`.
    pub fn section(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// `personalDetails.<key>` as text, matching Postgres `->>`: strings come back
    /// unquoted, `null` is absent and any other value is rendered as JSON.
    pub fn personal_detail(&self, key: &str) -> Option<String> {
        match self.section("personalDetails")?.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Raw `aiFeedback.rating` value, whatever its JSON type.
    pub fn rating(&self) -> Option<&Value> {
        self.section("aiFeedback")
            .and_then(|feedback| feedback.get("rating"))
    }
}

impl From<Map<String, Value>> for AnalysisPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A persisted analysis. Never updated once stored.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRecord {
    pub id: i32,
    pub filename: String,
    pub created_at: DateTime<Utc>,
    pub analysis: AnalysisPayload,
}
