use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::analysis::models::{AnalysisPayload, AnalysisRecord};

/// A full row of the `resumes` table.
#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: i32,
    pub filename: String,
    pub analysis: Json<AnalysisPayload>,
    pub created_at: DateTime<Utc>,
}

impl From<ResumeRow> for AnalysisRecord {
    fn from(row: ResumeRow) -> Self {
        AnalysisRecord {
            id: row.id,
            filename: row.filename,
            created_at: row.created_at,
            analysis: row.analysis.0,
        }
    }
}

/// List projection: identity plus the candidate's name and email.
/// `name`/`email` are null when the stored analysis lacks them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ResumeSummary {
    pub id: i32,
    pub filename: String,
    pub created_at: DateTime<Utc>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl From<&AnalysisRecord> for ResumeSummary {
    fn from(record: &AnalysisRecord) -> Self {
        ResumeSummary {
            id: record.id,
            filename: record.filename.clone(),
            created_at: record.created_at,
            name: record.analysis.personal_detail("name"),
            email: record.analysis.personal_detail("email"),
        }
    }
}
