use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::analysis::models::{AnalysisPayload, AnalysisRecord};
use crate::models::resume::{ResumeRow, ResumeSummary};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Resume {0} not found")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Storage for analysed resumes. Insert-only: there is no update or delete.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Persists one analysis in a single atomic insert and returns the stored record.
    async fn store(
        &self,
        filename: &str,
        analysis: &AnalysisPayload,
    ) -> Result<AnalysisRecord, RepositoryError>;

    /// All records, newest first. Recomputed on every call.
    async fn list_summaries(&self) -> Result<Vec<ResumeSummary>, RepositoryError>;

    async fn get_by_id(&self, id: i32) -> Result<AnalysisPayload, RepositoryError>;
}

/// PostgreSQL-backed repository over the `resumes` table.
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn store(
        &self,
        filename: &str,
        analysis: &AnalysisPayload,
    ) -> Result<AnalysisRecord, RepositoryError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes (filename, analysis)
            VALUES ($1, $2)
            RETURNING id, filename, analysis, created_at
            "#,
        )
        .bind(filename)
        .bind(Json(analysis))
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted resume {} ({})", row.id, row.filename);
        Ok(row.into())
    }

    async fn list_summaries(&self) -> Result<Vec<ResumeSummary>, RepositoryError> {
        // id breaks created_at ties so the latest insert is always first
        Ok(sqlx::query_as::<_, ResumeSummary>(
            r#"
            SELECT id, filename, created_at,
                   analysis->'personalDetails'->>'name' AS name,
                   analysis->'personalDetails'->>'email' AS email
            FROM resumes
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_by_id(&self, id: i32) -> Result<AnalysisPayload, RepositoryError> {
        let analysis: Option<Json<AnalysisPayload>> =
            sqlx::query_scalar("SELECT analysis FROM resumes WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        analysis
            .map(|Json(analysis)| analysis)
            .ok_or(RepositoryError::NotFound(id))
    }
}
