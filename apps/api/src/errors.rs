use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::pipeline::PipelineError;
use crate::analysis::repository::RepositoryError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// 5xx variants are logged in full and answered with a fixed, low-detail message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Analysis failed: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("{message}: {source}")]
    Storage {
        message: &'static str,
        #[source]
        source: RepositoryError,
    },
}

impl AppError {
    /// Maps a read-path repository error; unknown ids become 404, everything else 500.
    pub fn from_repository(message: &'static str, err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => AppError::NotFound("Resume not found.".to_string()),
            source => AppError::Storage { message, source },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Input(msg) => (StatusCode::BAD_REQUEST, "INPUT_ERROR", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Pipeline(e) => {
                let stage = e
                    .stage()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "none".to_string());
                tracing::error!(%stage, "Error processing resume: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ANALYSIS_FAILED",
                    "Failed to analyze resume.".to_string(),
                )
            }
            AppError::Storage { message, source } => {
                tracing::error!("{message} {source}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    message.to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "code": code
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::extract::ExtractionError;
    use crate::llm_client::LlmError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_input_error_is_400_with_message() {
        let response = AppError::Input("No file uploaded.".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "No file uploaded.");
        assert_eq!(body["code"], "INPUT_ERROR");
    }

    #[tokio::test]
    async fn test_every_pipeline_stage_maps_to_the_same_generic_500() {
        let errors = [
            PipelineError::Extraction(ExtractionError::BadHeader),
            PipelineError::Inference(LlmError::EmptyContent),
            PipelineError::Persistence(RepositoryError::Database(sqlx::Error::PoolTimedOut)),
            PipelineError::Cancelled,
        ];
        for err in errors {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body = body_json(response).await;
            assert_eq!(body["error"], "Failed to analyze resume.");
        }
    }

    #[tokio::test]
    async fn test_internal_detail_is_not_leaked() {
        let err = PipelineError::Inference(LlmError::Api {
            status: 401,
            message: "invalid x-api-key sk-secret".to_string(),
        });
        let body = body_json(AppError::from(err).into_response()).await;
        assert!(!body.to_string().contains("sk-secret"));
    }

    #[tokio::test]
    async fn test_repository_not_found_maps_to_404() {
        let err = AppError::from_repository(
            "Failed to fetch resume details.",
            RepositoryError::NotFound(7),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Resume not found.");
    }

    #[tokio::test]
    async fn test_repository_failure_maps_to_500_with_endpoint_message() {
        let err = AppError::from_repository(
            "Failed to fetch resume history.",
            RepositoryError::Database(sqlx::Error::PoolTimedOut),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Failed to fetch resume history.");
    }
}
