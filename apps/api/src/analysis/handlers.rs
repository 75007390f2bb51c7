//! Axum route handlers for the resume analysis API.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::PathRejection,
        Multipart, Path, State,
    },
    http::StatusCode,
    Json,
};
use tracing::{debug, info};

use crate::analysis::models::{AnalysisPayload, ResumeDocument, MAX_UPLOAD_BYTES};
use crate::errors::AppError;
use crate::models::resume::ResumeSummary;
use crate::state::AppState;

/// Multipart field that carries the resume.
pub const UPLOAD_FIELD: &str = "resume";
/// Longest filename the `resumes.filename` column accepts.
const MAX_FILENAME_CHARS: usize = 255;

/// POST /upload
///
/// Runs the full analysis pipeline on the uploaded PDF and returns the stored analysis.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<AnalysisPayload>), AppError> {
    // A request that is not multipart at all carries no file either.
    let mut multipart = multipart.map_err(|e| {
        debug!("Upload is not a multipart form: {}", e.body_text());
        no_file()
    })?;
    let document = read_resume_field(&mut multipart).await?.ok_or_else(no_file)?;

    info!(
        "Analysing upload '{}' ({} bytes)",
        document.filename,
        document.bytes.len()
    );

    // Spawned so the run finishes even if the client disconnects mid-request.
    let record = state.pipeline.spawn(document).join().await?;

    Ok((StatusCode::CREATED, Json(record.analysis)))
}

/// GET /resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResumeSummary>>, AppError> {
    let summaries = state
        .repository
        .list_summaries()
        .await
        .map_err(|e| AppError::from_repository("Failed to fetch resume history.", e))?;
    Ok(Json(summaries))
}

/// GET /resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<AnalysisPayload>, AppError> {
    // Ids that do not fit the column type can never have been stored.
    let Path(id) = id.map_err(|e| {
        debug!("Unparsable resume id: {}", e.body_text());
        AppError::NotFound("Resume not found.".to_string())
    })?;
    let analysis = state
        .repository
        .get_by_id(id)
        .await
        .map_err(|e| AppError::from_repository("Failed to fetch resume details.", e))?;
    Ok(Json(analysis))
}

/// Pulls the first `resume` file out of the form. Other fields are skipped.
async fn read_resume_field(multipart: &mut Multipart) -> Result<Option<ResumeDocument>, AppError> {
    let mut document = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if document.is_some() || field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = match field.file_name() {
            Some(name) if !name.trim().is_empty() => truncate_filename(name),
            _ => continue,
        };
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::Input(
                "File too large. Maximum size is 10MB.".to_string(),
            ));
        }

        document = Some(ResumeDocument {
            filename,
            content_type,
            bytes,
        });
    }

    Ok(document)
}

fn no_file() -> AppError {
    AppError::Input("No file uploaded.".to_string())
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::Input(format!("Invalid upload: {}", e.body_text()))
}

fn truncate_filename(name: &str) -> String {
    name.chars().take(MAX_FILENAME_CHARS).collect()
}
