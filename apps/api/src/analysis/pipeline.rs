//! Analysis pipeline: orchestrates one run per uploaded document.
//!
//! Flow: extract → build prompt → infer → validate → conform → store.
//!
//! The first failing stage ends the run, so nothing is persisted unless every stage
//! succeeded. There is no retry and no resumption: callers resubmit the document.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::analysis::extract::{DocumentExtractor, ExtractionError};
use crate::analysis::models::{AnalysisRecord, ResumeDocument};
use crate::analysis::prompts::build_analysis_prompt;
use crate::analysis::repository::{Repository, RepositoryError};
use crate::analysis::validation::{
    check_conformance, validate_response, ConformanceError, ValidationError,
};
use crate::llm_client::{InferenceProvider, LlmError};

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Prompt,
    Infer,
    Validate,
    Conform,
    Store,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Extract => "extract",
            Stage::Prompt => "prompt",
            Stage::Infer => "infer",
            Stage::Validate => "validate",
            Stage::Conform => "conform",
            Stage::Store => "store",
        };
        f.write_str(name)
    }
}

/// Why a run ended without a record. Each variant is tagged with the stage that failed.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("inference failed: {0}")]
    Inference(#[from] LlmError),

    #[error("response validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("conformance check failed: {0}")]
    Conformance(#[from] ConformanceError),

    #[error("persistence failed: {0}")]
    Persistence(#[from] RepositoryError),

    #[error("pipeline run was cancelled")]
    Cancelled,

    #[error("pipeline run panicked: {0}")]
    Panicked(String),
}

impl PipelineError {
    /// The stage that failed. `None` when the run was stopped from outside.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Extraction(_) => Some(Stage::Extract),
            PipelineError::Inference(_) => Some(Stage::Infer),
            PipelineError::Validation(_) => Some(Stage::Validate),
            PipelineError::Conformance(_) => Some(Stage::Conform),
            PipelineError::Persistence(_) => Some(Stage::Store),
            PipelineError::Cancelled | PipelineError::Panicked(_) => None,
        }
    }
}

/// The composed pipeline. Cheap to clone; every collaborator is shared behind an `Arc`.
#[derive(Clone)]
pub struct AnalysisPipeline {
    extractor: Arc<dyn DocumentExtractor>,
    inference: Arc<dyn InferenceProvider>,
    repository: Arc<dyn Repository>,
}

impl AnalysisPipeline {
    pub fn new(
        extractor: Arc<dyn DocumentExtractor>,
        inference: Arc<dyn InferenceProvider>,
        repository: Arc<dyn Repository>,
    ) -> Self {
        Self {
            extractor,
            inference,
            repository,
        }
    }

    /// Runs every stage for one document on the current task.
    pub async fn run(&self, document: ResumeDocument) -> Result<AnalysisRecord, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("analysis_run", %run_id, filename = %document.filename);

        async move {
            let result = self.run_stages(document).await;
            if let Err(e) = &result {
                match e.stage() {
                    Some(stage) => error!(%stage, "Analysis run failed: {e}"),
                    None => error!("Analysis run stopped: {e}"),
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Starts a run on its own task. The run keeps going if the caller goes away;
    /// only `PipelineHandle::abort` stops it.
    pub fn spawn(&self, document: ResumeDocument) -> PipelineHandle {
        let pipeline = self.clone();
        PipelineHandle {
            task: tokio::spawn(async move { pipeline.run(document).await }),
        }
    }

    async fn run_stages(&self, document: ResumeDocument) -> Result<AnalysisRecord, PipelineError> {
        info!(
            bytes = document.bytes.len(),
            content_type = document.content_type.as_deref().unwrap_or("unknown"),
            "Received document"
        );

        let text = self.extractor.extract(document.bytes).await?;
        info!(stage = %Stage::Extract, chars = text.chars().count(), "Extracted text");

        let prompt = build_analysis_prompt(&text);
        debug!(stage = %Stage::Prompt, prompt_chars = prompt.len(), "Built prompt");

        let raw = self.inference.infer(&prompt).await?;
        info!(stage = %Stage::Infer, response_chars = raw.len(), "Inference returned");

        let analysis = validate_response(&raw)?;
        if analysis.is_empty() {
            warn!(stage = %Stage::Validate, "Model returned an empty object; persisting as-is");
        }
        debug!(stage = %Stage::Validate, keys = analysis.len(), "Response parsed");
        check_conformance(&analysis)?;
        debug!(stage = %Stage::Conform, "Rating within range");

        let record = self.repository.store(&document.filename, &analysis).await?;
        info!(stage = %Stage::Store, id = record.id, "Analysis persisted");

        Ok(record)
    }
}

/// Handle to a spawned run. Dropping it detaches the run.
pub struct PipelineHandle {
    task: JoinHandle<Result<AnalysisRecord, PipelineError>>,
}

impl PipelineHandle {
    /// Cancels the run at its next await point.
    pub fn abort(&self) {
        self.task.abort();
    }

    pub async fn join(self) -> Result<AnalysisRecord, PipelineError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(PipelineError::Cancelled),
            Err(e) => Err(PipelineError::Panicked(e.to_string())),
        }
    }
}
