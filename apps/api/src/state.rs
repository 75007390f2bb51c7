use std::sync::Arc;

use crate::analysis::pipeline::AnalysisPipeline;
use crate::analysis::repository::Repository;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once in `main`; handlers only ever read it.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: AnalysisPipeline,
    /// Same repository the pipeline writes to, used directly by the read endpoints.
    pub repository: Arc<dyn Repository>,
}
