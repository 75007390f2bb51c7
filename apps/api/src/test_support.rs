//! In-memory stand-ins for the pipeline's collaborators, shared by unit and router tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use serde_json::json;

use crate::analysis::extract::{DocumentExtractor, ExtractionError};
use crate::analysis::models::{AnalysisPayload, AnalysisRecord};
use crate::analysis::repository::{Repository, RepositoryError};
use crate::llm_client::{InferenceProvider, LlmError};
use crate::models::resume::ResumeSummary;

/// The model output used throughout the tests: Jane Doe, rated 8.
pub fn jane_response() -> String {
    json!({
        "personalDetails": {
            "name": "Jane Doe",
            "email": "jane@example.com",
            "phone": "+1 555 0100",
            "links": ["https://github.com/janedoe"]
        },
        "content": {
            "summary": "Backend engineer with seven years of Rust and Go.",
            "experience": [{
                "jobTitle": "Senior Engineer",
                "company": "Acme",
                "duration": "2019 - 2024",
                "responsibilities": ["Led the billing rewrite", "Cut p99 latency by 40%"]
            }],
            "education": [{"degree": "BSc Computer Science", "institution": "State University", "year": "2017"}],
            "projects": [{"name": "tinykv", "description": "Embedded KV store", "technologies": ["Rust"]}]
        },
        "skills": {"technical": ["Rust", "PostgreSQL"], "soft": ["Mentoring"]},
        "aiFeedback": {
            "rating": 8,
            "summary": "Strong candidate",
            "improvements": ["Quantify more outcomes"],
            "upskilling": ["Kubernetes"]
        }
    })
    .to_string()
}

pub fn jane_analysis() -> AnalysisPayload {
    serde_json::from_str(&jane_response()).unwrap()
}

/// Extractor that ignores the bytes and returns canned text.
pub struct FixedExtractor(String);

impl FixedExtractor {
    pub fn text(text: &str) -> Self {
        Self(text.to_string())
    }
}

#[async_trait]
impl DocumentExtractor for FixedExtractor {
    async fn extract(&self, _bytes: Bytes) -> Result<String, ExtractionError> {
        Ok(self.0.clone())
    }
}

pub enum Script {
    Reply(String),
    Fail(u16),
    /// Never returns, for cancellation tests.
    Hang,
}

/// Inference provider that follows a script and records every prompt it receives.
pub struct ScriptedProvider {
    script: Script,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceProvider for ScriptedProvider {
    async fn infer(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Reply(text) => Ok(text.clone()),
            Script::Fail(status) => Err(LlmError::Api {
                status: *status,
                message: "scripted failure".to_string(),
            }),
            Script::Hang => std::future::pending().await,
        }
    }
}

/// Vec-backed repository with the same ordering and id rules as the SQL one.
#[derive(Default)]
pub struct MemoryRepository {
    records: Mutex<Vec<AnalysisRecord>>,
    unavailable: bool,
}

impl MemoryRepository {
    /// A repository whose every call fails like a dead connection pool.
    pub fn unavailable() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            unavailable: true,
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable {
            Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn store(
        &self,
        filename: &str,
        analysis: &AnalysisPayload,
    ) -> Result<AnalysisRecord, RepositoryError> {
        self.check_available()?;
        let mut records = self.records.lock().unwrap();
        let record = AnalysisRecord {
            id: records.last().map_or(1, |r| r.id + 1),
            filename: filename.to_string(),
            created_at: Utc::now(),
            analysis: analysis.clone(),
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn list_summaries(&self) -> Result<Vec<ResumeSummary>, RepositoryError> {
        self.check_available()?;
        let records = self.records.lock().unwrap();
        let mut summaries: Vec<ResumeSummary> = records.iter().map(ResumeSummary::from).collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(summaries)
    }

    async fn get_by_id(&self, id: i32) -> Result<AnalysisPayload, RepositoryError> {
        self.check_available()?;
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.analysis.clone())
            .ok_or(RepositoryError::NotFound(id))
    }
}
