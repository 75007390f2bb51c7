// Resume Analysis Pipeline
// Implements: PDF text extraction, prompt construction, response validation,
// persistence and the HTTP handlers that drive a run.
// All inference goes through llm_client::InferenceProvider; no direct API calls here.

pub mod extract;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod repository;
pub mod validation;
