//! Request and response shapes of the ingest / query surface.

use serde::{Deserialize, Serialize};

use crate::types::IndexKind;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestRequest {
    /// Absolute or relative file paths to ingest.
    #[serde(default)]
    pub file_paths: Vec<String>,
}

/// What a single source contributed to an ingest batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceOutcome {
    Chunked { chunks: usize },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReport {
    pub source: String,
    #[serde(flatten)]
    pub outcome: SourceOutcome,
}

impl SourceReport {
    pub fn chunk_count(&self) -> usize {
        match self.outcome {
            SourceOutcome::Chunked { chunks } => chunks,
            SourceOutcome::Failed { .. } => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResponse {
    /// Number of chunks added to the corpus.
    pub ingested_documents: usize,
    #[serde(default)]
    pub sources: Vec<SourceReport>,
}

impl IngestResponse {
    /// Sources that contributed nothing because they could not be read.
    pub fn failed(&self) -> impl Iterator<Item = &SourceReport> {
        self.sources.iter().filter(|s| matches!(s.outcome, SourceOutcome::Failed { .. }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub chunks: usize,
    pub index: IndexKind,
}
