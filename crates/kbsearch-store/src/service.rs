use std::sync::Arc;

use kbsearch_core::chunker::ChunkingConfig;
use kbsearch_core::config::{AppConfig, SearchSettings};
use kbsearch_core::error::{Error, Result};
use kbsearch_core::extract::FileExtractor;
use kbsearch_core::schema::{HealthStatus, IngestRequest, IngestResponse, QueryRequest, QueryResponse};
use kbsearch_core::traits::{Embedder, TextExtractor};
use kbsearch_core::types::SearchResults;

use crate::ingest::ingest_files;
use crate::store::DocumentStore;

pub const NO_RESULTS_ANSWER: &str = "No documents indexed yet or no relevant results found.";
const ANSWER_PREFIX: &str = "Using indexed docs, a succinct answer might be: ";

/// Health / ingest / query operations over one shared store.
pub struct KnowledgeBase {
    store: Arc<DocumentStore>,
    extractor: Box<dyn TextExtractor>,
    chunking: ChunkingConfig,
    search: SearchSettings,
}

impl KnowledgeBase {
    pub fn new(store: Arc<DocumentStore>, settings: &AppConfig) -> Self {
        Self {
            store,
            extractor: Box::new(FileExtractor::new()),
            chunking: settings.chunking,
            search: settings.search.clone(),
        }
    }

    /// Build the store for `embedder` with the configured index backend.
    pub fn from_settings(embedder: Arc<dyn Embedder>, settings: &AppConfig) -> Result<Self> {
        let store = DocumentStore::new(embedder, settings.index.backend)?;
        Ok(Self::new(Arc::new(store), settings))
    }

    pub fn with_extractor(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus { status: "ok".to_string(), chunks: self.store.len(), index: self.store.index_kind() }
    }

    pub fn ingest(&self, req: &IngestRequest) -> Result<IngestResponse> {
        if req.file_paths.is_empty() {
            return Err(Error::InvalidInput("file_paths is required".into()));
        }
        let report = ingest_files(&req.file_paths, self.extractor.as_ref(), &self.store, &self.chunking)?;
        Ok(IngestResponse { ingested_documents: report.chunks_added, sources: report.sources })
    }

    pub fn query(&self, req: &QueryRequest) -> Result<QueryResponse> {
        if req.question.trim().is_empty() {
            return Err(Error::InvalidInput("question is required".into()));
        }
        let top_k = req.top_k.filter(|&k| k > 0).unwrap_or(self.search.default_top_k);
        let results = self.store.search(&req.question, top_k)?;
        if results.is_empty() {
            return Ok(QueryResponse { answer: NO_RESULTS_ANSWER.to_string(), sources: Vec::new() });
        }
        Ok(QueryResponse {
            answer: preview_answer(&results, self.search.answer_preview_chars),
            sources: results.sources(),
        })
    }
}

/// Placeholder synthesis: the retrieved context, truncated.
fn preview_answer(results: &SearchResults, max_chars: usize) -> String {
    let context = results.texts.join("\n\n");
    let preview: String = context.chars().take(max_chars).collect();
    format!("{ANSWER_PREFIX}{preview}")
}
