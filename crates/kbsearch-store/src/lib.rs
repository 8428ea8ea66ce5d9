//! Document store orchestration: corpus ownership, batch ingestion and the
//! health / ingest / query facade.

pub mod ingest;
pub mod service;
pub mod store;

pub use ingest::{ingest_files, IngestReport};
pub use service::{KnowledgeBase, NO_RESULTS_ANSWER};
pub use store::{CorpusCounts, DocumentStore};
