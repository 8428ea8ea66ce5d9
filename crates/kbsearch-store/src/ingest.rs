use std::path::{Path, PathBuf};

use tracing::{info, warn};

use kbsearch_core::chunker::{chunk_document, ChunkingConfig};
use kbsearch_core::error::Result;
use kbsearch_core::schema::{SourceOutcome, SourceReport};
use kbsearch_core::traits::TextExtractor;

use crate::store::DocumentStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub sources: Vec<SourceReport>,
    pub chunks_added: usize,
}

/// Canonical path when the file exists, otherwise the path made absolute.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(p) = path.canonicalize() {
        return p;
    }
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir().map(|cwd| cwd.join(path)).unwrap_or_else(|_| path.to_path_buf())
}

/// Extract, chunk and index every file in `paths`.
///
/// A source that cannot be read is recorded as failed and skipped. All chunks
/// of the batch go into the store with a single `add_texts` call, so an
/// embedding failure leaves the corpus as it was.
pub fn ingest_files<P: AsRef<Path>>(
    paths: &[P],
    extractor: &dyn TextExtractor,
    store: &DocumentStore,
    chunking: &ChunkingConfig,
) -> Result<IngestReport> {
    let mut sources = Vec::with_capacity(paths.len());
    let mut chunks = Vec::new();
    for path in paths {
        let resolved = resolve(path.as_ref());
        let source = resolved.to_string_lossy().into_owned();
        let outcome = match extractor.extract(&resolved) {
            Ok(text) => {
                let doc_chunks = chunk_document(&text, &source, chunking);
                let n = doc_chunks.len();
                chunks.extend(doc_chunks);
                SourceOutcome::Chunked { chunks: n }
            }
            Err(e) => {
                warn!(source = %source, error = %e, "skipping source");
                SourceOutcome::Failed { reason: e.to_string() }
            }
        };
        sources.push(SourceReport { source, outcome });
    }

    let chunks_added = store.add_chunks(chunks)?;
    info!(sources = sources.len(), chunks_added, "ingest complete");
    Ok(IngestReport { sources, chunks_added })
}
