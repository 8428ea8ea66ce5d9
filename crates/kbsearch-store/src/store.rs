use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use kbsearch_core::config::IndexBackend;
use kbsearch_core::error::{Error, Result};
use kbsearch_core::traits::{Embedder, VectorIndex};
use kbsearch_core::types::{Chunk, IndexKind, Meta, SearchResults};
use kbsearch_vector::build_index;

/// Parallel corpus arrays plus the index holding vector `i` for chunk `i`.
struct Corpus {
    texts: Vec<String>,
    metadatas: Vec<Meta>,
    index: Box<dyn VectorIndex>,
}

/// Lengths of the three corpus sequences, read under one lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusCounts {
    pub texts: usize,
    pub metadatas: usize,
    pub vectors: usize,
}

impl CorpusCounts {
    pub fn is_consistent(&self) -> bool {
        self.texts == self.metadatas && self.metadatas == self.vectors
    }
}

/// In-memory semantic store: owns the corpus, the vector index and the
/// embedder handle.
///
/// Embedding runs outside the lock. Appending vectors, texts and metadata
/// happens under one write lock, so readers never see the three sequences
/// disagree. Searches share the read lock.
pub struct DocumentStore {
    embedder: Arc<dyn Embedder>,
    corpus: RwLock<Corpus>,
}

impl DocumentStore {
    pub fn new(embedder: Arc<dyn Embedder>, backend: IndexBackend) -> Result<Self> {
        let index = build_index(embedder.dim(), backend)?;
        Self::with_index(embedder, index)
    }

    /// Use a caller-built index; it must be empty and match the embedder's dimension.
    pub fn with_index(embedder: Arc<dyn Embedder>, index: Box<dyn VectorIndex>) -> Result<Self> {
        if index.dim() != embedder.dim() {
            return Err(Error::DimensionMismatch { expected: embedder.dim(), actual: index.dim() });
        }
        if !index.is_empty() {
            return Err(Error::InvalidInput("index must be empty when the store is created".into()));
        }
        info!(dim = embedder.dim(), index = %index.kind(), "document store ready");
        Ok(Self {
            embedder,
            corpus: RwLock::new(Corpus { texts: Vec::new(), metadatas: Vec::new(), index }),
        })
    }

    pub fn dim(&self) -> usize {
        self.embedder.dim()
    }

    pub fn index_kind(&self) -> IndexKind {
        self.corpus.read().index.kind()
    }

    pub fn len(&self) -> usize {
        self.corpus.read().texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn counts(&self) -> CorpusCounts {
        let corpus = self.corpus.read();
        CorpusCounts { texts: corpus.texts.len(), metadatas: corpus.metadatas.len(), vectors: corpus.index.len() }
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let vectors = self.embedder.embed_batch(texts).map_err(Error::embedding)?;
        if vectors.len() != texts.len() {
            return Err(Error::embedding(format!(
                "embedder returned {} vectors for {} texts",
                vectors.len(),
                texts.len()
            )));
        }
        let dim = self.dim();
        if let Some(v) = vectors.iter().find(|v| v.len() != dim) {
            return Err(Error::DimensionMismatch { expected: dim, actual: v.len() });
        }
        Ok(vectors)
    }

    /// Embed `texts` in one batch and append them to the corpus.
    ///
    /// Missing metadata becomes one empty map per text. Returns the number of
    /// texts added; on error nothing is added.
    pub fn add_texts(&self, texts: Vec<String>, metadatas: Option<Vec<Meta>>) -> Result<usize> {
        if texts.is_empty() {
            return Ok(0);
        }
        let metadatas = match metadatas {
            Some(m) if m.len() != texts.len() => {
                return Err(Error::InvalidInput(format!("{} metadata entries for {} texts", m.len(), texts.len())));
            }
            Some(m) => m,
            None => vec![Meta::new(); texts.len()],
        };
        let vectors = self.embed(&texts)?;

        let added = texts.len();
        let mut corpus = self.corpus.write();
        corpus.index.add(&vectors)?;
        corpus.texts.extend(texts);
        corpus.metadatas.extend(metadatas);
        debug_assert_eq!(corpus.texts.len(), corpus.index.len());
        info!(added, total = corpus.texts.len(), "added texts");
        Ok(added)
    }

    pub fn add_chunks(&self, chunks: Vec<Chunk>) -> Result<usize> {
        let metadatas = chunks.iter().map(Chunk::meta).collect();
        let texts = chunks.into_iter().map(|c| c.text).collect();
        self.add_texts(texts, Some(metadatas))
    }

    /// Up to `top_k` passages ranked by similarity to `query`.
    ///
    /// An empty query, `top_k == 0` or an empty corpus yields an empty result
    /// without calling the embedder.
    pub fn search(&self, query: &str, top_k: usize) -> Result<SearchResults> {
        if query.is_empty() || top_k == 0 || self.is_empty() {
            return Ok(SearchResults::empty());
        }
        let query_vec = self
            .embed(&[query.to_string()])?
            .pop()
            .ok_or_else(|| Error::embedding("embedder returned no vector for the query"))?;

        let corpus = self.corpus.read();
        let k = top_k.min(corpus.texts.len());
        let hits = corpus.index.search(&query_vec, k)?;
        let mut results = SearchResults::with_capacity(hits.len());
        for hit in hits {
            let (Some(text), Some(meta)) = (corpus.texts.get(hit.id), corpus.metadatas.get(hit.id)) else {
                return Err(Error::Operation(format!("index returned unknown id {}", hit.id)));
            };
            results.push(text.clone(), hit.score, meta.clone());
        }
        debug!(query, top_k, hits = results.len(), "search");
        Ok(results)
    }
}
