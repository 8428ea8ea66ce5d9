use std::path::Path;

use crate::error::Result;
use crate::types::{IndexKind, SearchHit};

/// Maps text to fixed-dimension, L2-normalized vectors.
pub trait Embedder: Send + Sync {
    /// Embedding dimensionality (D). Known before the first call.
    fn dim(&self) -> usize;
    /// One vector per input, in input order.
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Exact inner-product index over sequentially numbered vectors.
pub trait VectorIndex: Send + Sync {
    fn kind(&self) -> IndexKind;
    fn dim(&self) -> usize;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Append vectors; the first gets id `self.len()` before the call.
    /// Either every vector is added or none is.
    fn add(&mut self, vectors: &[Vec<f32>]) -> Result<()>;
    /// At most `min(k, len)` hits, descending by score, ties by lower id.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>>;
}

/// Produces raw text for a source file.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String>;
}
