//! Domain types shared by the chunker, the vector indices and the store.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ordinal position of a chunk in the corpus. Stable for the process lifetime.
pub type ChunkId = usize;
pub type Meta = HashMap<String, String>;

/// Metadata key carrying the resolved source identifier of a chunk.
pub const SOURCE_KEY: &str = "source";

/// A bounded substring of an ingested document.
///
/// Only lives between chunking and `DocumentStore::add_texts`; the store keeps
/// `text` in its corpus and `source` inside the chunk's metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub source: String,
}

impl Chunk {
    pub fn meta(&self) -> Meta {
        Meta::from([(SOURCE_KEY.to_string(), self.source.clone())])
    }
}

/// Which vector index strategy is active.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    Accelerated,
    Linear,
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexKind::Accelerated => f.write_str("accelerated"),
            IndexKind::Linear => f.write_str("linear"),
        }
    }
}

/// The minimal surface returned by a vector index.
///
/// `id` is the insertion ordinal of the vector. `score` is the inner product
/// with the query, higher is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: ChunkId,
    pub score: f32,
}

/// Ranked retrieval result as three parallel sequences of equal length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub texts: Vec<String>,
    pub scores: Vec<f32>,
    pub metadatas: Vec<Meta>,
}

impl SearchResults {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            texts: Vec::with_capacity(n),
            scores: Vec::with_capacity(n),
            metadatas: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, text: String, score: f32, meta: Meta) {
        self.texts.push(text);
        self.scores.push(score);
        self.metadatas.push(meta);
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// `(text, score, metadata)` triples in rank order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32, &Meta)> {
        self.texts
            .iter()
            .zip(self.scores.iter())
            .zip(self.metadatas.iter())
            .map(|((t, s), m)| (t.as_str(), *s, m))
    }

    /// Source identifier of every hit, `"unknown"` when the metadata has none.
    pub fn sources(&self) -> Vec<String> {
        self.metadatas
            .iter()
            .map(|m| m.get(SOURCE_KEY).cloned().unwrap_or_else(|| "unknown".to_string()))
            .collect()
    }
}
