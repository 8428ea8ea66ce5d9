pub mod chunker;
pub mod config;
pub mod error;
pub mod extract;
pub mod schema;
pub mod traits;
pub mod types;

pub use chunker::{chunk_document, chunk_text, ChunkingConfig};
pub use error::{Error, Result};
pub use traits::{Embedder, TextExtractor, VectorIndex};
pub use types::{Chunk, ChunkId, IndexKind, Meta, SearchHit, SearchResults};
