//! Fixed-size, overlapping character windows.
//!
//! Sizes and offsets count Unicode scalar values, so a window never splits a
//! multi-byte sequence.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Chunk;

pub const DEFAULT_CHUNK_SIZE: usize = 800;
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { size: DEFAULT_CHUNK_SIZE, overlap: DEFAULT_CHUNK_OVERLAP }
    }
}

impl ChunkingConfig {
    pub fn new(size: usize, overlap: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidConfig("chunk size must be greater than zero".into()));
        }
        Ok(Self { size, overlap })
    }

    pub fn chunk(&self, text: &str) -> Vec<String> {
        chunk_text(text, self.size, self.overlap)
    }
}

/// Split `text` into windows of `size` characters, each starting `overlap`
/// characters before the end of the previous one.
///
/// The last window ends at the end of `text` and may be shorter than `size`.
/// An overlap of `size` or more is clamped to `size - 1` so every window ends
/// strictly after the previous one.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let size = size.max(1);
    let overlap = overlap.min(size - 1);

    // Byte offset of every char start, plus the end of the string.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let n = bounds.len() - 1;

    let mut chunks = Vec::new();
    let mut start = 0usize;
    loop {
        let end = (start + size).min(n);
        chunks.push(text[bounds[start]..bounds[end]].to_string());
        if end == n {
            break;
        }
        start = end.saturating_sub(overlap);
    }
    chunks
}

/// Chunk one document and tag every window with its source.
pub fn chunk_document(text: &str, source: &str, config: &ChunkingConfig) -> Vec<Chunk> {
    config
        .chunk(text)
        .into_iter()
        .map(|text| Chunk { text, source: source.to_string() })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_advance_by_size_minus_overlap() {
        let chunks = chunk_text("abcdefghij", 4, 1);
        assert_eq!(chunks, vec!["abcd", "defg", "ghij"]);
    }

    #[test]
    fn last_window_may_be_short() {
        let chunks = chunk_text("abcdefgh", 5, 2);
        assert_eq!(chunks, vec!["abcde", "defgh"]);
        let chunks = chunk_text("abcdefghi", 5, 2);
        assert_eq!(chunks, vec!["abcde", "defgh", "ghi"]);
    }

    #[test]
    fn multibyte_text_is_split_on_char_boundaries() {
        let chunks = chunk_text("ééééé", 2, 0);
        assert_eq!(chunks, vec!["éé", "éé", "é"]);
    }

    #[test]
    fn zero_size_is_treated_as_one() {
        assert_eq!(chunk_text("abc", 0, 0), vec!["a", "b", "c"]);
    }

    #[test]
    fn config_rejects_zero_size() {
        assert!(ChunkingConfig::new(0, 0).is_err());
        assert_eq!(ChunkingConfig::new(10, 2).map(|c| c.size).ok(), Some(10));
    }
}
