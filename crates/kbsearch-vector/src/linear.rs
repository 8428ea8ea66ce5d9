use kbsearch_core::error::{Error, Result};
use kbsearch_core::traits::VectorIndex;
use kbsearch_core::types::{IndexKind, SearchHit};

use crate::check_dims;
use crate::rank::{dot, top_k};

/// Brute-force fallback: every search recomputes the inner product against
/// every stored vector. No setup beyond a `Vec`.
#[derive(Debug, Clone)]
pub struct LinearIndex {
    dim: usize,
    /// Row-major, `len * dim` values.
    data: Vec<f32>,
}

impl LinearIndex {
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(Error::InvalidConfig("vector dimension must be greater than zero".into()));
        }
        Ok(Self { dim, data: Vec::new() })
    }
}

impl VectorIndex for LinearIndex {
    fn kind(&self) -> IndexKind { IndexKind::Linear }
    fn dim(&self) -> usize { self.dim }
    fn len(&self) -> usize { self.data.len() / self.dim }

    fn add(&mut self, vectors: &[Vec<f32>]) -> Result<()> {
        check_dims(vectors, self.dim)?;
        self.data.reserve(vectors.len() * self.dim);
        for v in vectors {
            self.data.extend_from_slice(v);
        }
        Ok(())
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if k == 0 || self.data.is_empty() {
            return Ok(Vec::new());
        }
        check_dims(std::slice::from_ref(&query), self.dim)?;
        let scores: Vec<f32> = self.data.chunks_exact(self.dim).map(|row| dot(row, query)).collect();
        Ok(top_k(&scores, k))
    }
}
