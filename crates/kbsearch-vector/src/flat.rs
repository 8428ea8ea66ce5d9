//! Exact flat index backed by a candle tensor.
//!
//! Vectors live in `[rows, D]` segments on the selected device, in insertion
//! order. A search is one matrix-vector product per segment followed by the
//! shared top-k ranking.
//!
//! Each `add` pushes a new segment, then merges the last two while the older
//! one is not larger. Segment sizes therefore stay strictly decreasing, there
//! are at most `log2(n) + 1` of them, and every vector is copied O(log n)
//! times over the lifetime of the index.

use candle_core::{DType, Device, Tensor};
use tracing::{debug, warn};

use kbsearch_core::error::{Error, Result};
use kbsearch_core::traits::VectorIndex;
use kbsearch_core::types::{IndexKind, SearchHit};

use crate::check_dims;
use crate::rank::top_k;

pub struct TensorFlatIndex {
    dim: usize,
    device: Device,
    segments: Vec<Tensor>,
    len: usize,
}

fn tensor_err(e: candle_core::Error) -> Error {
    Error::Operation(format!("tensor index: {e}"))
}

/// Metal when compiled in and available, CPU otherwise.
pub fn probe_device() -> Device {
    #[cfg(feature = "metal")]
    {
        if let Ok(dev) = Device::new_metal(0) { return dev; }
    }
    Device::Cpu
}

impl TensorFlatIndex {
    pub fn new(dim: usize) -> Result<Self> {
        Self::on_device(dim, probe_device())
    }

    /// Fails with `IndexUnavailable` when the device cannot run a matmul.
    pub fn on_device(dim: usize, device: Device) -> Result<Self> {
        if dim == 0 {
            return Err(Error::InvalidConfig("vector dimension must be greater than zero".into()));
        }
        Tensor::ones((1, 1), DType::F32, &device)
            .and_then(|t| t.matmul(&t))
            .and_then(|t| t.to_vec2::<f32>())
            .map_err(|e| Error::IndexUnavailable(format!("device {:?}: {e}", device.location())))?;
        debug!(dim, device = ?device.location(), "tensor flat index ready");
        Ok(Self { dim, device, segments: Vec::new(), len: 0 })
    }

    /// Merge trailing segments until sizes are strictly decreasing. A failed
    /// merge leaves the segments as they are; search stays correct either way.
    fn compact(&mut self) {
        while let [.., older, newer] = self.segments.as_slice() {
            if older.elem_count() > newer.elem_count() {
                break;
            }
            match Tensor::cat(&[older, newer], 0) {
                Ok(merged) => {
                    self.segments.truncate(self.segments.len() - 2);
                    self.segments.push(merged);
                }
                Err(e) => {
                    warn!(error = %e, segments = self.segments.len(), "segment merge failed");
                    break;
                }
            }
        }
    }
}

impl VectorIndex for TensorFlatIndex {
    fn kind(&self) -> IndexKind { IndexKind::Accelerated }
    fn dim(&self) -> usize { self.dim }
    fn len(&self) -> usize { self.len }

    fn add(&mut self, vectors: &[Vec<f32>]) -> Result<()> {
        check_dims(vectors, self.dim)?;
        if vectors.is_empty() {
            return Ok(());
        }
        let flat: Vec<f32> = vectors.iter().flatten().copied().collect();
        let rows = Tensor::from_vec(flat, (vectors.len(), self.dim), &self.device).map_err(tensor_err)?;
        self.segments.push(rows);
        self.len += vectors.len();
        self.compact();
        Ok(())
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if k == 0 || self.segments.is_empty() {
            return Ok(Vec::new());
        }
        check_dims(std::slice::from_ref(&query), self.dim)?;
        let q = Tensor::from_slice(query, (self.dim, 1), &self.device).map_err(tensor_err)?;
        let mut scores = Vec::with_capacity(self.len);
        for segment in &self.segments {
            let part: Vec<f32> = segment
                .matmul(&q)
                .and_then(|s| s.squeeze(1))
                .and_then(|s| s.to_vec1())
                .map_err(tensor_err)?;
            scores.extend(part);
        }
        Ok(top_k(&scores, k))
    }
}
