//! Exact inner-product vector indices.
//!
//! Two interchangeable strategies share one ranking routine
//! (`rank::top_k`): the tensor-backed flat index (`accelerate` feature) and
//! the linear-scan fallback. `build_index` picks one at construction time.

use kbsearch_core::error::{Error, Result};

#[cfg(feature = "accelerate")]
pub mod flat;
pub mod linear;
pub mod rank;
pub mod select;

#[cfg(feature = "accelerate")]
pub use flat::TensorFlatIndex;
pub use linear::LinearIndex;
pub use select::build_index;

/// Every vector must have exactly `dim` components.
pub(crate) fn check_dims<V: AsRef<[f32]>>(vectors: &[V], dim: usize) -> Result<()> {
    match vectors.iter().map(|v| v.as_ref().len()).find(|&len| len != dim) {
        Some(actual) => Err(Error::DimensionMismatch { expected: dim, actual }),
        None => Ok(()),
    }
}
