use tracing::{info, warn};

use kbsearch_core::config::IndexBackend;
use kbsearch_core::error::{Error, Result};
use kbsearch_core::traits::VectorIndex;

use crate::linear::LinearIndex;

/// Build the index strategy for `backend`.
///
/// `Auto` degrades to the linear scan when the accelerated index cannot be
/// constructed; `Accelerated` reports `IndexUnavailable` instead.
pub fn build_index(dim: usize, backend: IndexBackend) -> Result<Box<dyn VectorIndex>> {
    match backend {
        IndexBackend::Linear => Ok(Box::new(LinearIndex::new(dim)?)),
        IndexBackend::Accelerated => accelerated(dim),
        IndexBackend::Auto => match accelerated(dim) {
            Ok(index) => Ok(index),
            Err(Error::IndexUnavailable(reason)) => {
                warn!(%reason, "accelerated index unavailable, falling back to linear scan");
                Ok(Box::new(LinearIndex::new(dim)?))
            }
            Err(e) => Err(e),
        },
    }
}

#[cfg(feature = "accelerate")]
fn accelerated(dim: usize) -> Result<Box<dyn VectorIndex>> {
    let index = crate::flat::TensorFlatIndex::new(dim)?;
    info!(dim, "using accelerated flat index");
    Ok(Box::new(index))
}

#[cfg(not(feature = "accelerate"))]
fn accelerated(_dim: usize) -> Result<Box<dyn VectorIndex>> {
    info!("built without the `accelerate` feature");
    Err(Error::IndexUnavailable("accelerated index not compiled in".into()))
}
