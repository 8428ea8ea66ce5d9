//! Embedding providers: the BGE-M3 candle model and a deterministic fake.

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use kbsearch_core::config::{expand_path, EmbeddingSettings};
use kbsearch_core::traits::Embedder;

pub mod device;
pub mod fake;
pub mod model;
pub mod pool;
pub mod tokenize;

pub use device::select_device;
pub use fake::FakeEmbedder;
pub use model::BgeM3Embedder;
pub use pool::masked_mean_l2;

/// `APP_USE_FAKE_EMBEDDINGS=1` (or `true`) forces the fake embedder.
pub fn fake_requested() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

pub fn get_default_embedder(settings: &EmbeddingSettings) -> Result<Box<dyn Embedder>> {
    if settings.use_fake || fake_requested() {
        info!(dim = settings.fake_dim, "using FakeEmbedder");
        return Ok(Box::new(FakeEmbedder::new(settings.fake_dim)));
    }
    let model_dir = resolve_model_dir(settings.model_dir.as_deref())?;
    Ok(Box::new(BgeM3Embedder::new(&model_dir, settings.max_len, settings.batch_size)?))
}

fn resolve_model_dir(configured: Option<&str>) -> Result<PathBuf> {
    if let Some(dir) = configured {
        let p = expand_path(dir);
        if p.exists() { info!(path = %p.display(), "using configured model dir"); return Ok(p); }
        return Err(anyhow!("Configured model directory {} does not exist", p.display()));
    }
    if let Ok(dir) = std::env::var("APP_MODEL_DIR") { let p = PathBuf::from(&dir); if p.exists() { info!(path = %p.display(), "using APP_MODEL_DIR"); return Ok(p); } }
    if let Ok(dir) = std::env::var("MODEL_DIR") { let p = PathBuf::from(&dir); if p.exists() { info!(path = %p.display(), "using MODEL_DIR"); return Ok(p); } }
    let root = Path::new("../models/bge-m3"); if root.exists() { info!(path = %root.display(), "using model dir"); return Ok(root.to_path_buf()); }
    let legacy = Path::new("models/bge-m3"); if legacy.exists() { info!(path = %legacy.display(), "using legacy model dir"); return Ok(legacy.to_path_buf()); }
    Err(anyhow!("Could not locate BGE-M3 model directory"))
}
