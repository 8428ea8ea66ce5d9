//! Raw text extraction for ingestible files.
//!
//! `.txt` and `.md` are read directly; `.pdf` needs the `pdf` feature.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::TextExtractor;

#[cfg(feature = "pdf")]
const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md", "pdf"];
#[cfg(not(feature = "pdf"))]
const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md"];

#[derive(Debug, Default, Clone, Copy)]
pub struct FileExtractor;

impl FileExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn supports(path: &Path) -> bool {
        extension_of(path).is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
    }

    fn read_plain(path: &Path) -> Result<String> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(content),
            Err(_) => {
                let bytes = fs::read(path).map_err(|e| Error::extraction(path.display().to_string(), e.to_string()))?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
    }

    #[cfg(feature = "pdf")]
    fn read_pdf(path: &Path) -> Result<String> {
        pdf_extract::extract_text(path).map_err(|e| Error::extraction(path.display().to_string(), e.to_string()))
    }
}

impl TextExtractor for FileExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(Error::extraction(path.display().to_string(), "file not found"));
        }
        let text = match extension_of(path).as_deref() {
            Some("txt") | Some("md") => Self::read_plain(path)?,
            #[cfg(feature = "pdf")]
            Some("pdf") => Self::read_pdf(path)?,
            other => {
                let reason = format!("unsupported format: {}", other.unwrap_or("<none>"));
                return Err(Error::extraction(path.display().to_string(), reason));
            }
        };
        debug!(path = %path.display(), chars = text.chars().count(), "extracted text");
        Ok(text)
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().and_then(|s| s.to_str()).map(str::to_ascii_lowercase)
}

/// Supported files under `root`, sorted. A file path is returned as-is.
pub fn collect_files(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && FileExtractor::supports(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}
