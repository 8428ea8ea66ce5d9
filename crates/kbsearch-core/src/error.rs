use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to extract text from {path}: {reason}")]
    Extraction { path: String, reason: String },

    #[error("Embedding failed: {0}")]
    Embedding(#[source] BoxError),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}

impl Error {
    /// Wrap a provider failure (typically an `anyhow::Error`).
    pub fn embedding<E: Into<BoxError>>(err: E) -> Self {
        Self::Embedding(err.into())
    }

    pub fn extraction(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Extraction { path: path.into(), reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
