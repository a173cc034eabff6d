use std::path::PathBuf;
use thiserror::Error;

/// Result type shared by every store operation.
pub type StoreResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Rejected before touching the collection. Callers answer with a client error.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("IO failure on '{}': {source}", .path.display())]
    IOFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The backing file exists but does not hold a valid collection. The store
    /// never replaces it with an empty one on its own.
    #[error("Corrupt data in '{}': {source}", .path.display())]
    CorruptData {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::IOFailure {
            path: path.into(),
            source,
        }
    }

    pub fn corrupt(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StorageError::CorruptData {
            path: path.into(),
            source,
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, StorageError::InvalidInput(_))
    }
}
