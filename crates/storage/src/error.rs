//! Storage errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors from opening, writing or reading the log store
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// Error reported by SQLite
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Filesystem error around the store file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The sink was closed before the operation
    #[error("log sink is closed: {}", path.display())]
    Closed {
        /// Store file of the closed sink
        path: PathBuf,
    },

    /// A stored row carries a level this version does not recognize
    #[error("invalid level in store: {0}")]
    InvalidLevel(String),

    /// The store's schema cannot be used
    #[error("schema error: {0}")]
    Schema(String),
}

impl StorageError {
    /// Check if this error means the sink was closed
    pub fn is_closed(&self) -> bool {
        matches!(self, StorageError::Closed { .. })
    }
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;
