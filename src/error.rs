//! Unified error types for calltrace.
//!
//! Errors here only come from setting up or tearing down a session. A
//! wrapped function's own failure is never an `Error`: it is recorded and
//! turned into the configured fallback.

use calltrace_storage::StorageError;
use thiserror::Error;

/// All calltrace errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Log store could not be opened, written or closed
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O error outside the store itself
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Session options are incomplete or inconsistent
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for calltrace operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if the session was already closed.
    pub fn is_closed(&self) -> bool {
        matches!(self, Error::Storage(e) if e.is_closed())
    }

    /// Check if this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}
