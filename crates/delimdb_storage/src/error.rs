//! Error types for storage operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The requested path does not exist.
    #[error("path not found: {path}")]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// The operation was denied for the given path.
    #[error("access denied: {path}")]
    Denied {
        /// The offending path.
        path: PathBuf,
    },
}

impl StorageError {
    /// Creates a not-found error for a path.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates an access-denied error for a path.
    pub fn denied(path: impl Into<PathBuf>) -> Self {
        Self::Denied { path: path.into() }
    }
}
