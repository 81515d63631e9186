//! Error types for delimdb core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in delimdb core operations.
///
/// Validation-class errors (`Config`, `Schema`) are raised before any
/// mutation or I/O. I/O-class errors (`Access`) are raised after an
/// attempted operation and leave in-memory state unchanged. `Corruption`
/// is fatal to opening a handle.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed or incompatible caller configuration.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the problem.
        message: String,
    },

    /// The stored descriptor failed integrity verification.
    #[error("metadata corruption: {message}")]
    Corruption {
        /// Description of the corruption.
        message: String,
    },

    /// A filesystem operation was denied or failed.
    #[error("access error: {path}")]
    Access {
        /// The offending path.
        path: PathBuf,
        /// The backend failure behind it.
        #[source]
        source: delimdb_storage::StorageError,
    },

    /// A table with the given name already exists.
    #[error("table already exists: {name}")]
    DuplicateTable {
        /// The duplicate table name.
        name: String,
    },

    /// No table with the given name exists.
    #[error("table not found: {name}")]
    TableNotFound {
        /// The missing table name.
        name: String,
    },

    /// An invalid column definition was supplied.
    #[error("schema error: {message}")]
    Schema {
        /// Description of the problem.
        message: String,
    },

    /// Row codec error.
    #[error("codec error: {0}")]
    Codec(#[from] delimdb_codec::CodecError),

    /// Descriptor (de)serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a corruption error.
    pub fn corruption(message: impl Into<String>) -> Self {
        Self::Corruption {
            message: message.into(),
        }
    }

    /// Creates an access error naming the failed path and carrying the
    /// backend failure as its source.
    pub fn access(path: impl Into<PathBuf>, source: delimdb_storage::StorageError) -> Self {
        Self::Access {
            path: path.into(),
            source,
        }
    }

    /// Creates a duplicate-table error.
    pub fn duplicate_table(name: impl Into<String>) -> Self {
        Self::DuplicateTable { name: name.into() }
    }

    /// Creates a table-not-found error.
    pub fn table_not_found(name: impl Into<String>) -> Self {
        Self::TableNotFound { name: name.into() }
    }

    /// Creates a schema error.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }
}
