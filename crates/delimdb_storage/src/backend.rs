//! Storage backend trait definition.

use crate::error::StorageResult;
use std::path::Path;

/// How [`StorageBackend::write_file`] treats existing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Append to the end of the file, creating it if absent.
    Append,
    /// Replace the file contents, creating it if absent.
    Truncate,
}

/// A low-level storage backend for delimdb.
///
/// Storage backends are **opaque path stores**. They move whole files and
/// directories; delimdb owns all format interpretation - backends do not
/// understand descriptors, codecs, or table segments.
///
/// # Invariants
///
/// - `read_file` returns exactly the bytes previously written to that path
/// - `write_file` with [`WriteMode::Truncate`] is a single synchronous write;
///   once it returns `Ok`, the content is the new file content
/// - operations either complete or fail synchronously; no retries are
///   performed inside the backend trait itself
/// - backends must be `Send + Sync` so a database handle can be shared
///
/// # Implementors
///
/// - [`super::LocalBackend`] - for persistent storage
/// - [`super::MemoryBackend`] - for testing
pub trait StorageBackend: Send + Sync {
    /// Returns whether the path exists (file or directory).
    fn exists(&self, path: &Path) -> bool;

    /// Creates a directory and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns an error if creation is denied or an I/O error occurs.
    fn make_directory(&self, path: &Path) -> StorageResult<()>;

    /// Reads the entire file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read.
    fn read_file(&self, path: &Path) -> StorageResult<Vec<u8>>;

    /// Writes `bytes` to the file at `path` according to `mode`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is denied or an I/O error occurs.
    fn write_file(&self, path: &Path, bytes: &[u8], mode: WriteMode) -> StorageResult<()>;

    /// Deletes the file or directory at `path`, recursively.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist or deletion fails.
    fn delete_recursive(&self, path: &Path) -> StorageResult<()>;

    /// Returns whether the process can write under `path`.
    ///
    /// This is a best-effort probe used for configuration validation; a
    /// `true` answer does not guarantee a later write will succeed.
    fn has_write_access(&self, path: &Path) -> bool;
}
