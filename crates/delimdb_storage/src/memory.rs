//! In-memory storage backend for testing.

use crate::backend::{StorageBackend, WriteMode};
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// An in-memory storage backend.
///
/// Paths map to byte vectors; directories are tracked as a set so that
/// `exists` and `has_write_access` behave like the local backend. Suitable
/// for:
/// - Unit tests
/// - Integration tests exercising failure paths
///
/// Fault injection: [`MemoryBackend::deny`] marks a path prefix read-only,
/// making subsequent writes and deletions under it fail. This is how tests
/// exercise the "filesystem failed, in-memory state must stay untouched"
/// contract of the lifecycle operations.
///
/// # Thread Safety
///
/// The backend is thread-safe and can be shared across threads.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    files: RwLock<HashMap<PathBuf, Vec<u8>>>,
    directories: RwLock<HashSet<PathBuf>>,
    denied: RwLock<HashSet<PathBuf>>,
}

impl MemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a path prefix as denied: writes and deletes under it fail.
    pub fn deny(&self, path: impl Into<PathBuf>) {
        self.denied.write().insert(path.into());
    }

    /// Removes a previously injected denial.
    pub fn allow(&self, path: &Path) {
        self.denied.write().remove(path);
    }

    /// Returns a copy of the file at `path`, if present.
    #[must_use]
    pub fn file(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.read().get(path).cloned()
    }

    /// Overwrites a stored file directly, bypassing denial checks.
    ///
    /// Used by tests to simulate on-disk tampering.
    pub fn tamper(&self, path: &Path, bytes: Vec<u8>) {
        self.files.write().insert(path.to_path_buf(), bytes);
    }

    fn is_denied(&self, path: &Path) -> bool {
        let denied = self.denied.read();
        path.ancestors().any(|p| denied.contains(p))
    }
}

impl StorageBackend for MemoryBackend {
    fn exists(&self, path: &Path) -> bool {
        self.files.read().contains_key(path) || self.directories.read().contains(path)
    }

    fn make_directory(&self, path: &Path) -> StorageResult<()> {
        if self.is_denied(path) {
            return Err(StorageError::denied(path));
        }
        let mut dirs = self.directories.write();
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                dirs.insert(ancestor.to_path_buf());
            }
        }
        Ok(())
    }

    fn read_file(&self, path: &Path) -> StorageResult<Vec<u8>> {
        self.files
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path))
    }

    fn write_file(&self, path: &Path, bytes: &[u8], mode: WriteMode) -> StorageResult<()> {
        if self.is_denied(path) {
            return Err(StorageError::denied(path));
        }
        let mut files = self.files.write();
        match mode {
            WriteMode::Append => {
                files
                    .entry(path.to_path_buf())
                    .or_default()
                    .extend_from_slice(bytes);
            }
            WriteMode::Truncate => {
                files.insert(path.to_path_buf(), bytes.to_vec());
            }
        }
        Ok(())
    }

    fn delete_recursive(&self, path: &Path) -> StorageResult<()> {
        if self.is_denied(path) {
            return Err(StorageError::denied(path));
        }
        if !self.exists(path) {
            return Err(StorageError::not_found(path));
        }
        self.files
            .write()
            .retain(|candidate, _| !candidate.starts_with(path));
        self.directories
            .write()
            .retain(|candidate| !candidate.starts_with(path));
        Ok(())
    }

    fn has_write_access(&self, path: &Path) -> bool {
        self.directories.read().contains(path) && !self.is_denied(path)
    }
}
