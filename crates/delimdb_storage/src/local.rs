//! Local filesystem storage backend.

use crate::backend::{StorageBackend, WriteMode};
use crate::error::{StorageError, StorageResult};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Storage backend over the local filesystem.
///
/// Writes are synchronous: `write_file` opens, writes, and `sync_all`s the
/// file before returning. There is no tempfile/rename dance here - the
/// metadata layer's durability contract is a single synchronous write.
///
/// # Example
///
/// ```rust
/// use delimdb_storage::{LocalBackend, StorageBackend, WriteMode};
///
/// let backend = LocalBackend::new();
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("hello.txt");
/// backend.write_file(&path, b"hi", WriteMode::Truncate).unwrap();
/// assert_eq!(backend.read_file(&path).unwrap(), b"hi");
/// ```
#[derive(Debug, Default, Clone)]
pub struct LocalBackend;

impl LocalBackend {
    /// Creates a new local filesystem backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl StorageBackend for LocalBackend {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn make_directory(&self, path: &Path) -> StorageResult<()> {
        fs::create_dir_all(path)?;
        Ok(())
    }

    fn read_file(&self, path: &Path) -> StorageResult<Vec<u8>> {
        if !path.exists() {
            return Err(StorageError::not_found(path));
        }
        Ok(fs::read(path)?)
    }

    fn write_file(&self, path: &Path, bytes: &[u8], mode: WriteMode) -> StorageResult<()> {
        let mut options = OpenOptions::new();
        options.create(true).write(true);
        match mode {
            WriteMode::Append => options.append(true),
            WriteMode::Truncate => options.truncate(true),
        };

        let mut file = options.open(path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        Ok(())
    }

    fn delete_recursive(&self, path: &Path) -> StorageResult<()> {
        if !path.exists() {
            return Err(StorageError::not_found(path));
        }
        if path.is_dir() {
            fs::remove_dir_all(path)?;
        } else {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn has_write_access(&self, path: &Path) -> bool {
        if !path.is_dir() {
            return false;
        }
        // Metadata permission bits lie on some platforms/mounts, so probe
        // with an actual create-and-delete.
        let probe = path.join(".delimdb_access_probe");
        match OpenOptions::new().create_new(true).write(true).open(&probe) {
            Ok(file) => {
                drop(file);
                let _ = fs::remove_file(&probe);
                true
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_truncate_then_read() {
        let temp = tempdir().unwrap();
        let backend = LocalBackend::new();
        let path = temp.path().join("data.txt");

        backend
            .write_file(&path, b"first", WriteMode::Truncate)
            .unwrap();
        backend
            .write_file(&path, b"second", WriteMode::Truncate)
            .unwrap();

        assert_eq!(backend.read_file(&path).unwrap(), b"second");
    }

    #[test]
    fn write_append_accumulates() {
        let temp = tempdir().unwrap();
        let backend = LocalBackend::new();
        let path = temp.path().join("log.txt");

        backend
            .write_file(&path, b"one\n", WriteMode::Append)
            .unwrap();
        backend
            .write_file(&path, b"two\n", WriteMode::Append)
            .unwrap();

        assert_eq!(backend.read_file(&path).unwrap(), b"one\ntwo\n");
    }

    #[test]
    fn read_missing_file_fails() {
        let temp = tempdir().unwrap();
        let backend = LocalBackend::new();

        let result = backend.read_file(&temp.path().join("ghost"));
        assert!(matches!(result, Err(StorageError::NotFound { .. })));
    }

    #[test]
    fn make_directory_creates_parents() {
        let temp = tempdir().unwrap();
        let backend = LocalBackend::new();
        let nested = temp.path().join("a").join("b").join("c");

        backend.make_directory(&nested).unwrap();
        assert!(backend.exists(&nested));
    }

    #[test]
    fn delete_recursive_removes_tree() {
        let temp = tempdir().unwrap();
        let backend = LocalBackend::new();
        let dir = temp.path().join("table");

        backend.make_directory(&dir).unwrap();
        backend
            .write_file(&dir.join("1_0.txt"), b"id,total", WriteMode::Truncate)
            .unwrap();

        backend.delete_recursive(&dir).unwrap();
        assert!(!backend.exists(&dir));
    }

    #[test]
    fn delete_missing_path_fails() {
        let temp = tempdir().unwrap();
        let backend = LocalBackend::new();

        let result = backend.delete_recursive(&temp.path().join("ghost"));
        assert!(matches!(result, Err(StorageError::NotFound { .. })));
    }

    #[test]
    fn write_access_on_tempdir() {
        let temp = tempdir().unwrap();
        let backend = LocalBackend::new();

        assert!(backend.has_write_access(temp.path()));
        assert!(!backend.has_write_access(&temp.path().join("not_a_dir")));
    }
}
