//! # delimdb Storage
//!
//! Storage backend boundary for delimdb.
//!
//! The metadata core consumes filesystem state exclusively through the
//! [`StorageBackend`] trait: existence checks, directory creation, whole-file
//! reads and writes, recursive deletion, and write-access probing. Nothing
//! else crosses the boundary.
//!
//! Two implementations are provided:
//! - [`LocalBackend`] - the real filesystem
//! - [`MemoryBackend`] - an in-memory map for tests, with per-path
//!   fault injection

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod local;
mod memory;

pub use backend::{StorageBackend, WriteMode};
pub use error::{StorageError, StorageResult};
pub use local::LocalBackend;
pub use memory::MemoryBackend;
