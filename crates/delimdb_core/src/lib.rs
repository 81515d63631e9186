//! # delimdb Core
//!
//! The metadata-integrity layer of delimdb, an embedded, file-backed
//! delimiter-text database. A database is a directory holding one
//! `meta.json` descriptor and one subdirectory per table; this crate keeps
//! that descriptor valid, tamper-evident, and in lockstep with the
//! filesystem.
//!
//! ## Quick start
//!
//! ```no_run
//! use delimdb_core::{ColumnType, Database, DbConfig, Schema};
//!
//! # fn main() -> delimdb_core::CoreResult<()> {
//! let db = Database::open(DbConfig::new("shop").location("/tmp/delimdb"))?;
//!
//! let schema: Schema = [
//!     ("id".to_string(), ColumnType::Uuid),
//!     ("total".to_string(), ColumnType::Number),
//! ]
//! .into_iter()
//! .collect();
//!
//! let orders = db.create_table("orders", Some(schema))?;
//! println!("table lives at {}", db.table_dir(&orders)?.display());
//!
//! db.drop_table("orders")?;
//! db.close()
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`meta`] - the persisted descriptor and its checksum discipline
//! - [`config`] - caller configuration, validation, and defaults
//! - [`reconcile`] - merging a stored descriptor with a re-open config
//! - [`database`] - the open flow and the table lifecycle
//! - [`checksum`] - the salted SHA-256 digest guarding the descriptor
//! - [`crypto`], [`hooks`], [`prefix`] - the cipher, hook, and
//!   prefix-generator registries; descriptors reference entries by
//!   identifier, never by code
//!
//! Storage goes through the [`StorageBackend`](delimdb_storage::StorageBackend)
//! trait; row encoding through [`Codec`](delimdb_codec::Codec).

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod checksum;
pub mod config;
pub mod crypto;
pub mod database;
mod error;
pub mod hooks;
pub mod meta;
pub mod prefix;
pub mod reconcile;
pub mod schema;

pub use config::{DbConfig, NormalizedConfig, SizeLimit};
pub use crypto::{BoxCipher, Cipher};
pub use database::{Database, DatabaseStats, TableHandle};
pub use error::{CoreError, CoreResult};
pub use hooks::{ExtensionPoints, Hook, HookEvent, HookPoint};
pub use meta::{CipherKind, CodecKind, MetaDescriptor, TableDescriptor};
pub use prefix::PrefixKind;
pub use schema::{ColumnType, Schema};
