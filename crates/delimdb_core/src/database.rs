//! The database handle: open flow, table lifecycle, and hook binding.
//!
//! A [`Database`] owns one metadata descriptor and keeps it in lockstep
//! with the filesystem: every mutation clones the descriptor, applies the
//! change, refreshes the checksum, persists the clone, and only then swaps
//! it in. A failed persist therefore leaves the in-memory descriptor
//! untouched.

use crate::config::{self, DbConfig, NormalizedConfig, DEFAULT_FILE_SIZE_LIMIT};
use crate::crypto::{self, BoxCipher, Cipher};
use crate::error::{CoreError, CoreResult};
use crate::hooks::{self, Hook, HookPoint};
use crate::meta::{now_millis, CipherKind, CodecKind, MetaDescriptor, TableDescriptor};
use crate::reconcile::reconcile;
use crate::schema::{self, Schema};
use delimdb_codec::Codec;
use delimdb_storage::{LocalBackend, StorageBackend, WriteMode};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// An opaque reference to a table of an open database.
///
/// Handles are invalidated when their table is dropped: using a stale
/// handle is reported as an error even if a table with the same name is
/// created later.
#[derive(Debug, Clone)]
pub struct TableHandle {
    name: String,
    slot: usize,
    generation: u64,
}

impl TableHandle {
    /// Full name of the table this handle refers to (prefix applied).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A point-in-time summary of an open database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseStats {
    /// Database name.
    pub name: String,
    /// Number of tables.
    pub table_count: usize,
    /// Whether table data is encrypted.
    pub encrypt: bool,
    /// Segment size limit in bytes.
    pub file_size_limit: u64,
    /// Identifier of the bound codec.
    pub codec: String,
}

struct Slot {
    name: Option<String>,
    generation: u64,
}

struct Inner {
    descriptor: MetaDescriptor,
    slots: Vec<Slot>,
}

/// An open database instance.
pub struct Database {
    backend: Arc<dyn StorageBackend>,
    codec: Arc<dyn Codec>,
    cipher: Option<Arc<dyn Cipher>>,
    inner: Mutex<Inner>,
}

impl Database {
    /// Opens (or creates) a database on the local filesystem.
    ///
    /// # Errors
    ///
    /// See [`open_with_backend`](Self::open_with_backend).
    pub fn open(config: DbConfig) -> CoreResult<Self> {
        Self::open_with_backend(config, Arc::new(LocalBackend::new()))
    }

    /// Opens (or creates) a database on the given storage backend.
    ///
    /// If `{location}/{name}/meta.json` exists the stored descriptor is
    /// loaded, integrity-checked, and reconciled with `config`; otherwise a
    /// fresh descriptor is created from `config` plus defaults. Either way
    /// the resulting descriptor is persisted before the handle is returned.
    ///
    /// # Errors
    ///
    /// - `Config` if validation or reconciliation rejects `config`, or a
    ///   referenced codec/cipher/hook/generator is not registered.
    /// - `Corruption` if the stored descriptor is unreadable as JSON or
    ///   fails checksum verification.
    /// - `Access` if the backend refuses a read or write.
    pub fn open_with_backend(
        config: DbConfig,
        backend: Arc<dyn StorageBackend>,
    ) -> CoreResult<Self> {
        let normalized = config::normalize(&config, backend.as_ref())?;
        let root = normalized.location.join(&normalized.name);
        let meta_path = root.join(crate::meta::META_FILE_NAME);

        let mut descriptor = if backend.exists(&meta_path) {
            let bytes = backend
                .read_file(&meta_path)
                .map_err(|err| CoreError::access(&meta_path, err))?;
            let stored = MetaDescriptor::from_json(&bytes)
                .map_err(|_| CoreError::corruption("descriptor is not valid JSON"))?;
            if !stored.checksum_ok() {
                return Err(CoreError::corruption("descriptor checksum mismatch"));
            }
            let merged = reconcile(&stored, &normalized)?;
            debug!(name = %merged.name, "reconciled stored descriptor");
            merged
        } else {
            backend
                .make_directory(&root)
                .map_err(|err| CoreError::access(&root, err))?;
            let fresh = fresh_descriptor(&normalized)?;
            info!(name = %fresh.name, root = %root.display(), "created database");
            fresh
        };

        let codec = delimdb_codec::registry::lookup(descriptor.codec_kind.identifier())
            .ok_or_else(|| {
                CoreError::config(format!(
                    "codec not registered: {}",
                    descriptor.codec_kind.identifier()
                ))
            })?;

        let cipher = resolve_cipher(&descriptor, &normalized)?;

        persist(backend.as_ref(), &mut descriptor)?;

        let slots = descriptor
            .tables
            .iter()
            .map(|table| Slot {
                name: Some(table.name.clone()),
                generation: 0,
            })
            .collect();

        info!(name = %descriptor.name, tables = descriptor.tables.len(), "opened database");
        Ok(Self {
            backend,
            codec,
            cipher,
            inner: Mutex::new(Inner { descriptor, slots }),
        })
    }

    /// Creates a table and its initial on-disk segment.
    ///
    /// The given name is trimmed and the descriptor prefix is applied. With
    /// a schema, the initial segment starts with the column-title row
    /// encoded through the database codec (and encrypted when encryption is
    /// on); without one the segment starts empty.
    ///
    /// # Errors
    ///
    /// - `Config` if the trimmed name is empty or the prefix generator is
    ///   gone.
    /// - `Schema` if the schema is invalid.
    /// - `DuplicateTable` if the full name is already taken.
    /// - `Access` if a filesystem step fails; in-memory state is unchanged.
    pub fn create_table(
        &self,
        name: &str,
        table_schema: Option<Schema>,
    ) -> CoreResult<TableHandle> {
        let mut inner = self.inner.lock();
        let full_name = self.full_table_name(&inner.descriptor, name)?;

        if inner.descriptor.table(&full_name).is_some() {
            return Err(CoreError::duplicate_table(full_name));
        }

        let header = match &table_schema {
            Some(s) => {
                schema::validate(s)?;
                let encoded = self.codec.encode(&[schema::column_titles(s)])?;
                match &self.cipher {
                    Some(cipher) => cipher.encrypt(&encoded)?,
                    None => encoded,
                }
            }
            None => String::new(),
        };

        let dir = inner.descriptor.table_path(&full_name);
        self.backend
            .make_directory(&dir)
            .map_err(|err| CoreError::access(&dir, err))?;

        let now = now_millis();
        let segment = dir.join(format!("1_{now}.txt"));
        self.backend
            .write_file(&segment, header.as_bytes(), WriteMode::Truncate)
            .map_err(|err| CoreError::access(&segment, err))?;

        let mut updated = inner.descriptor.clone();
        updated.tables.push(TableDescriptor {
            name: full_name.clone(),
            schema: table_schema,
            file_count: 1,
            creation_date: now,
            last_update: now,
        });
        updated.last_update = now;
        persist(self.backend.as_ref(), &mut updated)?;
        inner.descriptor = updated;

        let slot = match inner.slots.iter().position(|s| s.name.is_none()) {
            Some(index) => {
                inner.slots[index].name = Some(full_name.clone());
                index
            }
            None => {
                inner.slots.push(Slot {
                    name: Some(full_name.clone()),
                    generation: 0,
                });
                inner.slots.len() - 1
            }
        };
        let generation = inner.slots[slot].generation;

        debug!(table = %full_name, "created table");
        Ok(TableHandle {
            name: full_name,
            slot,
            generation,
        })
    }

    /// Drops a table: removes its directory and descriptor entry, and
    /// invalidates any handle pointing at it.
    ///
    /// # Errors
    ///
    /// - `TableNotFound` if no table has the (prefixed, trimmed) name.
    /// - `Access` if the filesystem removal or the descriptor persist
    ///   fails; in-memory state is unchanged.
    pub fn drop_table(&self, name: &str) -> CoreResult<()> {
        let mut inner = self.inner.lock();
        let full_name = self.full_table_name(&inner.descriptor, name)?;

        if inner.descriptor.table(&full_name).is_none() {
            return Err(CoreError::table_not_found(full_name));
        }

        let dir = inner.descriptor.table_path(&full_name);
        self.backend
            .delete_recursive(&dir)
            .map_err(|err| CoreError::access(&dir, err))?;

        let mut updated = inner.descriptor.clone();
        updated.tables.retain(|table| table.name != full_name);
        updated.last_update = now_millis();
        persist(self.backend.as_ref(), &mut updated)?;
        inner.descriptor = updated;

        for slot in &mut inner.slots {
            if slot.name.as_deref() == Some(full_name.as_str()) {
                slot.name = None;
                slot.generation += 1;
            }
        }

        debug!(table = %full_name, "dropped table");
        Ok(())
    }

    /// Returns a handle to an existing table.
    ///
    /// # Errors
    ///
    /// - `Config` if the prefix generator is gone.
    /// - `TableNotFound` if no table has the (prefixed, trimmed) name.
    pub fn table(&self, name: &str) -> CoreResult<TableHandle> {
        let inner = self.inner.lock();
        let full_name = self.full_table_name(&inner.descriptor, name)?;

        let slot = inner
            .slots
            .iter()
            .position(|s| s.name.as_deref() == Some(full_name.as_str()))
            .ok_or_else(|| CoreError::table_not_found(full_name.clone()))?;

        Ok(TableHandle {
            name: full_name,
            slot,
            generation: inner.slots[slot].generation,
        })
    }

    /// Resolves the on-disk directory of the table behind `handle`.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the handle is stale: its table was
    /// dropped after the handle was issued.
    pub fn table_dir(&self, handle: &TableHandle) -> CoreResult<PathBuf> {
        let inner = self.inner.lock();
        let valid = inner
            .slots
            .get(handle.slot)
            .is_some_and(|slot| {
                slot.generation == handle.generation
                    && slot.name.as_deref() == Some(handle.name.as_str())
            });
        if !valid {
            return Err(CoreError::config(format!(
                "stale table handle: {}",
                handle.name
            )));
        }
        Ok(inner.descriptor.table_path(&handle.name))
    }

    /// Binds a registered hook identifier to a lifecycle point and persists
    /// the binding.
    ///
    /// # Errors
    ///
    /// - `Config` if the identifier is not registered.
    /// - `Access` if the persist fails; in-memory state is unchanged.
    pub fn set_hook(&self, point: HookPoint, identifier: &str) -> CoreResult<()> {
        if !hooks::is_registered(identifier) {
            return Err(CoreError::config(format!(
                "hook not registered: {identifier}"
            )));
        }

        let mut inner = self.inner.lock();
        let mut updated = inner.descriptor.clone();
        updated
            .extension_points
            .set(point, Some(identifier.to_string()));
        updated.last_update = now_millis();
        persist(self.backend.as_ref(), &mut updated)?;
        inner.descriptor = updated;
        Ok(())
    }

    /// Resolves the hook bound to `point`, if any.
    ///
    /// Returns `None` both when the slot is unbound and when the bound
    /// identifier is not registered in this process.
    #[must_use]
    pub fn hook(&self, point: HookPoint) -> Option<Hook> {
        let inner = self.inner.lock();
        inner
            .descriptor
            .extension_points
            .get(point)
            .and_then(hooks::lookup)
    }

    /// Summarizes the open database.
    #[must_use]
    pub fn stats(&self) -> DatabaseStats {
        let inner = self.inner.lock();
        DatabaseStats {
            name: inner.descriptor.name.clone(),
            table_count: inner.descriptor.tables.len(),
            encrypt: inner.descriptor.encrypt,
            file_size_limit: inner.descriptor.file_size_limit,
            codec: inner.descriptor.codec_kind.identifier().to_string(),
        }
    }

    /// Returns a snapshot of the current descriptor.
    #[must_use]
    pub fn descriptor(&self) -> MetaDescriptor {
        self.inner.lock().descriptor.clone()
    }

    /// Persists the descriptor one last time and consumes the handle.
    ///
    /// # Errors
    ///
    /// Returns an `Access` error if the final persist fails.
    pub fn close(self) -> CoreResult<()> {
        let mut inner = self.inner.lock();
        let mut updated = inner.descriptor.clone();
        updated.last_update = now_millis();
        persist(self.backend.as_ref(), &mut updated)?;
        inner.descriptor = updated;
        info!(name = %inner.descriptor.name, "closed database");
        Ok(())
    }

    fn full_table_name(
        &self,
        descriptor: &MetaDescriptor,
        name: &str,
    ) -> CoreResult<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CoreError::config("table name is empty"));
        }
        let prefix = descriptor.prefix.resolve()?;
        Ok(format!("{prefix}{trimmed}"))
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Database")
            .field("name", &inner.descriptor.name)
            .field("tables", &inner.descriptor.tables.len())
            .finish_non_exhaustive()
    }
}

fn fresh_descriptor(normalized: &NormalizedConfig) -> CoreResult<MetaDescriptor> {
    let encrypt = normalized.encrypt.unwrap_or(false);
    let cipher_kind = if encrypt {
        Some(normalized.cipher.clone().unwrap_or(CipherKind::Builtin))
    } else {
        if normalized.cipher.is_some() {
            return Err(CoreError::config(
                "cipher specified but encryption is disabled",
            ));
        }
        None
    };

    let now = now_millis();
    Ok(MetaDescriptor {
        name: normalized.name.clone(),
        location: normalized.location.clone(),
        prefix: normalized.prefix.clone().unwrap_or_default(),
        file_size_limit: normalized.file_size_limit.unwrap_or(DEFAULT_FILE_SIZE_LIMIT),
        encrypt,
        cipher_kind,
        codec_kind: normalized.codec.clone().unwrap_or(CodecKind::Csv),
        extension_points: normalized.hooks.clone(),
        creation_date: now,
        last_update: now,
        tables: Vec::new(),
        checksum: String::new(),
    })
}

fn resolve_cipher(
    descriptor: &MetaDescriptor,
    normalized: &NormalizedConfig,
) -> CoreResult<Option<Arc<dyn Cipher>>> {
    if !descriptor.encrypt {
        return Ok(None);
    }
    match &descriptor.cipher_kind {
        Some(CipherKind::Builtin) => {
            let key = normalized.encryption_key.as_deref().ok_or_else(|| {
                CoreError::config("encryption key is required to open an encrypted database")
            })?;
            Ok(Some(Arc::new(BoxCipher::from_key(key)?)))
        }
        Some(CipherKind::Custom(identifier)) => crypto::lookup(identifier)
            .map(Some)
            .ok_or_else(|| {
                CoreError::config(format!("cipher not registered: {identifier}"))
            }),
        None => Err(CoreError::corruption(
            "encryption is on but no cipher is bound",
        )),
    }
}

fn persist(backend: &dyn StorageBackend, descriptor: &mut MetaDescriptor) -> CoreResult<()> {
    descriptor.refresh_checksum()?;
    let bytes = descriptor.to_json()?;
    let path = descriptor.meta_path();
    backend
        .write_file(&path, &bytes, WriteMode::Truncate)
        .map_err(|err| CoreError::access(path, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;
    use delimdb_storage::MemoryBackend;
    use std::path::Path;

    fn orders_schema() -> Schema {
        [
            ("id".to_string(), ColumnType::Uuid),
            ("total".to_string(), ColumnType::Number),
        ]
        .into_iter()
        .collect()
    }

    fn open(config: DbConfig) -> (Database, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        let db = Database::open_with_backend(config, backend.clone()).unwrap();
        (db, backend)
    }

    #[test]
    fn fresh_open_writes_a_valid_descriptor() {
        let (db, backend) = open(DbConfig::new("shop"));

        let meta_path = Path::new("/var/lib/delimdb/shop/meta.json");
        let bytes = backend.file(meta_path).unwrap();
        let stored = MetaDescriptor::from_json(&bytes).unwrap();

        assert!(stored.checksum_ok());
        assert_eq!(stored.name, "shop");
        assert_eq!(stored.file_size_limit, DEFAULT_FILE_SIZE_LIMIT);
        assert_eq!(stored.codec_kind, CodecKind::Csv);
        assert!(stored.tables.is_empty());
        assert_eq!(db.stats().table_count, 0);
    }

    #[test]
    fn create_table_writes_header_segment() {
        let (db, backend) = open(DbConfig::new("shop"));

        let handle = db.create_table("orders", Some(orders_schema())).unwrap();
        assert_eq!(handle.name(), "orders");

        let dir = db.table_dir(&handle).unwrap();
        assert_eq!(dir, Path::new("/var/lib/delimdb/shop/orders"));
        assert!(backend.exists(&dir));

        let descriptor = db.descriptor();
        let table = descriptor.table("orders").unwrap();
        assert_eq!(table.file_count, 1);

        // Exactly one segment, named 1_{millis}.txt, holding the titles.
        let segment = dir.join(format!("1_{}.txt", table.creation_date));
        let content = backend.file(&segment).unwrap();
        assert_eq!(content, b"id(Uuid),total(Number)");
    }

    #[test]
    fn create_table_applies_prefix_and_trims() {
        let (db, _backend) = open(DbConfig::new("shop").prefix("acme_"));

        let handle = db.create_table("  orders  ", None).unwrap();
        assert_eq!(handle.name(), "acme_orders");
        assert!(db.descriptor().table("acme_orders").is_some());
    }

    #[test]
    fn duplicate_table_rejected() {
        let (db, _backend) = open(DbConfig::new("shop"));
        db.create_table("orders", None).unwrap();

        assert!(matches!(
            db.create_table("orders", None),
            Err(CoreError::DuplicateTable { .. })
        ));
    }

    #[test]
    fn empty_table_name_rejected() {
        let (db, _backend) = open(DbConfig::new("shop"));
        assert!(matches!(
            db.create_table("   ", None),
            Err(CoreError::Config { .. })
        ));
    }

    #[test]
    fn invalid_schema_rejected_before_io() {
        let (db, backend) = open(DbConfig::new("shop"));
        let bad: Schema = [(" ".to_string(), ColumnType::Text)].into_iter().collect();

        assert!(matches!(
            db.create_table("orders", Some(bad)),
            Err(CoreError::Schema { .. })
        ));
        assert!(!backend.exists(Path::new("/var/lib/delimdb/shop/orders")));
    }

    #[test]
    fn drop_table_removes_directory_and_entry() {
        let (db, backend) = open(DbConfig::new("shop"));
        db.create_table("orders", Some(orders_schema())).unwrap();

        db.drop_table("orders").unwrap();

        assert!(!backend.exists(Path::new("/var/lib/delimdb/shop/orders")));
        assert!(db.descriptor().tables.is_empty());
        assert!(db.descriptor().checksum_ok());

        assert!(matches!(
            db.drop_table("orders"),
            Err(CoreError::TableNotFound { .. })
        ));
    }

    #[test]
    fn dropped_handle_goes_stale() {
        let (db, _backend) = open(DbConfig::new("shop"));
        let handle = db.create_table("orders", None).unwrap();
        db.drop_table("orders").unwrap();

        assert!(matches!(
            db.table_dir(&handle),
            Err(CoreError::Config { .. })
        ));

        // Recreating under the same name does not revive the old handle.
        let fresh = db.create_table("orders", None).unwrap();
        assert!(db.table_dir(&fresh).is_ok());
        assert!(db.table_dir(&handle).is_err());
    }

    #[test]
    fn failed_create_leaves_memory_unchanged() {
        let (db, backend) = open(DbConfig::new("shop"));
        backend.deny("/var/lib/delimdb/shop/orders");

        assert!(matches!(
            db.create_table("orders", None),
            Err(CoreError::Access { .. })
        ));
        assert!(db.descriptor().tables.is_empty());
        assert!(db.table("orders").is_err());
    }

    #[test]
    fn access_error_carries_the_backend_cause() {
        use std::error::Error as _;

        let (db, backend) = open(DbConfig::new("shop"));
        backend.deny("/var/lib/delimdb/shop/orders");

        let err = db.create_table("orders", None).unwrap_err();
        assert!(matches!(err, CoreError::Access { .. }));

        let cause = err.source().expect("backend cause");
        assert!(cause.to_string().contains("access denied"));
    }

    #[test]
    fn failed_drop_leaves_memory_unchanged() {
        let (db, backend) = open(DbConfig::new("shop"));
        db.create_table("orders", None).unwrap();
        backend.deny("/var/lib/delimdb/shop/orders");

        assert!(matches!(
            db.drop_table("orders"),
            Err(CoreError::Access { .. })
        ));
        assert_eq!(db.descriptor().tables.len(), 1);
        assert!(db.table("orders").is_ok());
    }

    #[test]
    fn reopen_loads_stored_tables() {
        let backend = Arc::new(MemoryBackend::new());
        {
            let db =
                Database::open_with_backend(DbConfig::new("shop"), backend.clone()).unwrap();
            db.create_table("orders", Some(orders_schema())).unwrap();
            db.close().unwrap();
        }

        let db = Database::open_with_backend(DbConfig::new("shop"), backend).unwrap();
        assert_eq!(db.stats().table_count, 1);
        assert!(db.table("orders").is_ok());
    }

    #[test]
    fn tampered_descriptor_fails_to_open() {
        let backend = Arc::new(MemoryBackend::new());
        Database::open_with_backend(DbConfig::new("shop"), backend.clone()).unwrap();

        let meta_path = Path::new("/var/lib/delimdb/shop/meta.json");
        let mut bytes = backend.file(meta_path).unwrap();
        // Flip one byte inside the JSON body.
        let middle = bytes.len() / 2;
        bytes[middle] = bytes[middle].wrapping_add(1);
        backend.tamper(meta_path, bytes);

        let result = Database::open_with_backend(DbConfig::new("shop"), backend);
        assert!(matches!(result, Err(CoreError::Corruption { .. })));
    }

    #[test]
    fn reconciled_override_is_persisted() {
        let backend = Arc::new(MemoryBackend::new());
        Database::open_with_backend(DbConfig::new("shop"), backend.clone()).unwrap();

        let db = Database::open_with_backend(
            DbConfig::new("shop").file_size_limit("1MiB"),
            backend.clone(),
        )
        .unwrap();
        assert_eq!(db.stats().file_size_limit, 1 << 20);

        let bytes = backend
            .file(Path::new("/var/lib/delimdb/shop/meta.json"))
            .unwrap();
        let stored = MetaDescriptor::from_json(&bytes).unwrap();
        assert_eq!(stored.file_size_limit, 1 << 20);
        assert!(stored.checksum_ok());
    }

    #[test]
    fn codec_change_on_reopen_rejected() {
        let backend = Arc::new(MemoryBackend::new());
        Database::open_with_backend(DbConfig::new("shop").codec("csv"), backend.clone())
            .unwrap();

        let result =
            Database::open_with_backend(DbConfig::new("shop").codec("tsv"), backend);
        assert!(matches!(result, Err(CoreError::Config { .. })));
    }

    #[test]
    fn encrypted_table_header_is_ciphertext() {
        let key = "a-long-enough-key-0123456789-abcdefghijk";
        let (db, backend) = open(
            DbConfig::new("vault")
                .encrypt(true)
                .encryption_key(key),
        );

        let handle = db.create_table("orders", Some(orders_schema())).unwrap();
        let table = db.descriptor();
        let table = table.table("orders").unwrap();
        let segment = db
            .table_dir(&handle)
            .unwrap()
            .join(format!("1_{}.txt", table.creation_date));

        let content = String::from_utf8(backend.file(&segment).unwrap()).unwrap();
        assert_ne!(content, "id(Uuid),total(Number)");

        let cipher = BoxCipher::from_key(key).unwrap();
        assert_eq!(cipher.decrypt(&content).unwrap(), "id(Uuid),total(Number)");
    }

    #[test]
    fn encrypted_database_requires_key_on_reopen() {
        let key = "a-long-enough-key-0123456789-abcdefghijk";
        let backend = Arc::new(MemoryBackend::new());
        Database::open_with_backend(
            DbConfig::new("vault").encrypt(true).encryption_key(key),
            backend.clone(),
        )
        .unwrap();

        let result = Database::open_with_backend(DbConfig::new("vault"), backend);
        assert!(matches!(result, Err(CoreError::Config { .. })));
    }

    #[test]
    fn set_hook_persists_the_binding() {
        hooks::register("database-test-audit", Arc::new(|_event| {})).unwrap();
        let (db, backend) = open(DbConfig::new("shop"));

        assert!(db.hook(HookPoint::BeforeInsert).is_none());
        db.set_hook(HookPoint::BeforeInsert, "database-test-audit")
            .unwrap();
        assert!(db.hook(HookPoint::BeforeInsert).is_some());

        assert!(matches!(
            db.set_hook(HookPoint::AfterInsert, "database-test-ghost"),
            Err(CoreError::Config { .. })
        ));

        let bytes = backend
            .file(Path::new("/var/lib/delimdb/shop/meta.json"))
            .unwrap();
        let stored = MetaDescriptor::from_json(&bytes).unwrap();
        assert_eq!(
            stored.extension_points.get(HookPoint::BeforeInsert),
            Some("database-test-audit")
        );
    }

    #[test]
    fn stats_reflect_descriptor() {
        let (db, _backend) = open(DbConfig::new("shop").codec("tsv").file_size_limit(4_096u64));
        db.create_table("orders", None).unwrap();

        let stats = db.stats();
        assert_eq!(stats.name, "shop");
        assert_eq!(stats.table_count, 1);
        assert_eq!(stats.codec, "tsv");
        assert_eq!(stats.file_size_limit, 4_096);
        assert!(!stats.encrypt);
    }
}
