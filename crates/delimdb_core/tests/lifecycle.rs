//! End-to-end lifecycle against the local filesystem.

use delimdb_core::{
    ColumnType, CoreError, Database, DbConfig, MetaDescriptor, Schema,
};
use delimdb_storage::{LocalBackend, StorageBackend};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

fn orders_schema() -> Schema {
    [
        ("id".to_string(), ColumnType::Uuid),
        ("total".to_string(), ColumnType::Number),
    ]
    .into_iter()
    .collect()
}

fn read_descriptor(root: &Path) -> MetaDescriptor {
    let bytes = fs::read(root.join("meta.json")).unwrap();
    MetaDescriptor::from_json(&bytes).unwrap()
}

#[test]
fn full_lifecycle_on_disk() {
    let temp = tempdir().unwrap();
    let config = DbConfig::new("shop").location(temp.path());

    let db = Database::open(config.clone()).unwrap();
    let root = temp.path().join("shop");

    // Fresh open: descriptor on disk, no tables, checksum verifies.
    assert!(root.join("meta.json").is_file());
    let stored = read_descriptor(&root);
    assert!(stored.checksum_ok());
    assert!(stored.tables.is_empty());

    // Create: directory plus one segment whose first line is the
    // codec-encoded column titles.
    let orders = db.create_table("orders", Some(orders_schema())).unwrap();
    let dir = db.table_dir(&orders).unwrap();
    assert_eq!(dir, root.join("orders"));
    assert!(dir.is_dir());

    let segments: Vec<_> = fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(segments.len(), 1);
    let segment_name = segments[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(segment_name.starts_with("1_") && segment_name.ends_with(".txt"));

    let content = fs::read_to_string(&segments[0]).unwrap();
    assert_eq!(content.lines().next(), Some("id(Uuid),total(Number)"));

    let stored = read_descriptor(&root);
    assert!(stored.checksum_ok());
    assert_eq!(stored.tables.len(), 1);
    assert_eq!(stored.tables[0].name, "orders");
    assert_eq!(stored.tables[0].file_count, 1);

    // Duplicate create fails without touching anything.
    assert!(matches!(
        db.create_table("orders", None),
        Err(CoreError::DuplicateTable { .. })
    ));

    // Drop: directory gone, descriptor back to empty, checksum re-verifies.
    db.drop_table("orders").unwrap();
    assert!(!dir.exists());
    let stored = read_descriptor(&root);
    assert!(stored.checksum_ok());
    assert!(stored.tables.is_empty());

    db.close().unwrap();

    // Reopening the same database sees the same state.
    let db = Database::open(config).unwrap();
    assert_eq!(db.stats().table_count, 0);
    db.close().unwrap();
}

#[test]
fn survives_restart_with_tables() {
    let temp = tempdir().unwrap();
    let config = DbConfig::new("shop").location(temp.path());

    {
        let db = Database::open(config.clone()).unwrap();
        db.create_table("orders", Some(orders_schema())).unwrap();
        db.create_table("customers", None).unwrap();
        db.close().unwrap();
    }

    let db = Database::open(config).unwrap();
    assert_eq!(db.stats().table_count, 2);

    let orders = db.table("orders").unwrap();
    assert!(db.table_dir(&orders).unwrap().is_dir());
}

#[test]
fn byte_flip_in_descriptor_is_detected() {
    let temp = tempdir().unwrap();
    let config = DbConfig::new("shop").location(temp.path());

    Database::open(config.clone()).unwrap().close().unwrap();

    let meta_path = temp.path().join("shop").join("meta.json");
    let mut bytes = fs::read(&meta_path).unwrap();
    let middle = bytes.len() / 2;
    bytes[middle] = bytes[middle].wrapping_add(1);
    fs::write(&meta_path, bytes).unwrap();

    assert!(matches!(
        Database::open(config),
        Err(CoreError::Corruption { .. })
    ));
}

#[test]
fn open_with_explicit_local_backend() {
    let temp = tempdir().unwrap();
    let config = DbConfig::new("shop").location(temp.path());

    let backend = Arc::new(LocalBackend::new());
    let db = Database::open_with_backend(config, backend.clone()).unwrap();
    let handle = db.create_table("orders", None).unwrap();

    assert!(backend.exists(&db.table_dir(&handle).unwrap()));
}
