//! The metadata descriptor: the single source of truth for a database.
//!
//! A database directory holds one `meta.json` describing the database's
//! persistent identity and its tables. The descriptor is created once (in
//! memory, fresh or deserialized), mutated only by reconciliation and the
//! table lifecycle operations, and every mutation is followed by a checksum
//! recomputation and a full persist.

use crate::checksum;
use crate::error::CoreResult;
use crate::hooks::ExtensionPoints;
use crate::prefix::PrefixKind;
use crate::schema::Schema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Name of the descriptor file within the database directory.
pub const META_FILE_NAME: &str = "meta.json";

/// The cipher bound to a database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CipherKind {
    /// The built-in `box` cipher (AES-256-GCM).
    #[serde(rename = "box")]
    Builtin,
    /// A custom cipher registered under the given identifier.
    Custom(String),
}

impl CipherKind {
    /// The registry identifier of this cipher.
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            Self::Builtin => crate::crypto::BOX,
            Self::Custom(identifier) => identifier,
        }
    }

    /// Maps a caller-facing identifier to a cipher kind.
    #[must_use]
    pub fn from_identifier(identifier: &str) -> Self {
        if identifier == crate::crypto::BOX {
            Self::Builtin
        } else {
            Self::Custom(identifier.to_string())
        }
    }
}

/// The codec bound to a database.
///
/// Fixed at creation: changing the codec of an existing database would
/// silently re-encode nothing, so reconciliation rejects any attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    /// Comma-separated values.
    Csv,
    /// Tab-separated values.
    Tsv,
    /// Newline-record format.
    Rec,
    /// A custom codec registered under the given identifier.
    Custom(String),
}

impl CodecKind {
    /// The registry identifier of this codec.
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            Self::Csv => delimdb_codec::registry::CSV,
            Self::Tsv => delimdb_codec::registry::TSV,
            Self::Rec => delimdb_codec::registry::REC,
            Self::Custom(identifier) => identifier,
        }
    }

    /// Maps a caller-facing identifier to a codec kind.
    #[must_use]
    pub fn from_identifier(identifier: &str) -> Self {
        match identifier {
            "csv" => Self::Csv,
            "tsv" => Self::Tsv,
            "rec" => Self::Rec,
            other => Self::Custom(other.to_string()),
        }
    }
}

/// Descriptor of one table within a database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDescriptor {
    /// Full table name (prefix applied), unique within the database.
    pub name: String,
    /// Optional column schema.
    pub schema: Option<Schema>,
    /// Number of on-disk segment files, at least 1.
    pub file_count: u32,
    /// Creation timestamp, Unix epoch milliseconds.
    pub creation_date: u64,
    /// Last update timestamp, Unix epoch milliseconds.
    pub last_update: u64,
}

/// The persisted metadata descriptor for a database instance.
///
/// `name`, `location`, and `creation_date` are immutable after creation.
/// `codec_kind` is fixed at creation. `file_size_limit` is the only soft
/// field that may be updated in place without invalidating table data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaDescriptor {
    /// Database name. Immutable.
    pub name: String,
    /// Absolute path of the directory containing the database. Immutable.
    pub location: PathBuf,
    /// Prefix applied to table names.
    pub prefix: PrefixKind,
    /// Segment size limit in bytes.
    pub file_size_limit: u64,
    /// Whether table data is encrypted.
    pub encrypt: bool,
    /// The cipher binding, present when encryption is enabled.
    pub cipher_kind: Option<CipherKind>,
    /// The codec binding. Fixed at creation.
    pub codec_kind: CodecKind,
    /// Lifecycle hook identifiers.
    pub extension_points: ExtensionPoints,
    /// Creation timestamp, Unix epoch milliseconds. Immutable.
    pub creation_date: u64,
    /// Last update timestamp, Unix epoch milliseconds.
    pub last_update: u64,
    /// Tables, unique by name, in creation order.
    pub tables: Vec<TableDescriptor>,
    /// Integrity digest over all other fields.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub checksum: String,
}

impl MetaDescriptor {
    /// Root directory of the database: `{location}/{name}`.
    #[must_use]
    pub fn root(&self) -> PathBuf {
        self.location.join(&self.name)
    }

    /// Path of the descriptor file.
    #[must_use]
    pub fn meta_path(&self) -> PathBuf {
        self.root().join(META_FILE_NAME)
    }

    /// Directory of a table, derived deterministically from its full name.
    #[must_use]
    pub fn table_path(&self, table_name: &str) -> PathBuf {
        self.root().join(table_name)
    }

    /// Finds a table by its full name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableDescriptor> {
        self.tables.iter().find(|table| table.name == name)
    }

    /// Canonical serialization used for checksum computation.
    ///
    /// The checksum field itself is excluded: it is cleared on a copy, and
    /// an empty checksum is skipped during serialization.
    pub fn checksum_payload(&self) -> CoreResult<String> {
        let mut copy = self.clone();
        copy.checksum = String::new();
        Ok(serde_json::to_string(&copy)?)
    }

    /// Recomputes and stores the checksum. Call after every mutation,
    /// before persisting.
    pub fn refresh_checksum(&mut self) -> CoreResult<()> {
        let payload = self.checksum_payload()?;
        self.checksum = checksum::digest(&payload);
        Ok(())
    }

    /// Verifies the stored checksum against the canonical payload.
    ///
    /// Fails closed: any error while producing the payload counts as a
    /// mismatch.
    #[must_use]
    pub fn checksum_ok(&self) -> bool {
        match self.checksum_payload() {
            Ok(payload) => checksum::verify(&payload, &self.checksum),
            Err(_) => false,
        }
    }

    /// Serializes the descriptor for persistence.
    pub fn to_json(&self) -> CoreResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Deserializes a descriptor from stored bytes.
    ///
    /// # Errors
    ///
    /// Returns the underlying serde error; callers opening a database
    /// surface this as corruption.
    pub fn from_json(bytes: &[u8]) -> CoreResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Current time as Unix epoch milliseconds.
#[must_use]
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;
    use std::path::Path;

    fn descriptor() -> MetaDescriptor {
        MetaDescriptor {
            name: "shop".to_string(),
            location: PathBuf::from("/var/lib/delimdb"),
            prefix: PrefixKind::Literal(String::new()),
            file_size_limit: 102_400,
            encrypt: false,
            cipher_kind: None,
            codec_kind: CodecKind::Csv,
            extension_points: ExtensionPoints::default(),
            creation_date: 1_700_000_000_000,
            last_update: 1_700_000_000_000,
            tables: vec![TableDescriptor {
                name: "orders".to_string(),
                schema: Some(
                    [
                        ("id".to_string(), ColumnType::Uuid),
                        ("total".to_string(), ColumnType::Number),
                    ]
                    .into_iter()
                    .collect(),
                ),
                file_count: 1,
                creation_date: 1_700_000_000_000,
                last_update: 1_700_000_000_000,
            }],
            checksum: String::new(),
        }
    }

    #[test]
    fn json_roundtrip_preserves_descriptor() {
        let mut original = descriptor();
        original.refresh_checksum().unwrap();

        let bytes = original.to_json().unwrap();
        let decoded = MetaDescriptor::from_json(&bytes).unwrap();

        assert_eq!(decoded, original);
        assert!(decoded.checksum_ok());
    }

    #[test]
    fn checksum_excludes_itself() {
        let mut d = descriptor();
        d.refresh_checksum().unwrap();
        let first = d.checksum.clone();

        // Re-refreshing over the same content is stable even though the
        // checksum field changed from empty to populated in between.
        d.refresh_checksum().unwrap();
        assert_eq!(d.checksum, first);
    }

    #[test]
    fn any_field_change_invalidates_checksum() {
        let mut d = descriptor();
        d.refresh_checksum().unwrap();
        assert!(d.checksum_ok());

        let mut changed = d.clone();
        changed.file_size_limit += 1;
        assert!(!changed.checksum_ok());

        let mut changed = d.clone();
        changed.tables[0].file_count = 2;
        assert!(!changed.checksum_ok());

        let mut changed = d.clone();
        changed.encrypt = true;
        assert!(!changed.checksum_ok());

        d.checksum.truncate(0);
        assert!(!d.checksum_ok());
    }

    #[test]
    fn serde_field_names_are_camel_case() {
        let mut d = descriptor();
        d.refresh_checksum().unwrap();
        let json = String::from_utf8(d.to_json().unwrap()).unwrap();

        assert!(json.contains("\"fileSizeLimit\""));
        assert!(json.contains("\"codecKind\""));
        assert!(json.contains("\"extensionPoints\""));
        assert!(json.contains("\"creationDate\""));
        assert!(json.contains("\"fileCount\""));
        assert!(json.contains("\"checksum\""));
    }

    #[test]
    fn codec_kind_identifiers() {
        assert_eq!(CodecKind::Csv.identifier(), "csv");
        assert_eq!(CodecKind::from_identifier("tsv"), CodecKind::Tsv);
        assert_eq!(
            CodecKind::from_identifier("pipe"),
            CodecKind::Custom("pipe".to_string())
        );
    }

    #[test]
    fn cipher_kind_serializes_as_box() {
        let json = serde_json::to_string(&CipherKind::Builtin).unwrap();
        assert_eq!(json, "\"box\"");
        assert_eq!(CipherKind::from_identifier("box"), CipherKind::Builtin);
    }

    #[test]
    fn paths_derive_from_location_and_name() {
        let d = descriptor();
        assert_eq!(d.root(), Path::new("/var/lib/delimdb/shop"));
        assert_eq!(d.meta_path(), Path::new("/var/lib/delimdb/shop/meta.json"));
        assert_eq!(
            d.table_path("orders"),
            Path::new("/var/lib/delimdb/shop/orders")
        );
    }
}
