//! Caller-facing configuration, validation, and default filling.
//!
//! [`DbConfig`] is what a caller hands to [`Database::open`]; everything is
//! optional except the name. [`normalize`] validates it against the
//! registries and the storage backend and produces a [`NormalizedConfig`],
//! which keeps "explicitly set" distinguishable from "defaulted" so that
//! reconciliation can tell an override from an omission.
//!
//! [`Database::open`]: crate::Database::open

use crate::crypto;
use crate::error::{CoreError, CoreResult};
use crate::hooks::{self, ExtensionPoints, HookPoint};
use crate::meta::{CipherKind, CodecKind};
use crate::prefix::{self, PrefixKind};
use delimdb_codec::registry as codec_registry;
use delimdb_storage::StorageBackend;
use std::path::PathBuf;

/// Default root under which databases live when no location is given.
pub const DEFAULT_LOCATION: &str = "/var/lib/delimdb";

/// Default segment size limit in bytes (100 KiB).
pub const DEFAULT_FILE_SIZE_LIMIT: u64 = 102_400;

/// Minimum length of a caller-supplied encryption key.
pub const ENCRYPTION_KEY_MIN_LENGTH: usize = 40;

/// A segment size limit: raw bytes or a size-with-unit string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeLimit {
    /// Size in bytes.
    Bytes(u64),
    /// Size with unit, e.g. `"1MB"`. Recognized suffixes: `KB`, `KiB`,
    /// `MB`, `MiB` (case-insensitive); a bare number is bytes.
    Text(String),
}

impl From<u64> for SizeLimit {
    fn from(bytes: u64) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&str> for SizeLimit {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for SizeLimit {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Configuration for opening a database. All fields except `name` are
/// optional; unset fields fall back to defaults on creation and to the
/// stored descriptor on re-open.
#[derive(Debug, Clone, Default)]
pub struct DbConfig {
    /// Database name. Required, identifier-safe.
    pub name: String,
    /// Directory under which the database directory is created.
    pub location: Option<PathBuf>,
    /// Segment size limit.
    pub file_size_limit: Option<SizeLimit>,
    /// Whether to encrypt table data.
    pub encrypt: Option<bool>,
    /// Key for the cipher; required when enabling encryption.
    pub encryption_key: Option<String>,
    /// Table-name prefix.
    pub prefix: Option<PrefixKind>,
    /// Codec identifier (`"csv"`, `"tsv"`, `"rec"`, or a custom id).
    pub codec: Option<String>,
    /// Cipher identifier (`"box"` or a custom id).
    pub cipher: Option<String>,
    /// Hook identifier overrides.
    pub hooks: ExtensionPoints,
}

impl DbConfig {
    /// Creates a configuration for the named database.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the parent directory of the database.
    #[must_use]
    pub fn location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the segment size limit (bytes or a string like `"1MB"`).
    #[must_use]
    pub fn file_size_limit(mut self, limit: impl Into<SizeLimit>) -> Self {
        self.file_size_limit = Some(limit.into());
        self
    }

    /// Enables or disables table data encryption.
    #[must_use]
    pub fn encrypt(mut self, on: bool) -> Self {
        self.encrypt = Some(on);
        self
    }

    /// Sets the encryption key.
    #[must_use]
    pub fn encryption_key(mut self, key: impl Into<String>) -> Self {
        self.encryption_key = Some(key.into());
        self
    }

    /// Sets a literal table-name prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(PrefixKind::Literal(prefix.into()));
        self
    }

    /// References a registered prefix generator by identifier.
    #[must_use]
    pub fn prefix_generator(mut self, identifier: impl Into<String>) -> Self {
        self.prefix = Some(PrefixKind::Generator(identifier.into()));
        self
    }

    /// Sets the codec identifier.
    #[must_use]
    pub fn codec(mut self, identifier: impl Into<String>) -> Self {
        self.codec = Some(identifier.into());
        self
    }

    /// Sets the cipher identifier.
    #[must_use]
    pub fn cipher(mut self, identifier: impl Into<String>) -> Self {
        self.cipher = Some(identifier.into());
        self
    }

    /// Binds a registered hook identifier to a lifecycle point.
    #[must_use]
    pub fn hook(mut self, point: HookPoint, identifier: impl Into<String>) -> Self {
        self.hooks.set(point, Some(identifier.into()));
        self
    }
}

/// A validated, unit-converted configuration ready to seed or reconcile a
/// descriptor.
///
/// Reconcile-sensitive fields stay `Option` so the [`Reconciler`] can tell
/// an explicit override from an omission; [`Database::open`] applies the
/// creation defaults when building a fresh descriptor.
///
/// [`Reconciler`]: crate::reconcile::reconcile
/// [`Database::open`]: crate::Database::open
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedConfig {
    /// Validated database name.
    pub name: String,
    /// Resolved parent directory.
    pub location: PathBuf,
    /// Size limit in bytes, if explicitly set.
    pub file_size_limit: Option<u64>,
    /// Encryption flag, if explicitly set.
    pub encrypt: Option<bool>,
    /// Encryption key, if given.
    pub encryption_key: Option<String>,
    /// Prefix, if explicitly set.
    pub prefix: Option<PrefixKind>,
    /// Codec kind, if explicitly set.
    pub codec: Option<CodecKind>,
    /// Cipher kind, if explicitly set.
    pub cipher: Option<CipherKind>,
    /// Hook overrides.
    pub hooks: ExtensionPoints,
}

impl From<NormalizedConfig> for DbConfig {
    fn from(normalized: NormalizedConfig) -> Self {
        Self {
            name: normalized.name,
            location: Some(normalized.location),
            file_size_limit: normalized.file_size_limit.map(SizeLimit::Bytes),
            encrypt: normalized.encrypt,
            encryption_key: normalized.encryption_key,
            prefix: normalized.prefix,
            codec: normalized
                .codec
                .map(|kind| kind.identifier().to_string()),
            cipher: normalized
                .cipher
                .map(|kind| kind.identifier().to_string()),
            hooks: normalized.hooks,
        }
    }
}

/// Validates a caller configuration and fills defaults.
///
/// Pure apart from the read-only writability probe against the backend.
/// Idempotent: normalizing the output again yields the same value.
///
/// # Errors
///
/// Returns a `Config` error describing the first rule violated; nothing
/// is partially applied.
pub fn normalize(
    config: &DbConfig,
    backend: &dyn StorageBackend,
) -> CoreResult<NormalizedConfig> {
    if !is_identifier(&config.name) {
        return Err(CoreError::config(format!(
            "name must be a non-empty string of [A-Za-z0-9_], got {:?}",
            config.name
        )));
    }

    let location = match &config.location {
        Some(path) => {
            if !backend.has_write_access(path) {
                return Err(CoreError::config(format!(
                    "location is not a writable directory: {}",
                    path.display()
                )));
            }
            path.clone()
        }
        None => PathBuf::from(DEFAULT_LOCATION),
    };

    let file_size_limit = match &config.file_size_limit {
        Some(SizeLimit::Bytes(bytes)) => Some(positive(*bytes)?),
        Some(SizeLimit::Text(text)) => Some(positive(parse_size(text)?)?),
        None => None,
    };

    if config.encrypt == Some(true) {
        let key = config
            .encryption_key
            .as_deref()
            .ok_or_else(|| CoreError::config("encryption key is required when encryption is enabled"))?;
        validate_encryption_key(key)?;
    }

    if let Some(prefix) = &config.prefix {
        match prefix {
            PrefixKind::Literal(literal) if literal.is_empty() => {
                return Err(CoreError::config("prefix must be a non-empty string"));
            }
            PrefixKind::Generator(identifier) if !prefix::is_registered(identifier) => {
                return Err(CoreError::config(format!(
                    "prefix generator not registered: {identifier}"
                )));
            }
            _ => {}
        }
    }

    let codec = match &config.codec {
        Some(identifier) => {
            if !codec_registry::is_registered(identifier) {
                return Err(CoreError::config(format!(
                    "codec not registered: {identifier}"
                )));
            }
            Some(CodecKind::from_identifier(identifier))
        }
        None => None,
    };

    let cipher = match &config.cipher {
        Some(identifier) => {
            if !crypto::is_registered(identifier) {
                return Err(CoreError::config(format!(
                    "cipher not registered: {identifier}"
                )));
            }
            Some(CipherKind::from_identifier(identifier))
        }
        None => None,
    };

    for point in HookPoint::ALL {
        if let Some(identifier) = config.hooks.get(point) {
            if !hooks::is_registered(identifier) {
                return Err(CoreError::config(format!(
                    "hook not registered: {identifier}"
                )));
            }
        }
    }

    Ok(NormalizedConfig {
        name: config.name.clone(),
        location,
        file_size_limit,
        encrypt: config.encrypt,
        encryption_key: config.encryption_key.clone(),
        prefix: config.prefix.clone(),
        codec,
        cipher,
        hooks: config.hooks.clone(),
    })
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn positive(bytes: u64) -> CoreResult<u64> {
    if bytes == 0 {
        return Err(CoreError::config("fileSizeLimit must be a positive number"));
    }
    Ok(bytes)
}

fn validate_encryption_key(key: &str) -> CoreResult<()> {
    if key.chars().count() < ENCRYPTION_KEY_MIN_LENGTH {
        return Err(CoreError::config(format!(
            "encryption key must be at least {ENCRYPTION_KEY_MIN_LENGTH} characters"
        )));
    }
    let has_letter = key.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = key.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(CoreError::config(
            "encryption key must contain at least one letter and one digit",
        ));
    }
    Ok(())
}

/// Converts a size-with-unit string to bytes.
///
/// Accepts a bare number (bytes) or `<number> <unit>` with unit one of
/// `KB` (10^3), `KiB` (2^10), `MB` (10^6), `MiB` (2^20), matched
/// case-insensitively.
pub fn parse_size(text: &str) -> CoreResult<u64> {
    let trimmed = text.trim();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(digits_end);

    let number: u64 = digits.parse().map_err(|_| {
        CoreError::config(format!("unrecognized size value: {text:?}"))
    })?;

    let multiplier = match unit.trim().to_ascii_lowercase().as_str() {
        "" => 1,
        "kb" => 1_000,
        "kib" => 1 << 10,
        "mb" => 1_000_000,
        "mib" => 1 << 20,
        _ => {
            return Err(CoreError::config(format!(
                "unrecognized size unit in {text:?}"
            )))
        }
    };

    number
        .checked_mul(multiplier)
        .ok_or_else(|| CoreError::config(format!("size value overflows: {text:?}")))
}
