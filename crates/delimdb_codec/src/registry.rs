//! Process-wide codec registry.
//!
//! The registry is an append-only map from identifier to codec
//! implementation, seeded with the built-in `csv`, `tsv`, and `rec` codecs.
//! Callers register additional codecs before opening a database that
//! references them; a missing identifier at lookup time is reported to the
//! caller as a configuration error, never a panic.

use crate::builtin::{CsvCodec, RecCodec, TsvCodec};
use crate::error::{CodecError, CodecResult};
use crate::Codec;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Identifier of the built-in csv codec.
pub const CSV: &str = "csv";
/// Identifier of the built-in tsv codec.
pub const TSV: &str = "tsv";
/// Identifier of the built-in rec codec.
pub const REC: &str = "rec";

fn registry() -> &'static RwLock<HashMap<String, Arc<dyn Codec>>> {
    static REGISTRY: OnceLock<RwLock<HashMap<String, Arc<dyn Codec>>>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut map: HashMap<String, Arc<dyn Codec>> = HashMap::new();
        map.insert(CSV.to_string(), Arc::new(CsvCodec));
        map.insert(TSV.to_string(), Arc::new(TsvCodec));
        map.insert(REC.to_string(), Arc::new(RecCodec));
        RwLock::new(map)
    })
}

/// Registers a codec under `identifier`.
///
/// # Errors
///
/// Returns [`CodecError::AlreadyRegistered`] if the identifier is taken;
/// the registry is append-only and built-ins cannot be replaced.
pub fn register(identifier: &str, codec: Arc<dyn Codec>) -> CodecResult<()> {
    let mut map = registry().write();
    if map.contains_key(identifier) {
        return Err(CodecError::AlreadyRegistered {
            identifier: identifier.to_string(),
        });
    }
    map.insert(identifier.to_string(), codec);
    Ok(())
}

/// Looks up a codec by identifier.
#[must_use]
pub fn lookup(identifier: &str) -> Option<Arc<dyn Codec>> {
    registry().read().get(identifier).cloned()
}

/// Returns whether `identifier` names a registered codec.
#[must_use]
pub fn is_registered(identifier: &str) -> bool {
    registry().read().contains_key(identifier)
}
