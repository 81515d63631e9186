//! Reconciliation of a stored descriptor with an incoming configuration.
//!
//! When a database is re-opened, the caller's configuration may differ
//! from what the descriptor recorded. Reconciliation merges the two:
//! identity fields always win from the stored side, explicitly-set soft
//! fields win from the incoming side, and incompatible combinations are
//! rejected before anything is persisted.

use crate::config::NormalizedConfig;
use crate::error::{CoreError, CoreResult};
use crate::hooks::{self, HookPoint};
use crate::meta::{now_millis, CipherKind, MetaDescriptor};
use crate::prefix::{self, PrefixKind};

/// Merges `incoming` into `stored`, producing the descriptor to persist.
///
/// `stored` is not modified; on error nothing is partially applied. The
/// caller is responsible for refreshing the checksum and persisting the
/// result.
///
/// # Errors
///
/// Returns a `Config` error when the incoming configuration conflicts
/// with a fixed binding (codec, cipher) or references a hook or prefix
/// generator that is no longer registered in this process.
pub fn reconcile(
    stored: &MetaDescriptor,
    incoming: &NormalizedConfig,
) -> CoreResult<MetaDescriptor> {
    let mut merged = stored.clone();

    // The codec is fixed at creation: stored table data is already encoded
    // with it, so a different request is an error rather than an override.
    if let Some(codec) = &incoming.codec {
        if *codec != stored.codec_kind {
            return Err(CoreError::config(format!(
                "codec cannot change after creation: stored {}, requested {}",
                stored.codec_kind.identifier(),
                codec.identifier()
            )));
        }
    }

    if let Some(limit) = incoming.file_size_limit {
        merged.file_size_limit = limit;
    }

    if let Some(prefix) = &incoming.prefix {
        merged.prefix = prefix.clone();
    } else if let PrefixKind::Generator(identifier) = &stored.prefix {
        // A kept generator must still resolve in this process.
        if !prefix::is_registered(identifier) {
            return Err(CoreError::config(format!(
                "prefix generator not registered: {identifier}"
            )));
        }
    }

    for point in HookPoint::ALL {
        match incoming.hooks.get(point) {
            Some(identifier) => {
                merged
                    .extension_points
                    .set(point, Some(identifier.to_string()));
            }
            None => {
                if let Some(identifier) = stored.extension_points.get(point) {
                    if !hooks::is_registered(identifier) {
                        return Err(CoreError::config(format!(
                            "hook not registered: {identifier}"
                        )));
                    }
                }
            }
        }
    }

    match incoming.encrypt {
        Some(true) if !stored.encrypt => {
            merged.encrypt = true;
            merged.cipher_kind = Some(
                incoming
                    .cipher
                    .clone()
                    .unwrap_or(CipherKind::Builtin),
            );
        }
        Some(false) if stored.encrypt => {
            if incoming.cipher.is_some() {
                return Err(CoreError::config(
                    "cipher specified while disabling encryption",
                ));
            }
            merged.encrypt = false;
            merged.cipher_kind = None;
        }
        _ => {
            // Encryption state unchanged: a cipher request must agree with
            // the stored binding.
            if let Some(cipher) = &incoming.cipher {
                match &stored.cipher_kind {
                    Some(bound) if bound == cipher => {}
                    Some(bound) => {
                        return Err(CoreError::config(format!(
                            "cipher cannot change while encryption stays on: stored {}, requested {}",
                            bound.identifier(),
                            cipher.identifier()
                        )));
                    }
                    None => {
                        return Err(CoreError::config(
                            "cipher specified but encryption is disabled",
                        ));
                    }
                }
            }
        }
    }

    merged.last_update = now_millis();
    Ok(merged)
}
