//! Integrity digest over the metadata descriptor.
//!
//! The digest is SHA-256 over the canonical descriptor payload with a fixed
//! salt split in half around it. Both [`digest`] and [`verify`] are pure
//! functions: the result depends only on the arguments, never on call
//! history, so a checksum written by one process verifies in another.
//!
//! This is the only gate between "corrupted metadata" and "silently
//! trusting bad state". It runs on every load before any descriptor field
//! is used for decision-making, and [`verify`] fails closed.

use sha2::{Digest, Sha256};

/// Fixed digest salt. Halved around the payload before hashing.
const SALT: &[u8] = b"s(IsCt--ZnXwcaH2CshnaTa8UB?6thbPCxNFDkt5rKKyhwG4ztIMq6!x1A6>";

/// Computes the hex-encoded SHA-256 digest of `payload`.
#[must_use]
pub fn digest(payload: &str) -> String {
    let half = SALT.len() / 2;

    let mut hasher = Sha256::new();
    hasher.update(&SALT[..half]);
    hasher.update(payload.as_bytes());
    hasher.update(&SALT[half..]);

    let bytes = hasher.finalize();
    bytes.iter().fold(
        String::with_capacity(bytes.len() * 2),
        |mut out, byte| {
            use std::fmt::Write;
            let _ = write!(out, "{byte:02x}");
            out
        },
    )
}

/// Verifies that `checksum` is the digest of `payload`.
///
/// Fails closed: an empty or malformed checksum is a mismatch, never a
/// pass.
#[must_use]
pub fn verify(payload: &str, checksum: &str) -> bool {
    !checksum.is_empty() && digest(payload) == checksum
}
