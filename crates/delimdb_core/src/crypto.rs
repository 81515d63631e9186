//! Ciphers for table data and the process-wide cipher registry.
//!
//! The built-in `box` cipher is AES-256-GCM. Its key is derived from the
//! caller-supplied encryption key via HKDF-SHA256, so two databases opened
//! with different keys cannot read each other's data. Output is
//! `nonce (12 bytes) || ciphertext || tag (16 bytes)`, hex-armored so it
//! can live inside text segment files.
//!
//! Because the built-in cipher is keyed per database, the registry stores
//! custom cipher *instances* while `box` is resolved structurally: the
//! database constructs a [`BoxCipher`] from the configured key at open.

use crate::error::{CoreError, CoreResult};
use aes_gcm::{
    aead::{generic_array::GenericArray, Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use parking_lot::RwLock;
use rand::RngCore;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use zeroize::Zeroize;

/// Identifier of the built-in cipher.
pub const BOX: &str = "box";

/// Size of the AES-256 key in bytes.
const KEY_SIZE: usize = 32;
/// Size of the GCM nonce in bytes.
const NONCE_SIZE: usize = 12;
/// Size of the GCM authentication tag in bytes.
const TAG_SIZE: usize = 16;

/// A pluggable text cipher.
pub trait Cipher: Send + Sync {
    /// Encrypts `text`, producing armored ciphertext.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if encryption fails.
    fn encrypt(&self, text: &str) -> CoreResult<String>;

    /// Decrypts armored ciphertext produced by [`encrypt`](Self::encrypt).
    ///
    /// # Errors
    ///
    /// Returns a `Corruption` error if the ciphertext is malformed or was
    /// produced under a different key.
    fn decrypt(&self, text: &str) -> CoreResult<String>;
}

/// The built-in AES-256-GCM cipher.
pub struct BoxCipher {
    cipher: Aes256Gcm,
}

impl BoxCipher {
    /// Builds the cipher from a caller-supplied encryption key.
    ///
    /// The key participates in derivation via HKDF-SHA256; it is never
    /// used as raw key material directly.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if key derivation fails.
    pub fn from_key(encryption_key: &str) -> CoreResult<Self> {
        use hkdf::Hkdf;
        use sha2::Sha256;

        let hk = Hkdf::<Sha256>::new(Some(b"delimdb-box-cipher"), encryption_key.as_bytes());
        let mut key_bytes = [0u8; KEY_SIZE];
        hk.expand(b"delimdb-table-data-v1", &mut key_bytes)
            .map_err(|_| CoreError::config("encryption key derivation failed"))?;

        let cipher = Aes256Gcm::new(GenericArray::from_slice(&key_bytes));
        key_bytes.zeroize();
        Ok(Self { cipher })
    }
}

impl Cipher for BoxCipher {
    fn encrypt(&self, text: &str) -> CoreResult<String> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, text.as_bytes())
            .map_err(|_| CoreError::config("encryption failed"))?;

        let mut framed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        framed.extend_from_slice(&nonce_bytes);
        framed.extend(ciphertext);
        Ok(to_hex(&framed))
    }

    fn decrypt(&self, text: &str) -> CoreResult<String> {
        let framed = from_hex(text)?;
        if framed.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CoreError::corruption("ciphertext too short"));
        }

        let nonce = Nonce::from_slice(&framed[..NONCE_SIZE]);
        let plaintext = self
            .cipher
            .decrypt(nonce, &framed[NONCE_SIZE..])
            .map_err(|_| CoreError::corruption("ciphertext failed authentication"))?;

        String::from_utf8(plaintext)
            .map_err(|_| CoreError::corruption("decrypted data is not valid UTF-8"))
    }
}

impl std::fmt::Debug for BoxCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxCipher")
            .field("cipher", &"Aes256Gcm")
            .finish()
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(
        String::with_capacity(bytes.len() * 2),
        |mut out, byte| {
            use std::fmt::Write;
            let _ = write!(out, "{byte:02x}");
            out
        },
    )
}

fn from_hex(text: &str) -> CoreResult<Vec<u8>> {
    let bytes = text.as_bytes();
    if bytes.len() % 2 != 0 {
        return Err(CoreError::corruption("ciphertext hex has odd length"));
    }
    // Byte chunks, not string slices: arbitrary input may not have char
    // boundaries at even offsets.
    bytes
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .ok_or_else(|| CoreError::corruption("ciphertext is not valid hex"))
        })
        .collect()
}

fn cipher_registry() -> &'static RwLock<HashMap<String, Arc<dyn Cipher>>> {
    static REGISTRY: OnceLock<RwLock<HashMap<String, Arc<dyn Cipher>>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Registers a custom cipher under `identifier`.
///
/// # Errors
///
/// Returns a `Config` error if the identifier is already taken or collides
/// with the built-in `box` identifier.
pub fn register(identifier: &str, cipher: Arc<dyn Cipher>) -> CoreResult<()> {
    if identifier == BOX {
        return Err(CoreError::config(
            "cipher identifier already registered: box",
        ));
    }
    let mut map = cipher_registry().write();
    if map.contains_key(identifier) {
        return Err(CoreError::config(format!(
            "cipher identifier already registered: {identifier}"
        )));
    }
    map.insert(identifier.to_string(), cipher);
    Ok(())
}

/// Looks up a custom cipher by identifier.
#[must_use]
pub fn lookup(identifier: &str) -> Option<Arc<dyn Cipher>> {
    cipher_registry().read().get(identifier).cloned()
}

/// Returns whether `identifier` names a usable cipher (built-in or custom).
#[must_use]
pub fn is_registered(identifier: &str) -> bool {
    identifier == BOX || cipher_registry().read().contains_key(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let cipher = BoxCipher::from_key("a-long-enough-key-0123456789-abcdefghij").unwrap();

        let ciphertext = cipher.encrypt("id(Uuid),total(Number)").unwrap();
        assert_ne!(ciphertext, "id(Uuid),total(Number)");
        assert!(ciphertext.chars().all(|c| c.is_ascii_hexdigit()));

        assert_eq!(cipher.decrypt(&ciphertext).unwrap(), "id(Uuid),total(Number)");
    }

    #[test]
    fn nonce_makes_ciphertext_nondeterministic() {
        let cipher = BoxCipher::from_key("a-long-enough-key-0123456789-abcdefghij").unwrap();
        let a = cipher.encrypt("same").unwrap();
        let b = cipher.encrypt("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn key_participates_in_derivation() {
        let one = BoxCipher::from_key("first-key-first-key-first-key-first-1").unwrap();
        let two = BoxCipher::from_key("second-key-second-key-second-key-2").unwrap();

        let ciphertext = one.encrypt("secret").unwrap();
        assert!(matches!(
            two.decrypt(&ciphertext),
            Err(CoreError::Corruption { .. })
        ));
    }

    #[test]
    fn tampered_ciphertext_rejected() {
        let cipher = BoxCipher::from_key("a-long-enough-key-0123456789-abcdefghij").unwrap();
        let mut ciphertext = cipher.encrypt("secret").unwrap();

        // Flip the last hex digit.
        let last = ciphertext.pop().unwrap();
        ciphertext.push(if last == '0' { '1' } else { '0' });

        assert!(matches!(
            cipher.decrypt(&ciphertext),
            Err(CoreError::Corruption { .. })
        ));
    }

    #[test]
    fn malformed_hex_rejected() {
        let cipher = BoxCipher::from_key("a-long-enough-key-0123456789-abcdefghij").unwrap();
        assert!(cipher.decrypt("zz").is_err());
        assert!(cipher.decrypt("abc").is_err());
        assert!(cipher.decrypt("").is_err());
    }

    #[test]
    fn non_ascii_ciphertext_fails_closed() {
        let cipher = BoxCipher::from_key("a-long-enough-key-0123456789-abcdefghij").unwrap();

        // Multi-byte characters land mid-pair; decrypt must return an
        // error, never panic on a char boundary.
        for garbled in ["\u{20ac}a", "a\u{20ac}", "\u{20ac}\u{20ac}", "é0"] {
            assert!(matches!(
                cipher.decrypt(garbled),
                Err(CoreError::Corruption { .. })
            ));
        }
    }

    #[test]
    fn registry_knows_builtin_and_customs() {
        assert!(is_registered(BOX));
        assert!(!is_registered("crypto-test-rot13"));

        struct NullCipher;
        impl Cipher for NullCipher {
            fn encrypt(&self, text: &str) -> CoreResult<String> {
                Ok(text.to_string())
            }
            fn decrypt(&self, text: &str) -> CoreResult<String> {
                Ok(text.to_string())
            }
        }

        register("crypto-test-rot13", Arc::new(NullCipher)).unwrap();
        assert!(is_registered("crypto-test-rot13"));
        assert!(lookup("crypto-test-rot13").is_some());

        // box cannot be shadowed
        assert!(register(BOX, Arc::new(NullCipher)).is_err());
    }
}
