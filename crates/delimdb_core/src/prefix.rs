//! Table-name prefixes and the prefix-generator registry.
//!
//! A descriptor namespaces table names with a prefix that is either a
//! literal string or a reference to a registered zero-argument generator.
//! Generators must be deterministic so that the same descriptor derives
//! the same table names on every open.

use crate::error::{CoreError, CoreResult};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// The prefix applied to table names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefixKind {
    /// A literal prefix string. May be empty.
    Literal(String),
    /// A reference to a registered prefix generator.
    Generator(String),
}

impl Default for PrefixKind {
    fn default() -> Self {
        Self::Literal(String::new())
    }
}

impl PrefixKind {
    /// Resolves the prefix to a concrete string.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if a referenced generator is not
    /// registered in the running process.
    pub fn resolve(&self) -> CoreResult<String> {
        match self {
            Self::Literal(prefix) => Ok(prefix.clone()),
            Self::Generator(identifier) => {
                let generator = lookup(identifier).ok_or_else(|| {
                    CoreError::config(format!(
                        "prefix generator not registered: {identifier}"
                    ))
                })?;
                Ok(generator())
            }
        }
    }
}

/// A registered zero-argument prefix generator.
pub type PrefixGenerator = Arc<dyn Fn() -> String + Send + Sync>;

fn generator_registry() -> &'static RwLock<HashMap<String, PrefixGenerator>> {
    static REGISTRY: OnceLock<RwLock<HashMap<String, PrefixGenerator>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Registers a prefix generator under `identifier`.
///
/// # Errors
///
/// Returns a `Config` error if the identifier is already taken.
pub fn register(identifier: &str, generator: PrefixGenerator) -> CoreResult<()> {
    let mut map = generator_registry().write();
    if map.contains_key(identifier) {
        return Err(CoreError::config(format!(
            "prefix generator already registered: {identifier}"
        )));
    }
    map.insert(identifier.to_string(), generator);
    Ok(())
}

/// Looks up a prefix generator by identifier.
#[must_use]
pub fn lookup(identifier: &str) -> Option<PrefixGenerator> {
    generator_registry().read().get(identifier).cloned()
}

/// Returns whether `identifier` names a registered generator.
#[must_use]
pub fn is_registered(identifier: &str) -> bool {
    generator_registry().read().contains_key(identifier)
}
