//! Extension-point hooks and the process-wide hook registry.
//!
//! A descriptor stores hook *identifiers*, never code. Identifiers are
//! resolved against this registry at open time and whenever a hook slot is
//! rebound; an identifier that is no longer registered in the running
//! process is a configuration error rather than a silent no-op.

use crate::error::{CoreError, CoreResult};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// The eight lifecycle hook slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    /// Before a row insert.
    BeforeInsert,
    /// After a row insert.
    AfterInsert,
    /// Before a row select.
    BeforeSelect,
    /// After a row select.
    AfterSelect,
    /// Before a row update.
    BeforeUpdate,
    /// After a row update.
    AfterUpdate,
    /// Before a row delete.
    BeforeDelete,
    /// After a row delete.
    AfterDelete,
}

impl HookPoint {
    /// All hook points, in descriptor order.
    pub const ALL: [HookPoint; 8] = [
        HookPoint::BeforeInsert,
        HookPoint::AfterInsert,
        HookPoint::BeforeSelect,
        HookPoint::AfterSelect,
        HookPoint::BeforeUpdate,
        HookPoint::AfterUpdate,
        HookPoint::BeforeDelete,
        HookPoint::AfterDelete,
    ];
}

/// The named hook slots of a descriptor.
///
/// Each slot optionally references a callback registered in the hook
/// registry by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionPoints {
    /// Hook bound before inserts.
    pub before_insert: Option<String>,
    /// Hook bound after inserts.
    pub after_insert: Option<String>,
    /// Hook bound before selects.
    pub before_select: Option<String>,
    /// Hook bound after selects.
    pub after_select: Option<String>,
    /// Hook bound before updates.
    pub before_update: Option<String>,
    /// Hook bound after updates.
    pub after_update: Option<String>,
    /// Hook bound before deletes.
    pub before_delete: Option<String>,
    /// Hook bound after deletes.
    pub after_delete: Option<String>,
}

impl ExtensionPoints {
    /// Returns the identifier bound to `point`, if any.
    #[must_use]
    pub fn get(&self, point: HookPoint) -> Option<&str> {
        match point {
            HookPoint::BeforeInsert => self.before_insert.as_deref(),
            HookPoint::AfterInsert => self.after_insert.as_deref(),
            HookPoint::BeforeSelect => self.before_select.as_deref(),
            HookPoint::AfterSelect => self.after_select.as_deref(),
            HookPoint::BeforeUpdate => self.before_update.as_deref(),
            HookPoint::AfterUpdate => self.after_update.as_deref(),
            HookPoint::BeforeDelete => self.before_delete.as_deref(),
            HookPoint::AfterDelete => self.after_delete.as_deref(),
        }
    }

    /// Binds `identifier` to `point`.
    pub fn set(&mut self, point: HookPoint, identifier: Option<String>) {
        let slot = match point {
            HookPoint::BeforeInsert => &mut self.before_insert,
            HookPoint::AfterInsert => &mut self.after_insert,
            HookPoint::BeforeSelect => &mut self.before_select,
            HookPoint::AfterSelect => &mut self.after_select,
            HookPoint::BeforeUpdate => &mut self.before_update,
            HookPoint::AfterUpdate => &mut self.after_update,
            HookPoint::BeforeDelete => &mut self.before_delete,
            HookPoint::AfterDelete => &mut self.after_delete,
        };
        *slot = identifier;
    }
}

/// Context passed to a hook when it fires.
#[derive(Debug)]
pub struct HookEvent<'a> {
    /// The table the operation targets.
    pub table: &'a str,
    /// Which lifecycle slot fired.
    pub point: HookPoint,
}

/// A registered hook callback.
pub type Hook = Arc<dyn Fn(&HookEvent<'_>) + Send + Sync>;

fn hook_registry() -> &'static RwLock<HashMap<String, Hook>> {
    static REGISTRY: OnceLock<RwLock<HashMap<String, Hook>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Registers a hook callback under `identifier`.
///
/// # Errors
///
/// Returns a `Config` error if the identifier is already taken; the
/// registry is append-only.
pub fn register(identifier: &str, hook: Hook) -> CoreResult<()> {
    let mut map = hook_registry().write();
    if map.contains_key(identifier) {
        return Err(CoreError::config(format!(
            "hook identifier already registered: {identifier}"
        )));
    }
    map.insert(identifier.to_string(), hook);
    Ok(())
}

/// Looks up a hook by identifier.
#[must_use]
pub fn lookup(identifier: &str) -> Option<Hook> {
    hook_registry().read().get(identifier).cloned()
}

/// Returns whether `identifier` names a registered hook.
#[must_use]
pub fn is_registered(identifier: &str) -> bool {
    hook_registry().read().contains_key(identifier)
}
