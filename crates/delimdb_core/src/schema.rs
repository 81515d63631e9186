//! Table schemas: column types, validation, and column-title derivation.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The recognized column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// Numeric values, integer or float.
    Number,
    /// String values of any length.
    Text,
    /// Boolean values.
    Boolean,
    /// Serializable object-like values.
    Struct,
    /// Binary string values.
    Binary,
    /// Universally unique identifiers.
    Uuid,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Number => "Number",
            Self::Text => "Text",
            Self::Boolean => "Boolean",
            Self::Struct => "Struct",
            Self::Binary => "Binary",
            Self::Uuid => "Uuid",
        };
        f.write_str(name)
    }
}

/// A table schema: column name to column type.
pub type Schema = BTreeMap<String, ColumnType>;

/// Validates a schema: every column name must be non-empty after trimming.
///
/// # Errors
///
/// Returns a `Schema` error naming the first invalid column.
pub fn validate(schema: &Schema) -> CoreResult<()> {
    if schema.is_empty() {
        return Err(CoreError::schema("schema has no columns"));
    }
    for name in schema.keys() {
        if name.trim().is_empty() {
            return Err(CoreError::schema("column name is empty"));
        }
    }
    Ok(())
}

/// Derives the column-title fields for a schema: `name(Type)` per column.
///
/// The resulting row is encoded through the database codec to produce the
/// first line of a fresh table's initial segment.
#[must_use]
pub fn column_titles(schema: &Schema) -> Vec<String> {
    schema
        .iter()
        .map(|(name, column_type)| format!("{}({column_type})", name.trim()))
        .collect()
}
