//! # delimdb Codec
//!
//! Delimiter-text row codecs for delimdb.
//!
//! A [`Codec`] converts between structured rows (`Vec<Vec<String>>`) and a
//! delimited text encoding. Three built-ins are seeded into the process-wide
//! [`registry`]:
//!
//! - `csv` - fields separated by `,`, records by newline
//! - `tsv` - fields separated by tab, records by newline
//! - `rec` - one field per line, records separated by a blank line
//!
//! The built-ins perform no quoting: a field containing its codec's
//! delimiter or record separator is rejected at encode time rather than
//! silently corrupting the stream.
//!
//! ## Usage
//!
//! ```
//! use delimdb_codec::{registry, CsvCodec, Codec};
//!
//! let codec = CsvCodec;
//! let rows = vec![vec!["id".to_string(), "total".to_string()]];
//! assert_eq!(codec.encode(&rows).unwrap(), "id,total");
//! assert_eq!(codec.decode("id,total"), rows);
//!
//! // The same codec is reachable by identifier:
//! assert!(registry::lookup("csv").is_some());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod builtin;
mod error;
pub mod registry;

pub use builtin::{CsvCodec, RecCodec, TsvCodec};
pub use error::{CodecError, CodecResult};

/// A pluggable row codec with a fixed field delimiter.
pub trait Codec: Send + Sync {
    /// The field delimiter this codec writes between values.
    fn delimiter(&self) -> &str;

    /// The separator this codec writes between records.
    fn record_separator(&self) -> &str {
        "\n"
    }

    /// Encodes rows into delimited text.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnencodableField`] if any field contains the
    /// delimiter or the record separator.
    fn encode(&self, rows: &[Vec<String>]) -> CodecResult<String> {
        let delimiter = self.delimiter();
        let separator = self.record_separator();

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            for field in row {
                if field.contains(delimiter) || field.contains(separator) {
                    return Err(CodecError::UnencodableField {
                        field: field.clone(),
                        delimiter: delimiter.to_string(),
                    });
                }
            }
            records.push(row.join(delimiter));
        }

        Ok(records.join(separator))
    }

    /// Decodes delimited text back into rows.
    ///
    /// Empty input decodes to no rows.
    fn decode(&self, text: &str) -> Vec<Vec<String>> {
        if text.is_empty() {
            return Vec::new();
        }

        text.split(self.record_separator())
            .map(|record| {
                record
                    .split(self.delimiter())
                    .map(str::to_string)
                    .collect()
            })
            .collect()
    }
}
