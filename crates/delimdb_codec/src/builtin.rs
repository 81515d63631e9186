//! Built-in codecs: csv, tsv, rec.

use crate::Codec;

/// Comma-separated values, one record per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvCodec;

impl Codec for CsvCodec {
    fn delimiter(&self) -> &str {
        ","
    }
}

/// Tab-separated values, one record per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TsvCodec;

impl Codec for TsvCodec {
    fn delimiter(&self) -> &str {
        "\t"
    }
}

/// Record format: one field per line, records separated by a blank line.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecCodec;

impl Codec for RecCodec {
    fn delimiter(&self) -> &str {
        "\n"
    }

    fn record_separator(&self) -> &str {
        "\n\n"
    }
}
