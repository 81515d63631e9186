//! Error types for codec operations.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding or registry mutation.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A field contains the codec's delimiter or a record separator.
    ///
    /// The built-in codecs perform no quoting or escaping, so such a field
    /// cannot survive a round trip and is rejected up front.
    #[error("field {field:?} cannot be encoded with delimiter {delimiter:?}")]
    UnencodableField {
        /// The offending field value.
        field: String,
        /// The delimiter it collides with.
        delimiter: String,
    },

    /// Attempted to register an identifier that is already taken.
    ///
    /// The registry is append-only; built-ins cannot be shadowed.
    #[error("codec identifier already registered: {identifier}")]
    AlreadyRegistered {
        /// The duplicate identifier.
        identifier: String,
    },
}
