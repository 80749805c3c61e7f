use thiserror::Error;

/// Errors returned by binary header and payload decoding.
///
/// # Examples
/// ```
/// use xlook_core::formats::binary::error::BinaryError;
///
/// let err = BinaryError::InvalidEndianness {
///     value: "middle".to_string(),
/// };
/// assert!(err.to_string().contains("invalid endianness"));
/// ```
#[derive(Debug, Error)]
pub enum BinaryError {
    #[error("truncated input reading {field} at offset {offset}: need {needed} bytes, got {actual}")]
    Truncated {
        field: &'static str,
        offset: usize,
        needed: usize,
        actual: usize,
    },
    #[error("malformed header field {field} at offset {offset}: {value}")]
    MalformedHeader {
        field: &'static str,
        offset: usize,
        value: i64,
    },
    #[error("schema mismatch: header declares {declared} columns, found {found} channels")]
    SchemaMismatch { declared: usize, found: usize },
    #[error("invalid endianness '{value}': expected 'little' or 'big'")]
    InvalidEndianness { value: String },
}
