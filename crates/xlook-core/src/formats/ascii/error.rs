use thiserror::Error;

/// Errors returned by text (ASCII) decoding. Line numbers are 1-based.
///
/// # Examples
/// ```
/// use xlook_core::formats::ascii::error::AsciiError;
///
/// let err = AsciiError::MissingLine {
///     line: 3,
///     field: "column headings",
/// };
/// assert!(err.to_string().contains("line 3"));
/// ```
#[derive(Debug, Error)]
pub enum AsciiError {
    #[error("truncated input: missing {field} at line {line}")]
    MissingLine { line: usize, field: &'static str },
    #[error("truncated row at line {line}: need {needed} values, got {actual}")]
    ShortRow {
        line: usize,
        needed: usize,
        actual: usize,
    },
    #[error("malformed {field} at line {line}: '{value}'")]
    MalformedHeader {
        line: usize,
        field: &'static str,
        value: String,
    },
    #[error("schema mismatch: {declared} columns declared, found {found} {field}")]
    SchemaMismatch {
        field: &'static str,
        declared: usize,
        found: usize,
    },
    #[error("invalid number '{token}' at line {line}, column {column}")]
    InvalidNumber {
        line: usize,
        column: usize,
        token: String,
    },
    #[error("line {line} exceeds the declared {record_count} records")]
    TooManyRows { line: usize, record_count: usize },
}
