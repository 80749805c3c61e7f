use std::path::Path;

use thiserror::Error;

use crate::formats::ascii::{self, AsciiHeader, LineReader, error::AsciiError};
use crate::formats::binary::{self, BinaryHeader, Endianness, FieldReader, error::BinaryError};
use crate::source::{InputFormat, SourceError, detect_format, read_source};
use crate::table::DecodedTable;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("source error: {0}")]
    Source(#[from] SourceError),
    #[error("binary decode error: {0}")]
    Binary(#[from] BinaryError),
    #[error("text decode error: {0}")]
    Ascii(#[from] AsciiError),
}

/// Failure category, independent of the input encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SourceUnavailable,
    TruncatedInput,
    MalformedHeader,
    SchemaMismatch,
    InvalidEndianness,
    InvalidNumber,
}

impl DecodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::Source(SourceError::Unavailable { .. }) => ErrorKind::SourceUnavailable,
            DecodeError::Binary(err) => match err {
                BinaryError::Truncated { .. } => ErrorKind::TruncatedInput,
                BinaryError::MalformedHeader { .. } => ErrorKind::MalformedHeader,
                BinaryError::SchemaMismatch { .. } => ErrorKind::SchemaMismatch,
                BinaryError::InvalidEndianness { .. } => ErrorKind::InvalidEndianness,
            },
            DecodeError::Ascii(err) => match err {
                AsciiError::MissingLine { .. } | AsciiError::ShortRow { .. } => {
                    ErrorKind::TruncatedInput
                }
                AsciiError::MalformedHeader { .. } | AsciiError::TooManyRows { .. } => {
                    ErrorKind::MalformedHeader
                }
                AsciiError::SchemaMismatch { .. } => ErrorKind::SchemaMismatch,
                AsciiError::InvalidNumber { .. } => ErrorKind::InvalidNumber,
            },
        }
    }
}

/// Decode an in-memory xlook binary image.
///
/// # Examples
/// ```
/// use xlook_core::{Endianness, ErrorKind, decode_binary};
///
/// let err = decode_binary(&[0u8; 10], Endianness::Little).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::TruncatedInput);
/// ```
///
/// # Errors
/// Any `BinaryError` raised by the header parser or the payload decoder.
pub fn decode_binary(bytes: &[u8], endianness: Endianness) -> Result<DecodedTable, DecodeError> {
    let mut reader = FieldReader::new(bytes);
    let BinaryHeader { header, channels } = binary::parse_header(&mut reader)?;
    let data = binary::decode_payload(&mut reader, &channels, header.record_count, endianness)?;
    Ok(DecodedTable {
        header: Some(header),
        channels,
        data,
    })
}

/// Decode the text encoding.
pub fn decode_ascii(text: &str) -> Result<DecodedTable, DecodeError> {
    let mut reader = LineReader::new(text);
    let header = ascii::parse_header(&mut reader)?;
    let data = ascii::decode_rows(&mut reader, &header)?;
    let AsciiHeader { channels, .. } = header;
    Ok(DecodedTable {
        header: None,
        channels,
        data,
    })
}

pub fn decode_binary_file(path: &Path, endianness: Endianness) -> Result<DecodedTable, DecodeError> {
    let bytes = read_source(path)?;
    decode_binary(&bytes, endianness)
}

pub fn decode_ascii_file(path: &Path) -> Result<DecodedTable, DecodeError> {
    let bytes = read_source(path)?;
    decode_ascii(&String::from_utf8_lossy(&bytes))
}

/// Decode bytes in the given format, detecting it when `format` is `None`.
///
/// `endianness` only applies to binary input. Returns the format used.
pub fn decode_bytes(
    bytes: &[u8],
    format: Option<InputFormat>,
    endianness: Endianness,
) -> Result<(InputFormat, DecodedTable), DecodeError> {
    let format = format.unwrap_or_else(|| detect_format(bytes));
    let table = match format {
        InputFormat::Binary => decode_binary(bytes, endianness)?,
        InputFormat::Ascii => decode_ascii(&String::from_utf8_lossy(bytes))?,
    };
    Ok((format, table))
}

/// File variant of `decode_bytes`.
pub fn decode_file(
    path: &Path,
    format: Option<InputFormat>,
    endianness: Endianness,
) -> Result<(InputFormat, DecodedTable), DecodeError> {
    let bytes = read_source(path)?;
    decode_bytes(&bytes, format, endianness)
}
