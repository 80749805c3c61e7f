//! xlook-core decodes experiment files written by the xlook data-acquisition
//! tool into a randomly accessible column set.
//!
//! Two encodings exist. The binary one is a fixed-endian header with 32 fixed
//! channel slots followed by column-major `f64` samples in a caller-chosen
//! byte order; the text one is five header lines and whitespace-separated
//! rows. Format decoders (layout/reader/parser) are pure and side-effect
//! free; file access lives in `source`, and `decode` ties the two together.
//!
//! Invariants:
//! - A decoded table has `record_count` rows and one column per channel.
//! - Column `c` holds real samples only in rows `0..channels[c].sample_count`;
//!   the rest is `FILL_VALUE` (zero).
//! - Decoding either returns a complete table or a typed error, never a
//!   partial result.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use xlook_core::{Endianness, decode_binary_file};
//!
//! let table = decode_binary_file(Path::new("p4581.bin"), Endianness::Little)?;
//! for column in table.columns() {
//!     println!("{}: {} samples", column.descriptor.name, column.values().len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod decode;
pub mod formats;
mod source;
mod table;

pub use decode::{
    DecodeError, ErrorKind, decode_ascii, decode_ascii_file, decode_binary, decode_binary_file,
    decode_bytes, decode_file,
};
pub use formats::binary::Endianness;
pub use source::{InputFormat, SourceError, detect_format, read_source};
pub use table::{Column, DecodedTable, FILL_VALUE, Layout, NumericBuffer, assemble_rows};

/// Current summary schema version.
pub const SUMMARY_VERSION: u32 = 1;

/// One retained channel: a named, unit-tagged column.
///
/// # Examples
/// ```
/// use xlook_core::ChannelDescriptor;
///
/// let channel = ChannelDescriptor {
///     name: "LP_Disp".to_string(),
///     units: "mm".to_string(),
///     sample_count: 1200,
/// };
/// assert_eq!(channel.sample_count, 1200);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDescriptor {
    /// Channel name, padding removed.
    pub name: String,
    /// Units label, padding removed.
    pub units: String,
    /// Number of real samples in this channel's column.
    pub sample_count: usize,
}

/// Binary file preamble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHeader {
    pub experiment_name: String,
    /// Maximum number of rows across all channels.
    pub record_count: usize,
    /// Number of retained channels.
    pub column_count: usize,
    /// Unused by current xlook versions; kept as read.
    pub legacy_sweep: i32,
    /// Unused by current xlook versions; kept as read.
    pub legacy_timestamp: i32,
}

/// Tool metadata embedded in summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Input file metadata embedded in summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the decoder.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
    /// Encoding the file was decoded as.
    pub format: InputFormat,
    /// Payload byte order, for binary input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endianness: Option<Endianness>,
}

/// Provenance report for a decoded file: what was read, not the samples.
///
/// # Examples
/// ```
/// use xlook_core::{InputFormat, summarize, DecodedTable, NumericBuffer};
///
/// let table = DecodedTable {
///     header: None,
///     channels: Vec::new(),
///     data: NumericBuffer::zeroed(0, 0).unwrap(),
/// };
/// let summary = summarize("run.txt", 10, InputFormat::Ascii, None, &table);
/// assert_eq!(summary.summary_version, xlook_core::SUMMARY_VERSION);
/// assert!(summary.experiment_name.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSummary {
    pub summary_version: u32,
    pub tool: ToolInfo,
    pub input: InputInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experiment_name: Option<String>,
    pub record_count: usize,
    pub column_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_sweep: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_timestamp: Option<i32>,
    /// Channels in on-disk order.
    pub channels: Vec<ChannelDescriptor>,
}

/// Build the provenance summary for a decoded table.
pub fn summarize(
    input_path: &str,
    input_bytes: u64,
    format: InputFormat,
    endianness: Option<Endianness>,
    table: &DecodedTable,
) -> TableSummary {
    let header = table.header.as_ref();
    TableSummary {
        summary_version: SUMMARY_VERSION,
        tool: ToolInfo {
            name: "xlook".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
            format,
            endianness,
        },
        experiment_name: header.map(|h| h.experiment_name.clone()),
        record_count: table.record_count(),
        column_count: table.column_count(),
        legacy_sweep: header.map(|h| h.legacy_sweep),
        legacy_timestamp: header.map(|h| h.legacy_timestamp),
        channels: table.channels.clone(),
    }
}
