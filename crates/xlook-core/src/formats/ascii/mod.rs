//! xlook text (ASCII) decoding.
//!
//! Five header lines carry the record count, a column-number line, 12-char
//! wide headings and units, and per-column record counts. Data rows follow as
//! whitespace-separated numbers, the first of which is the row number. The
//! row number is exposed as an explicit `row_num` channel so the result has
//! the same shape as a binary decode.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::{AsciiHeader, decode_rows, parse_header};
pub use reader::LineReader;
