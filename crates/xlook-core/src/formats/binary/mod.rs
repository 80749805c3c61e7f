//! xlook binary decoding.
//!
//! The file is a 36-byte preamble, a table of 32 fixed 84-byte channel
//! descriptor slots and a column-major region of 8-byte floats. Nothing is
//! length-prefixed: every offset follows from the widths in `layout`, so the
//! decoder walks the file once with a single `FieldReader` cursor.
//!
//! Header integers are big-endian. Payload samples use the caller's
//! `Endianness` (little by default). Slots whose name starts with `no_val`
//! are unused and dropped from the schema; the declared column count must
//! match the retained slots. Columns shorter than the record count are
//! zero-filled in the resulting `NumericBuffer`.

pub mod error;
pub mod layout;
pub mod parser;
pub mod payload;
pub mod reader;

pub use parser::{BinaryHeader, parse_header};
pub use payload::decode_payload;
pub use reader::{Endianness, FieldReader};
