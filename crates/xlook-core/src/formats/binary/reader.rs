use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::BinaryError;
use super::layout;
use crate::formats::common::reader::latin1_until_nul;

/// Byte order of the sample payload. Header integers are always big-endian.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

impl Endianness {
    /// The opposite byte order.
    ///
    /// # Examples
    /// ```
    /// use xlook_core::Endianness;
    ///
    /// assert_eq!(Endianness::Little.other(), Endianness::Big);
    /// ```
    pub fn other(self) -> Self {
        match self {
            Endianness::Little => Endianness::Big,
            Endianness::Big => Endianness::Little,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Endianness::Little => "little",
            Endianness::Big => "big",
        }
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Endianness {
    type Err = BinaryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let tag = value.trim();
        if tag.eq_ignore_ascii_case("little") {
            Ok(Endianness::Little)
        } else if tag.eq_ignore_ascii_case("big") {
            Ok(Endianness::Big)
        } else {
            Err(BinaryError::InvalidEndianness {
                value: value.to_string(),
            })
        }
    }
}

/// Sequential cursor over an xlook binary image.
///
/// Every read consumes exactly the width of its field. A read that would run
/// past the end of the input fails with `BinaryError::Truncated` and leaves
/// the cursor where it was.
pub struct FieldReader<'a> {
    payload: &'a [u8],
    offset: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.payload.len() - self.offset
    }

    pub fn require_remaining(&self, field: &'static str, needed: usize) -> Result<(), BinaryError> {
        if self.remaining() < needed {
            return Err(BinaryError::Truncated {
                field,
                offset: self.offset,
                needed,
                actual: self.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_slice(&mut self, field: &'static str, width: usize) -> Result<&'a [u8], BinaryError> {
        self.require_remaining(field, width)?;
        let bytes = &self.payload[self.offset..self.offset + width];
        self.offset += width;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], BinaryError> {
        let bytes = self.read_slice(field, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Read a `width`-byte NUL-terminated string field.
    ///
    /// # Examples
    /// ```
    /// use xlook_core::formats::binary::reader::FieldReader;
    ///
    /// let bytes = *b"abc\0xyz";
    /// let mut reader = FieldReader::new(&bytes);
    /// assert_eq!(reader.read_fixed_string("name", 7).unwrap(), "abc");
    /// assert_eq!(reader.offset(), 7);
    /// ```
    pub fn read_fixed_string(
        &mut self,
        field: &'static str,
        width: usize,
    ) -> Result<String, BinaryError> {
        let bytes = self.read_slice(field, width)?;
        Ok(latin1_until_nul(bytes))
    }

    pub fn read_be_i32(&mut self, field: &'static str) -> Result<i32, BinaryError> {
        let bytes = self.read_array::<{ layout::INT_WIDTH }>(field)?;
        Ok(i32::from_be_bytes(bytes))
    }

    pub fn read_f64(
        &mut self,
        field: &'static str,
        endianness: Endianness,
    ) -> Result<f64, BinaryError> {
        let bytes = self.read_array::<{ layout::FLOAT_WIDTH }>(field)?;
        Ok(match endianness {
            Endianness::Little => f64::from_le_bytes(bytes),
            Endianness::Big => f64::from_be_bytes(bytes),
        })
    }
}
