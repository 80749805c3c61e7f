//! Decoded result types and table assembly.
//!
//! Channels may hold fewer samples than the file's record count. Decoders
//! store every channel in one dense, zero-initialised `NumericBuffer` whose
//! height is the record count, and each `ChannelDescriptor` records how many
//! leading rows of its column are real samples. Rows past that count hold
//! `FILL_VALUE`, which is indistinguishable from a measured `0.0`; consumers
//! must go through `Column::values` or an explicit `Layout` rather than read
//! the padded buffer as data.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ChannelDescriptor, FileHeader};

/// Value occupying buffer cells past a column's sample count.
pub const FILL_VALUE: f64 = 0.0;

/// Dense `rows × cols` matrix of samples stored column by column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericBuffer {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl NumericBuffer {
    /// Allocate a buffer filled with `FILL_VALUE`. Returns `None` when
    /// `rows * cols` overflows or the allocation cannot be satisfied.
    pub fn zeroed(rows: usize, cols: usize) -> Option<Self> {
        let len = rows.checked_mul(cols)?;
        let mut values = Vec::new();
        values.try_reserve_exact(len).ok()?;
        values.resize(len, FILL_VALUE);
        Some(Self { rows, cols, values })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.values[col * self.rows + row])
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: f64) {
        self.values[col * self.rows + row] = value;
    }

    /// Full physical column, including fill rows.
    ///
    /// # Panics
    /// Panics when `col >= self.cols()`.
    pub fn column(&self, col: usize) -> &[f64] {
        assert!(col < self.cols, "column {col} out of range");
        &self.values[col * self.rows..(col + 1) * self.rows]
    }

    pub(crate) fn column_mut(&mut self, col: usize) -> &mut [f64] {
        &mut self.values[col * self.rows..(col + 1) * self.rows]
    }

    pub fn row(&self, row: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.cols).filter_map(move |col| self.get(row, col))
    }
}

/// Result of decoding one xlook file.
///
/// `header` is present for binary input only; the text encoding carries no
/// experiment name or legacy fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedTable {
    pub header: Option<FileHeader>,
    pub channels: Vec<ChannelDescriptor>,
    pub data: NumericBuffer,
}

impl DecodedTable {
    pub fn record_count(&self) -> usize {
        self.data.rows()
    }

    pub fn column_count(&self) -> usize {
        self.channels.len()
    }

    pub fn column(&self, index: usize) -> Option<Column<'_>> {
        let descriptor = self.channels.get(index)?;
        Some(Column {
            descriptor,
            padded: self.data.column(index),
        })
    }

    /// First channel with the given name.
    pub fn channel(&self, name: &str) -> Option<Column<'_>> {
        let index = self.channels.iter().position(|c| c.name == name)?;
        self.column(index)
    }

    pub fn columns(&self) -> impl Iterator<Item = Column<'_>> + '_ {
        (0..self.column_count()).filter_map(move |index| self.column(index))
    }

    /// Sample count of the shortest channel (0 for a table with no channels).
    pub fn shortest_column_len(&self) -> usize {
        self.channels
            .iter()
            .map(|c| c.sample_count.min(self.record_count()))
            .min()
            .unwrap_or(0)
    }
}

/// One channel of a `DecodedTable`.
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub descriptor: &'a ChannelDescriptor,
    padded: &'a [f64],
}

impl<'a> Column<'a> {
    /// Only the samples actually present in the file.
    pub fn values(&self) -> &'a [f64] {
        &self.padded[..self.valid_len()]
    }

    /// The full column, `record_count` long, with fill rows.
    pub fn padded(&self) -> &'a [f64] {
        self.padded
    }

    pub fn valid_len(&self) -> usize {
        self.descriptor.sample_count.min(self.padded.len())
    }

    pub fn is_fill(&self, row: usize) -> bool {
        row >= self.valid_len()
    }
}

/// How ragged columns are presented as rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Every row up to the record count; fill cells as `Some(FILL_VALUE)`.
    #[default]
    Padded,
    /// Only rows where every channel has a real sample.
    Truncated,
    /// Every row up to the record count; fill cells as `None`.
    Ragged,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Layout::Padded => "padded",
            Layout::Truncated => "truncated",
            Layout::Ragged => "ragged",
        })
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "padded" => Ok(Layout::Padded),
            "truncated" => Ok(Layout::Truncated),
            "ragged" => Ok(Layout::Ragged),
            other => Err(format!(
                "unknown layout '{other}': expected padded, truncated or ragged"
            )),
        }
    }
}

/// Assemble the table into rows, in channel order.
///
/// # Examples
/// ```
/// use xlook_core::{ChannelDescriptor, DecodedTable, Layout, NumericBuffer, assemble_rows};
///
/// let table = DecodedTable {
///     header: None,
///     channels: vec![ChannelDescriptor {
///         name: "a".to_string(),
///         units: "V".to_string(),
///         sample_count: 1,
///     }],
///     data: NumericBuffer::zeroed(2, 1).unwrap(),
/// };
/// assert_eq!(assemble_rows(&table, Layout::Ragged), vec![vec![Some(0.0)], vec![None]]);
/// assert_eq!(assemble_rows(&table, Layout::Truncated).len(), 1);
/// ```
pub fn assemble_rows(table: &DecodedTable, layout: Layout) -> Vec<Vec<Option<f64>>> {
    let height = match layout {
        Layout::Truncated => table.shortest_column_len(),
        Layout::Padded | Layout::Ragged => table.record_count(),
    };
    let columns: Vec<Column<'_>> = table.columns().collect();
    (0..height)
        .map(|row| {
            columns
                .iter()
                .map(|column| {
                    if layout == Layout::Ragged && column.is_fill(row) {
                        None
                    } else {
                        Some(column.padded()[row])
                    }
                })
                .collect()
        })
        .collect()
}
