use log::{debug, trace};

use super::error::BinaryError;
use super::layout;
use super::reader::FieldReader;
use crate::formats::common::reader::trim_padding;
use crate::{ChannelDescriptor, FileHeader};

/// Header preamble plus the retained (non-sentinel) channel schema.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryHeader {
    pub header: FileHeader,
    pub channels: Vec<ChannelDescriptor>,
}

/// Parse the preamble and the 32-slot channel table.
///
/// On success the reader sits at the first payload byte.
///
/// # Errors
/// `Truncated` when the input ends inside the header, `MalformedHeader` when
/// a count is out of range and `SchemaMismatch` when the declared column
/// count disagrees with the number of retained channels.
pub fn parse_header(reader: &mut FieldReader<'_>) -> Result<BinaryHeader, BinaryError> {
    let experiment_name =
        reader.read_fixed_string("experiment name", layout::EXPERIMENT_NAME_WIDTH)?;

    let record_count = read_count(reader, "record_count", 0)?;
    let column_count = read_count(reader, "column_count", 1)?;
    let legacy_sweep = reader.read_be_i32("legacy_sweep")?;
    let legacy_timestamp = reader.read_be_i32("legacy_timestamp")?;

    let header = FileHeader {
        experiment_name: trim_padding(&experiment_name),
        record_count,
        column_count,
        legacy_sweep,
        legacy_timestamp,
    };
    debug!(
        "xlook header: name={:?} records={} columns={} sweep={} timestamp={}",
        header.experiment_name,
        header.record_count,
        header.column_count,
        header.legacy_sweep,
        header.legacy_timestamp
    );

    let mut channels = Vec::with_capacity(column_count.min(layout::CHANNEL_SLOTS));
    for slot in 0..layout::CHANNEL_SLOTS {
        debug_assert_eq!(reader.offset(), layout::slot_offset(slot));
        let name = reader.read_fixed_string("channel name", layout::CHANNEL_NAME_WIDTH)?;
        let units = reader.read_fixed_string("channel units", layout::CHANNEL_UNITS_WIDTH)?;
        let _gain = reader.read_be_i32("channel gain")?;
        let _comment = reader.read_slice("channel comment", layout::CHANNEL_COMMENT_WIDTH)?;
        let count_offset = reader.offset();
        let sample_count = reader.read_be_i32("sample_count")?;

        if is_sentinel(&name) {
            trace!("slot {slot}: unused");
            continue;
        }

        if sample_count < 0 || sample_count as i64 > record_count as i64 {
            return Err(BinaryError::MalformedHeader {
                field: "sample_count",
                offset: count_offset,
                value: sample_count as i64,
            });
        }

        let descriptor = ChannelDescriptor {
            name: trim_padding(&name),
            units: trim_padding(&units),
            sample_count: sample_count as usize,
        };
        trace!(
            "slot {slot}: {} [{}] {} samples",
            descriptor.name, descriptor.units, descriptor.sample_count
        );
        channels.push(descriptor);
    }

    if channels.len() != column_count {
        return Err(BinaryError::SchemaMismatch {
            declared: column_count,
            found: channels.len(),
        });
    }

    Ok(BinaryHeader { header, channels })
}

/// A slot is unused when its name starts with `no_val`, whatever follows.
pub fn is_sentinel(name: &str) -> bool {
    name.starts_with(layout::SENTINEL_PREFIX)
}

fn read_count(
    reader: &mut FieldReader<'_>,
    field: &'static str,
    min: i32,
) -> Result<usize, BinaryError> {
    let offset = reader.offset();
    let value = reader.read_be_i32(field)?;
    if value < min {
        return Err(BinaryError::MalformedHeader {
            field,
            offset,
            value: value as i64,
        });
    }
    Ok(value as usize)
}
