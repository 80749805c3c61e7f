use log::debug;

use super::error::BinaryError;
use super::layout;
use super::reader::{Endianness, FieldReader};
use crate::ChannelDescriptor;
use crate::table::NumericBuffer;

/// Decode the column-major sample region that follows the channel table.
///
/// Column `c` receives `channels[c].sample_count` samples at rows
/// `0..sample_count`; the remaining rows keep the buffer's zero fill.
///
/// # Errors
/// `MalformedHeader` when a channel declares more samples than
/// `record_count` or the buffer cannot be allocated, `Truncated` when the
/// input is shorter than the declared samples. Both are checked before the
/// buffer is allocated.
pub fn decode_payload(
    reader: &mut FieldReader<'_>,
    channels: &[ChannelDescriptor],
    record_count: usize,
    endianness: Endianness,
) -> Result<NumericBuffer, BinaryError> {
    let start = reader.offset();
    let mut needed = 0usize;
    for channel in channels {
        if channel.sample_count > record_count {
            return Err(BinaryError::MalformedHeader {
                field: "sample_count",
                offset: start,
                value: channel.sample_count as i64,
            });
        }
        needed = channel
            .sample_count
            .checked_mul(layout::FLOAT_WIDTH)
            .and_then(|bytes| needed.checked_add(bytes))
            .ok_or(BinaryError::Truncated {
                field: "sample",
                offset: start,
                needed: usize::MAX,
                actual: reader.remaining(),
            })?;
    }
    reader.require_remaining("sample", needed)?;

    let mut buffer = NumericBuffer::zeroed(record_count, channels.len()).ok_or(
        BinaryError::MalformedHeader {
            field: "record_count",
            offset: start,
            value: record_count as i64,
        },
    )?;

    for (col, channel) in channels.iter().enumerate() {
        let column = buffer.column_mut(col);
        for slot in column.iter_mut().take(channel.sample_count) {
            *slot = reader.read_f64("sample", endianness)?;
        }
    }

    debug!(
        "xlook payload: {} bytes decoded as {endianness}-endian, {} trailing",
        reader.offset() - start,
        reader.remaining()
    );
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::decode_payload;
    use crate::ChannelDescriptor;
    use crate::formats::binary::error::BinaryError;
    use crate::formats::binary::reader::{Endianness, FieldReader};

    fn channel(name: &str, sample_count: usize) -> ChannelDescriptor {
        ChannelDescriptor {
            name: name.to_string(),
            units: String::new(),
            sample_count,
        }
    }

    fn encode(values: &[f64], endianness: Endianness) -> Vec<u8> {
        values
            .iter()
            .flat_map(|v| match endianness {
                Endianness::Little => v.to_le_bytes(),
                Endianness::Big => v.to_be_bytes(),
            })
            .collect()
    }

    #[test]
    fn columns_are_sequential_not_interleaved() {
        let bytes = encode(&[1.0, 2.0, 3.0, 10.0, 20.0, 30.0], Endianness::Little);
        let channels = [channel("a", 3), channel("b", 3)];
        let buffer =
            decode_payload(&mut FieldReader::new(&bytes), &channels, 3, Endianness::Little)
                .unwrap();
        assert_eq!(buffer.column(0), &[1.0, 2.0, 3.0]);
        assert_eq!(buffer.column(1), &[10.0, 20.0, 30.0]);
        assert_eq!(buffer.get(1, 1), Some(20.0));
    }

    #[test]
    fn short_columns_are_zero_filled() {
        let bytes = encode(&[1.5, 2.5, 3.5, 4.5, 9.0], Endianness::Big);
        let channels = [channel("a", 4), channel("b", 1), channel("c", 0)];
        let buffer =
            decode_payload(&mut FieldReader::new(&bytes), &channels, 4, Endianness::Big).unwrap();
        assert_eq!(buffer.rows(), 4);
        assert_eq!(buffer.cols(), 3);
        assert_eq!(buffer.column(0), &[1.5, 2.5, 3.5, 4.5]);
        assert_eq!(buffer.column(1), &[9.0, 0.0, 0.0, 0.0]);
        assert_eq!(buffer.column(2), &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn exhausted_input_mid_column_is_truncated() {
        let mut bytes = encode(&[1.0, 2.0], Endianness::Little);
        bytes.truncate(12);
        let channels = [channel("a", 2)];
        let err = decode_payload(&mut FieldReader::new(&bytes), &channels, 2, Endianness::Little)
            .unwrap_err();
        assert!(matches!(
            err,
            BinaryError::Truncated { field: "sample", offset: 0, needed: 16, actual: 12 }
        ));
    }

    #[test]
    fn huge_record_count_without_samples_is_truncated_before_allocating() {
        let channels: Vec<_> = (0..32).map(|i| channel(&format!("c{i}"), 1)).collect();
        let err = decode_payload(
            &mut FieldReader::new(&[]),
            &channels,
            i32::MAX as usize,
            Endianness::Little,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BinaryError::Truncated { field: "sample", needed: 256, actual: 0, .. }
        ));
    }

    #[test]
    fn sample_count_above_record_count_is_malformed() {
        let bytes = encode(&[1.0, 2.0, 3.0], Endianness::Little);
        let channels = [channel("a", 3), channel("b", 0)];
        let err = decode_payload(&mut FieldReader::new(&bytes), &channels, 2, Endianness::Little)
            .unwrap_err();
        assert!(matches!(
            err,
            BinaryError::MalformedHeader { field: "sample_count", value: 3, .. }
        ));
    }

    #[test]
    fn trailing_bytes_are_left_unread() {
        let mut bytes = encode(&[7.0], Endianness::Little);
        bytes.extend_from_slice(&[0xaa; 3]);
        let mut reader = FieldReader::new(&bytes);
        let buffer =
            decode_payload(&mut reader, &[channel("a", 1)], 1, Endianness::Little).unwrap();
        assert_eq!(buffer.column(0), &[7.0]);
        assert_eq!(reader.remaining(), 3);
    }

    #[test]
    fn same_bytes_decode_differently_per_endianness() {
        let bytes = encode(&[0.1], Endianness::Little);
        let channels = [channel("a", 1)];
        let little =
            decode_payload(&mut FieldReader::new(&bytes), &channels, 1, Endianness::Little)
                .unwrap();
        let big =
            decode_payload(&mut FieldReader::new(&bytes), &channels, 1, Endianness::Big).unwrap();
        assert_eq!(little.get(0, 0), Some(0.1));
        assert_ne!(big.get(0, 0), Some(0.1));
    }
}
