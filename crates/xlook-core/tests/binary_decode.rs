use std::fs;

use tempfile::TempDir;
use xlook_core::formats::binary::layout;
use xlook_core::{Endianness, ErrorKind, FILL_VALUE, decode_binary, decode_binary_file};

struct Slot {
    name: &'static str,
    units: &'static str,
    samples: Vec<f64>,
}

struct ImageBuilder {
    name: &'static str,
    record_count: i32,
    column_count: Option<i32>,
    slots: Vec<Option<Slot>>,
}

impl ImageBuilder {
    fn new(record_count: i32) -> Self {
        Self {
            name: "synthetic",
            record_count,
            column_count: None,
            slots: (0..layout::CHANNEL_SLOTS).map(|_| None).collect(),
        }
    }

    fn channel(
        mut self,
        slot: usize,
        name: &'static str,
        units: &'static str,
        samples: Vec<f64>,
    ) -> Self {
        self.slots[slot] = Some(Slot {
            name,
            units,
            samples,
        });
        self
    }

    fn column_count(mut self, count: i32) -> Self {
        self.column_count = Some(count);
        self
    }

    fn build(&self, endianness: Endianness) -> Vec<u8> {
        let retained = self.slots.iter().flatten().count() as i32;
        let mut out = Vec::new();
        push_fixed(&mut out, self.name.as_bytes(), layout::EXPERIMENT_NAME_WIDTH);
        out.extend_from_slice(&self.record_count.to_be_bytes());
        out.extend_from_slice(&self.column_count.unwrap_or(retained).to_be_bytes());
        out.extend_from_slice(&0i32.to_be_bytes());
        out.extend_from_slice(&0i32.to_be_bytes());
        for slot in &self.slots {
            let (name, units, count) = match slot {
                Some(slot) => (slot.name, slot.units, slot.samples.len() as i32),
                None => ("no_val", "", 0),
            };
            push_fixed(&mut out, name.as_bytes(), layout::CHANNEL_NAME_WIDTH);
            push_fixed(&mut out, units.as_bytes(), layout::CHANNEL_UNITS_WIDTH);
            out.extend_from_slice(&1i32.to_be_bytes());
            push_fixed(&mut out, b"comment", layout::CHANNEL_COMMENT_WIDTH);
            out.extend_from_slice(&count.to_be_bytes());
        }
        for slot in self.slots.iter().flatten() {
            for value in &slot.samples {
                let bytes = match endianness {
                    Endianness::Little => value.to_le_bytes(),
                    Endianness::Big => value.to_be_bytes(),
                };
                out.extend_from_slice(&bytes);
            }
        }
        out
    }
}

fn push_fixed(out: &mut Vec<u8>, value: &[u8], width: usize) {
    let mut field = vec![0u8; width];
    field[..value.len()].copy_from_slice(value);
    out.extend_from_slice(&field);
}

fn tricky_values() -> Vec<f64> {
    vec![
        0.0,
        -0.0,
        1.0,
        -2.5e-3,
        f64::MIN_POSITIVE,
        f64::from_bits(1),
        1e300,
        f64::from_bits(0x7ff8_0000_dead_beef),
    ]
}

#[test]
fn round_trip_is_bit_exact_for_both_byte_orders() {
    let values = tricky_values();
    let builder = ImageBuilder::new(values.len() as i32)
        .channel(0, "Load", "kN", values.clone())
        .channel(5, "Disp", "um", values.iter().rev().copied().collect());

    for endianness in [Endianness::Little, Endianness::Big] {
        let table = decode_binary(&builder.build(endianness), endianness).unwrap();
        let header = table.header.as_ref().unwrap();
        assert_eq!(header.experiment_name, "synthetic");
        assert_eq!(header.column_count, 2);
        assert_eq!(table.channels[0].name, "Load");
        assert_eq!(table.channels[0].units, "kN");
        assert_eq!(table.channels[1].name, "Disp");
        assert_eq!(table.channels[1].sample_count, values.len());

        let load: Vec<u64> = table.column(0).unwrap().values().iter().map(|v| v.to_bits()).collect();
        let expected: Vec<u64> = values.iter().map(|v| v.to_bits()).collect();
        assert_eq!(load, expected, "{endianness}");
        let disp: Vec<u64> = table.column(1).unwrap().values().iter().map(|v| v.to_bits()).collect();
        let expected: Vec<u64> = values.iter().rev().map(|v| v.to_bits()).collect();
        assert_eq!(disp, expected, "{endianness}");
    }
}

#[test]
fn short_column_is_padded_with_fill_value() {
    let a: Vec<f64> = (0..100).map(|i| i as f64 + 1.0).collect();
    let b: Vec<f64> = (0..40).map(|i| -(i as f64) - 1.0).collect();
    let image = ImageBuilder::new(100)
        .channel(0, "A", "V", a.clone())
        .channel(1, "B", "V", b.clone())
        .build(Endianness::Little);

    let table = decode_binary(&image, Endianness::Little).unwrap();
    assert_eq!(table.record_count(), 100);
    assert_eq!(table.column_count(), 2);

    let col_a = table.column(0).unwrap();
    assert_eq!(col_a.values(), a.as_slice());
    assert!(!col_a.is_fill(99));

    let col_b = table.column(1).unwrap();
    assert_eq!(col_b.values(), b.as_slice());
    assert_eq!(col_b.padded().len(), 100);
    assert!(col_b.padded()[40..].iter().all(|v| *v == FILL_VALUE));
    assert!(col_b.is_fill(40));
    assert!(!col_b.is_fill(39));
    assert_eq!(table.shortest_column_len(), 40);
}

#[test]
fn empty_column_is_entirely_fill() {
    let image = ImageBuilder::new(3)
        .channel(0, "Full", "s", vec![1.0, 2.0, 3.0])
        .channel(1, "Empty", "s", Vec::new())
        .build(Endianness::Big);

    let table = decode_binary(&image, Endianness::Big).unwrap();
    let empty = table.channel("Empty").unwrap();
    assert!(empty.values().is_empty());
    assert_eq!(empty.padded(), &[0.0, 0.0, 0.0]);
    assert!((0..3).all(|row| empty.is_fill(row)));
    let full = table.channel("Full").unwrap();
    assert!((0..3).all(|row| !full.is_fill(row)));
}

#[test]
fn only_named_slots_survive_in_slot_order() {
    let image = ImageBuilder::new(2)
        .channel(7, "Seventh", "b", vec![7.0, 7.5])
        .channel(3, "Third", "a", vec![3.0])
        .build(Endianness::Little);

    let table = decode_binary(&image, Endianness::Little).unwrap();
    let names: Vec<_> = table.channels.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Third", "Seventh"]);
    assert_eq!(table.column(0).unwrap().values(), &[3.0]);
    assert_eq!(table.column(1).unwrap().values(), &[7.0, 7.5]);
}

#[test]
fn schema_size_matches_declared_columns_for_many_slot_patterns() {
    for pattern in [0b1u32, 0b1010_0101, 0x8000_0001, 0xffff_ffff, 0x0f0f_0000] {
        let mut builder = ImageBuilder::new(1);
        for slot in 0..layout::CHANNEL_SLOTS {
            if pattern & (1 << slot) != 0 {
                builder = builder.channel(slot, "ch", "u", vec![slot as f64]);
            }
        }
        let table = decode_binary(&builder.build(Endianness::Little), Endianness::Little).unwrap();
        assert_eq!(table.column_count(), pattern.count_ones() as usize);
        assert_eq!(
            table.header.as_ref().unwrap().column_count,
            table.column_count()
        );
    }
}

#[test]
fn sentinel_with_trailing_garbage_is_excluded() {
    let mut image = ImageBuilder::new(1)
        .channel(0, "no_val#12", "junk", vec![9.0])
        .channel(1, "Kept", "u", vec![1.0])
        .column_count(1)
        .build(Endianness::Little);
    // sentinel slots own no payload
    image.drain(layout::PAYLOAD_OFFSET..layout::PAYLOAD_OFFSET + 8);

    let table = decode_binary(&image, Endianness::Little).unwrap();
    assert_eq!(table.column_count(), 1);
    assert_eq!(table.channels[0].name, "Kept");
    assert_eq!(table.column(0).unwrap().values(), &[1.0]);
}

#[test]
fn declared_column_count_mismatch_is_rejected() {
    let image = ImageBuilder::new(1)
        .channel(0, "A", "u", vec![1.0])
        .column_count(2)
        .build(Endianness::Little);
    let err = decode_binary(&image, Endianness::Little).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
}

#[test]
fn negative_record_count_is_malformed() {
    let image = ImageBuilder::new(-4)
        .channel(0, "A", "u", Vec::new())
        .build(Endianness::Little);
    let err = decode_binary(&image, Endianness::Little).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedHeader);
    assert!(err.to_string().contains("record_count"));
}

#[test]
fn truncation_anywhere_is_reported_as_truncated() {
    let image = ImageBuilder::new(3)
        .channel(1, "A", "u", vec![1.0, 2.0, 3.0])
        .channel(30, "B", "u", vec![4.0, 5.0])
        .build(Endianness::Little);
    assert!(decode_binary(&image, Endianness::Little).is_ok());

    for cut in 0..image.len() {
        let err = decode_binary(&image[..cut], Endianness::Little).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput, "cut at {cut}");
    }
}

#[test]
fn byte_order_changes_decoded_values() {
    let image = ImageBuilder::new(2)
        .channel(0, "A", "u", vec![0.1, 123.456])
        .build(Endianness::Little);

    let little = decode_binary(&image, Endianness::Little).unwrap();
    let big = decode_binary(&image, Endianness::Big).unwrap();
    assert_eq!(little.column(0).unwrap().values(), &[0.1, 123.456]);
    assert_ne!(
        big.column(0).unwrap().values()[0].to_bits(),
        0.1f64.to_bits()
    );
    assert_eq!(little.channels, big.channels);
}

#[test]
fn invalid_endianness_tag_is_rejected_before_decoding() {
    let err = "middle".parse::<Endianness>().unwrap_err();
    let err = xlook_core::DecodeError::from(err);
    assert_eq!(err.kind(), ErrorKind::InvalidEndianness);
}

#[test]
fn decode_from_file_reads_whole_image() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("run.bin");
    let image = ImageBuilder::new(1)
        .channel(4, "Only", "u", vec![42.0])
        .build(Endianness::Big);
    fs::write(&path, &image).unwrap();

    let table = decode_binary_file(&path, Endianness::Big).unwrap();
    assert_eq!(table.channel("Only").unwrap().values(), &[42.0]);
    fs::remove_file(&path).unwrap();
}

#[test]
fn missing_file_is_source_unavailable() {
    let temp = TempDir::new().expect("tempdir");
    let err = decode_binary_file(&temp.path().join("absent.bin"), Endianness::Little).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
}

#[test]
fn huge_record_count_with_missing_payload_is_truncated() {
    let mut builder = ImageBuilder::new(i32::MAX);
    for slot in 0..layout::CHANNEL_SLOTS {
        builder = builder.channel(slot, "ch", "u", vec![1.0]);
    }
    let mut image = builder.build(Endianness::Little);
    image.truncate(layout::PAYLOAD_OFFSET);

    let err = decode_binary(&image, Endianness::Little).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TruncatedInput);
}
