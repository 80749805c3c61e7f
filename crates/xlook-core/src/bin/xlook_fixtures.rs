use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use xlook_core::formats::binary::layout::{
    CHANNEL_COMMENT_WIDTH, CHANNEL_NAME_WIDTH, CHANNEL_SLOTS, CHANNEL_UNITS_WIDTH,
    EXPERIMENT_NAME_WIDTH, PAYLOAD_OFFSET, SENTINEL_PREFIX, slot_offset,
};
use xlook_core::{Endianness, InputFormat, decode_binary, summarize};

struct ChannelSpec {
    slot: usize,
    name: &'static str,
    units: &'static str,
    gain: i32,
    comment: &'static str,
    samples: &'static [f64],
}

const EXPERIMENT: &str = "p4581 fixture";
const RECORD_COUNT: i32 = 5;
const LEGACY_SWEEP: i32 = 7;
const LEGACY_TIMESTAMP: i32 = 1_234_567;

const CHANNELS: &[ChannelSpec] = &[
    ChannelSpec {
        slot: 0,
        name: "LP_Disp",
        units: "mm",
        gain: 1,
        comment: "load point displacement",
        samples: &[0.0, 0.25, 0.5, 0.75, 1.0],
    },
    ChannelSpec {
        slot: 2,
        name: "Shr_stress",
        units: "MPa",
        gain: 10,
        comment: "shear stress",
        samples: &[10.5, 11.0, 11.5, 12.0, 12.5],
    },
    ChannelSpec {
        slot: 9,
        name: "Time",
        units: "sec",
        gain: 0,
        comment: "",
        samples: &[0.001, 0.002, 0.003],
    },
];

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), String> {
    let root = PathBuf::from("tests").join("fixtures");
    fs::create_dir_all(&root)
        .map_err(|err| format!("failed to create {}: {}", root.display(), err))?;

    let little = build_image(Endianness::Little);
    write(&root.join("sample_le.bin"), &little)?;
    write(&root.join("sample_be.bin"), &build_image(Endianness::Big))?;
    write_expected_summary(&little, &root.join("sample_le.expected.json"))?;
    Ok(())
}

fn build_image(endianness: Endianness) -> Vec<u8> {
    let mut out = Vec::new();
    push_fixed(&mut out, EXPERIMENT, EXPERIMENT_NAME_WIDTH);
    out.extend_from_slice(&RECORD_COUNT.to_be_bytes());
    out.extend_from_slice(&(CHANNELS.len() as i32).to_be_bytes());
    out.extend_from_slice(&LEGACY_SWEEP.to_be_bytes());
    out.extend_from_slice(&LEGACY_TIMESTAMP.to_be_bytes());

    for slot in 0..CHANNEL_SLOTS {
        debug_assert_eq!(out.len(), slot_offset(slot));
        match CHANNELS.iter().find(|c| c.slot == slot) {
            Some(channel) => {
                push_fixed(&mut out, channel.name, CHANNEL_NAME_WIDTH);
                push_fixed(&mut out, channel.units, CHANNEL_UNITS_WIDTH);
                out.extend_from_slice(&channel.gain.to_be_bytes());
                push_fixed(&mut out, channel.comment, CHANNEL_COMMENT_WIDTH);
                out.extend_from_slice(&(channel.samples.len() as i32).to_be_bytes());
            }
            None => {
                push_fixed(&mut out, SENTINEL_PREFIX, CHANNEL_NAME_WIDTH);
                push_fixed(&mut out, "", CHANNEL_UNITS_WIDTH);
                out.extend_from_slice(&0i32.to_be_bytes());
                push_fixed(&mut out, "", CHANNEL_COMMENT_WIDTH);
                out.extend_from_slice(&0i32.to_be_bytes());
            }
        }
    }

    debug_assert_eq!(out.len(), PAYLOAD_OFFSET);
    for channel in CHANNELS {
        for value in channel.samples {
            let bytes = match endianness {
                Endianness::Little => value.to_le_bytes(),
                Endianness::Big => value.to_be_bytes(),
            };
            out.extend_from_slice(&bytes);
        }
    }
    out
}

fn push_fixed(out: &mut Vec<u8>, value: &str, width: usize) {
    let mut field = vec![0u8; width];
    let len = value.len().min(width);
    field[..len].copy_from_slice(&value.as_bytes()[..len]);
    out.extend_from_slice(&field);
}

fn write(path: &Path, bytes: &[u8]) -> Result<(), String> {
    fs::write(path, bytes).map_err(|err| format!("failed to write {}: {}", path.display(), err))
}

fn write_expected_summary(image: &[u8], output: &Path) -> Result<(), String> {
    let table = decode_binary(image, Endianness::Little)
        .map_err(|err| format!("fixture does not decode: {}", err))?;
    let summary = summarize(
        "tests/fixtures/sample_le.bin",
        image.len() as u64,
        InputFormat::Binary,
        Some(Endianness::Little),
        &table,
    );
    let json = serde_json::to_string_pretty(&summary)
        .map_err(|err| format!("JSON serialization failed: {}", err))?;
    write(output, json.as_bytes())
}
