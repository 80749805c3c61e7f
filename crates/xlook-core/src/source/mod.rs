//! File access for xlook inputs.
//!
//! The whole file is read up front and the handle is closed before decoding
//! starts, so no decode path can leak it.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::formats::ascii::layout::RECORD_COUNT_LABEL;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// On-disk encoding of an xlook file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Binary,
    Ascii,
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InputFormat::Binary => "binary",
            InputFormat::Ascii => "ascii",
        })
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "binary" | "bin" => Ok(InputFormat::Binary),
            "ascii" | "text" => Ok(InputFormat::Ascii),
            other => Err(format!("unknown format '{other}': expected binary or ascii")),
        }
    }
}

/// Read the whole file at `path`.
///
/// # Errors
/// Returns `SourceError::Unavailable` when the file cannot be opened or read.
pub fn read_source(path: &Path) -> Result<Vec<u8>, SourceError> {
    let unavailable = |source| SourceError::Unavailable {
        path: path.to_path_buf(),
        source,
    };
    let mut bytes = Vec::new();
    {
        let mut file = File::open(path).map_err(unavailable)?;
        file.read_to_end(&mut bytes).map_err(unavailable)?;
    }
    debug!("read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Guess the encoding: text exports start with `number of records`.
///
/// # Examples
/// ```
/// use xlook_core::{InputFormat, detect_format};
///
/// assert_eq!(detect_format(b"number of records = 3\n"), InputFormat::Ascii);
/// assert_eq!(detect_format(b"p4581\0\0\0"), InputFormat::Binary);
/// ```
pub fn detect_format(bytes: &[u8]) -> InputFormat {
    let label = RECORD_COUNT_LABEL.as_bytes();
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    if bytes[start..].starts_with(label) {
        InputFormat::Ascii
    } else {
        InputFormat::Binary
    }
}
