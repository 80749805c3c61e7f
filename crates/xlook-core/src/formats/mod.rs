//! On-disk format decoders.
//!
//! Each format follows a layered structure:
//! - `layout`: offsets, widths and literals (source of truth)
//! - `reader`: bounds-checked access to the input
//! - `parser`: domain-level decoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! Decoders are pure and contain no I/O; the `source` module owns file access.

pub mod ascii;
pub mod binary;
pub(crate) mod common;
