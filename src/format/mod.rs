// Factor stream: a compact on-disk encoding of an LZ78 factor sequence.
//
// This layer sits outside the compressor; the compressor only knows the
// `FactorConsumer` trait, which `FactorWriter` implements.
//
// - `varint`: base-128 integers
// - `header`: magic, version, flags, trailer checksum
// - `writer`: `FactorWriter`: streaming encoder (a `FactorConsumer`)
// - `reader`: `FactorReader`: validating decoder over a byte slice

use std::io;

pub mod header;
pub mod reader;
pub mod varint;
pub mod writer;

pub use header::{StreamFlags, StreamHeader};
pub use reader::{FactorReader, read_all};
pub use writer::FactorWriter;

use varint::VarIntError;

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error("malformed integer: {0}")]
    VarInt(#[from] VarIntError),
    #[error("checksum mismatch: expected {expected:#010X}, got {actual:#010X}")]
    ChecksumMismatch { expected: u32, actual: u32 },
    #[error("factor count mismatch: trailer says {expected}, stream holds {actual}")]
    CountMismatch { expected: u64, actual: u64 },
}

/// Record code for a factor. `0` is reserved for the end of the record list.
#[inline]
pub(crate) fn record_code(reference: u32, has_extension: bool) -> u64 {
    ((u64::from(reference) << 1) | u64::from(has_extension)) + 1
}
