// File-level helpers around the compressor.
//
// `compress_file()` streams an input file through the compressor and either
// writes a factor stream or only counts factors. With the `file-io` feature
// a SHA-256 of the input is computed on the way through.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

#[cfg(feature = "file-io")]
use sha2::Digest;

use crate::compressor::{CompressError, CompressOptions, CompressStats, Compressor};
use crate::consumer::FactorCounter;
use crate::format::{FactorWriter, FormatError, StreamFlags};

// ---------------------------------------------------------------------------
// Options and stats
// ---------------------------------------------------------------------------

/// Configuration for `compress_file()` / `compress_stream()`.
#[derive(Debug, Clone)]
pub struct FileOptions {
    pub compress: CompressOptions,
    /// Append an Adler-32 of the records to the factor stream.
    pub checksum: bool,
}

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            compress: CompressOptions::default(),
            checksum: true,
        }
    }
}

/// Statistics returned by `compress_file()`.
#[derive(Debug, Clone)]
pub struct FileStats {
    /// Input size in bytes.
    pub input_size: u64,
    /// Factors emitted.
    pub factors: u64,
    /// Final trie size, root included.
    pub trie_size: usize,
    /// Factor stream size in bytes (`None` when only counting).
    pub output_size: Option<u64>,
    /// SHA-256 of the input (if `file-io` feature is enabled).
    pub input_sha256: Option<[u8; 32]>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file operations.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("compress error: {0}")]
    Compress(#[from] CompressError),
    #[error("factor stream error: {0}")]
    Format(#[from] FormatError),
}

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

// ---------------------------------------------------------------------------
// Hashing reader
// ---------------------------------------------------------------------------

struct HashingReader<R> {
    inner: R,
    #[cfg(feature = "file-io")]
    hasher: sha2::Sha256,
}

impl<R: Read> HashingReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            #[cfg(feature = "file-io")]
            hasher: sha2::Sha256::new(),
        }
    }

    fn digest(self) -> Option<[u8; 32]> {
        #[cfg(feature = "file-io")]
        {
            Some(self.hasher.finalize().into())
        }
        #[cfg(not(feature = "file-io"))]
        {
            None
        }
    }
}

impl<R: Read> Read for HashingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        #[cfg(feature = "file-io")]
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}

// ---------------------------------------------------------------------------
// compress_stream / compress_file
// ---------------------------------------------------------------------------

/// Compress everything from `input`. With `output`, the factor stream is
/// written there; without, factors are only counted.
pub fn compress_stream<R: Read, W: Write>(
    input: R,
    output: Option<W>,
    opts: &FileOptions,
) -> Result<FileStats, IoError> {
    let mut reader = HashingReader::new(input);

    let (stats, output_size): (CompressStats, Option<u64>) = match output {
        Some(out) => {
            let flags = if opts.checksum {
                StreamFlags::CHECKSUM
            } else {
                StreamFlags::empty()
            };
            let sink = FactorWriter::new(out, flags);
            let mut c = Compressor::with_options(&opts.compress, sink);
            c.compress_reader(&mut reader)?;
            let done = c.finish()?;
            let (_, written) = done.consumer.finish()?;
            (done.stats, Some(written))
        }
        None => {
            let mut c = Compressor::with_options(&opts.compress, FactorCounter::new());
            c.compress_reader(&mut reader)?;
            (c.finish()?.stats, None)
        }
    };

    Ok(FileStats {
        input_size: stats.bytes_in,
        factors: stats.factors,
        trie_size: stats.trie_size,
        output_size,
        input_sha256: reader.digest(),
    })
}

/// Compress `input_path`, writing a factor stream to `output_path` if given.
pub fn compress_file(
    input_path: &Path,
    output_path: Option<&Path>,
    opts: &FileOptions,
) -> Result<FileStats, IoError> {
    let input = File::open(input_path)?;
    let output = match output_path {
        Some(path) => Some(BufWriter::with_capacity(BUF_SIZE, File::create(path)?)),
        None => None,
    };
    compress_stream(input, output, opts)
}

/// Lowercase hex rendering of a digest.
pub fn hex(bytes: &[u8]) -> String {
    use std::fmt::Write as _;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
