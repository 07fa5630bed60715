// Streaming factor stream encoder.
//
// Record layout, one per factor:
//   code (varint)   ((reference << 1) | has_extension) + 1
//   [extension]     1 byte, present when has_extension
// A code of 0 ends the record list and is followed by the trailer.

use std::io::{self, Write};

use super::header::{Adler32, StreamFlags, StreamHeader};
use super::varint::{self, MAX_VARINT_LEN};
use super::{FormatError, record_code};
use crate::consumer::FactorConsumer;
use crate::factor::Factor;

/// A `FactorConsumer` that serializes every factor to `W`.
///
/// Consuming cannot report errors, so the first I/O failure is kept and
/// returned by `finish`; nothing more is written after it.
///
/// # Example
/// ```
/// use oxilz78::compressor::{CompressOptions, Compressor};
/// use oxilz78::format::{self, FactorWriter, StreamFlags};
///
/// let sink = FactorWriter::new(Vec::new(), StreamFlags::CHECKSUM);
/// let mut c = Compressor::with_options(&CompressOptions::default(), sink);
/// c.write(b"abracadabra").unwrap();
/// let done = c.finish().unwrap();
/// let (bytes, _len) = done.consumer.finish().unwrap();
///
/// let (_header, factors) = format::read_all(&bytes).unwrap();
/// assert_eq!(factors.len() as u64, done.stats.factors);
/// ```
pub struct FactorWriter<W: Write> {
    inner: W,
    flags: StreamFlags,
    checksum: Adler32,
    factors: u64,
    bytes_written: u64,
    error: Option<io::Error>,
}

impl<W: Write> FactorWriter<W> {
    /// Start a stream on `inner`, writing the header immediately.
    pub fn new(inner: W, flags: StreamFlags) -> Self {
        let mut w = Self {
            inner,
            flags,
            checksum: Adler32::new(),
            factors: 0,
            bytes_written: 0,
            error: None,
        };
        w.put(&StreamHeader::new(flags).to_bytes());
        w
    }

    pub fn flags(&self) -> StreamFlags {
        self.flags
    }

    /// Bytes handed to the underlying writer so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    fn put(&mut self, data: &[u8]) {
        if self.error.is_some() {
            return;
        }
        match self.inner.write_all(data) {
            Ok(()) => self.bytes_written += data.len() as u64,
            Err(e) => self.error = Some(e),
        }
    }

    /// Write the end marker and trailer, flush, and hand back the writer
    /// with the total stream length.
    pub fn finish(mut self) -> Result<(W, u64), FormatError> {
        let mut trailer = Vec::with_capacity(1 + MAX_VARINT_LEN + 4);
        trailer.push(0);
        varint::write_u64(&mut trailer, self.factors)?;
        if self.flags.contains(StreamFlags::CHECKSUM) {
            trailer.extend_from_slice(&self.checksum.finish().to_be_bytes());
        }
        self.put(&trailer);

        if let Some(e) = self.error.take() {
            return Err(e.into());
        }
        self.inner.flush()?;
        log::debug!(
            "oxilz78: factor stream closed: {} factors, {} bytes",
            self.factors,
            self.bytes_written
        );
        Ok((self.inner, self.bytes_written))
    }
}

impl<W: Write> FactorConsumer for FactorWriter<W> {
    fn consume(&mut self, factor: Factor) {
        let mut buf = [0u8; MAX_VARINT_LEN + 1];
        let mut code = [0u8; MAX_VARINT_LEN];
        let len = varint::encode_u64(
            record_code(factor.reference, factor.extension.is_some()),
            &mut code,
        );
        buf[..len].copy_from_slice(&code[MAX_VARINT_LEN - len..]);
        let mut n = len;
        if let Some(byte) = factor.extension {
            buf[n] = byte;
            n += 1;
        }

        self.checksum.update(&buf[..n]);
        self.put(&buf[..n]);
        self.factors += 1;
    }

    fn factor_count(&self) -> u64 {
        self.factors
    }
}
