// Byte sources feeding the compressor.
//
// The compressor pulls one byte per step. End of input is `Ok(None)`, not an
// error; only the underlying reader can fail.

use std::io::{self, BufRead, BufReader, Read};

/// Default read buffer for `ByteReader` (1 MiB).
pub const DEFAULT_BUFFER_SIZE: usize = 1 << 20;

/// A sequential source of bytes.
pub trait ByteSource {
    /// Next byte, or `None` once the source is exhausted.
    fn next_byte(&mut self) -> io::Result<Option<u8>>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).next_byte()
    }
}

/// In-memory slices: each call splits off the first byte.
impl ByteSource for &[u8] {
    #[inline]
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        match self.split_first() {
            Some((&b, rest)) => {
                *self = rest;
                Ok(Some(b))
            }
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// ByteReader
// ---------------------------------------------------------------------------

/// Buffered byte-at-a-time adapter over any `Read`.
pub struct ByteReader<R: Read> {
    inner: BufReader<R>,
    bytes_read: u64,
}

impl<R: Read> ByteReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, reader)
    }

    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        Self {
            inner: BufReader::with_capacity(capacity.max(1), reader),
            bytes_read: 0,
        }
    }

    /// Bytes handed out so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}

impl<R: Read> ByteSource for ByteReader<R> {
    #[inline]
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            let byte = match self.inner.fill_buf() {
                Ok(buf) => buf.first().copied(),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if byte.is_some() {
                self.inner.consume(1);
                self.bytes_read += 1;
            }
            return Ok(byte);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
