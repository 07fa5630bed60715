// Factor stream header and trailer.
//
// Layout:
//   header   magic "OX78" | version (1 byte) | flags (1 byte)
//   records  see `writer`
//   trailer  factor count (varint) | [adler32 (4 bytes, big-endian) if CHECKSUM]

use std::io::{self, Write};

use bitflags::bitflags;

use super::FormatError;

pub const STREAM_MAGIC: [u8; 4] = *b"OX78";
pub const STREAM_VERSION: u8 = 1;

/// Encoded header length in bytes.
pub const HEADER_LEN: usize = STREAM_MAGIC.len() + 2;

bitflags! {
    /// Header flag byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StreamFlags: u8 {
        /// The trailer carries an Adler-32 of the record bytes.
        const CHECKSUM = 1 << 0;
    }
}

/// Parsed stream header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    pub version: u8,
    pub flags: StreamFlags,
}

impl StreamHeader {
    pub fn new(flags: StreamFlags) -> Self {
        Self {
            version: STREAM_VERSION,
            flags,
        }
    }

    pub fn has_checksum(&self) -> bool {
        self.flags.contains(StreamFlags::CHECKSUM)
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[..4].copy_from_slice(&STREAM_MAGIC);
        out[4] = self.version;
        out[5] = self.flags.bits();
        out
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.to_bytes())
    }

    /// Parse a header from the front of `data`.
    pub fn parse(data: &[u8]) -> Result<Self, FormatError> {
        if data.len() < HEADER_LEN {
            return Err(FormatError::InvalidInput(format!(
                "stream too short for header: {} bytes",
                data.len()
            )));
        }
        if data[..4] != STREAM_MAGIC {
            return Err(FormatError::InvalidInput(format!(
                "bad magic: {:02X?}",
                &data[..4]
            )));
        }
        let version = data[4];
        if version != STREAM_VERSION {
            return Err(FormatError::Unsupported(format!(
                "stream version {version}"
            )));
        }
        let flags = StreamFlags::from_bits(data[5]).ok_or_else(|| {
            FormatError::InvalidInput(format!("unknown header flags {:#04x}", data[5]))
        })?;
        Ok(Self { version, flags })
    }
}

// ---------------------------------------------------------------------------
// Adler-32
// ---------------------------------------------------------------------------

/// Incremental Adler-32 over the record bytes.
pub(crate) struct Adler32 {
    #[cfg(feature = "adler32")]
    inner: simd_adler32::Adler32,
    #[cfg(not(feature = "adler32"))]
    a: u32,
    #[cfg(not(feature = "adler32"))]
    b: u32,
}

impl Adler32 {
    pub(crate) fn new() -> Self {
        #[cfg(feature = "adler32")]
        {
            Self {
                inner: simd_adler32::Adler32::new(),
            }
        }
        #[cfg(not(feature = "adler32"))]
        {
            Self { a: 1, b: 0 }
        }
    }

    pub(crate) fn update(&mut self, data: &[u8]) {
        #[cfg(feature = "adler32")]
        {
            self.inner.write(data);
        }
        #[cfg(not(feature = "adler32"))]
        {
            const MOD_ADLER: u32 = 65521;
            for &byte in data {
                self.a = (self.a + u32::from(byte)) % MOD_ADLER;
                self.b = (self.b + self.a) % MOD_ADLER;
            }
        }
    }

    pub(crate) fn finish(&self) -> u32 {
        #[cfg(feature = "adler32")]
        {
            self.inner.finish()
        }
        #[cfg(not(feature = "adler32"))]
        {
            (self.b << 16) | self.a
        }
    }
}

pub(crate) fn adler32(data: &[u8]) -> u32 {
    let mut h = Adler32::new();
    h.update(data);
    h.finish()
}
