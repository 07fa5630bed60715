// Validating factor stream decoder.
//
// Beyond parsing, the reader checks that the records describe a sequence a
// compressor could have produced: every reference names a node that exists
// at that point (one node per extended factor, plus the root), and only the
// last factor may lack an extension.

use super::header::{HEADER_LEN, StreamHeader, adler32};
use super::varint;
use super::FormatError;
use crate::factor::Factor;
use crate::trie::{NodeId, ROOT};

/// Iterator over the factors of an encoded stream.
///
/// Yields `Err` at most once, then stops. The trailer is verified when the
/// end marker is reached, so a stream is only fully valid once the iterator
/// has returned `None` without an error.
pub struct FactorReader<'a> {
    data: &'a [u8],
    header: StreamHeader,
    pos: usize,
    factors: u64,
    /// Factors with an extension byte (= nodes added after the root).
    extended: u64,
    terminal_seen: bool,
    done: bool,
}

impl<'a> FactorReader<'a> {
    /// Parse the header and position the reader on the first record.
    pub fn new(data: &'a [u8]) -> Result<Self, FormatError> {
        let header = StreamHeader::parse(data)?;
        Ok(Self {
            data,
            header,
            pos: HEADER_LEN,
            factors: 0,
            extended: 0,
            terminal_seen: false,
            done: false,
        })
    }

    pub fn header(&self) -> StreamHeader {
        self.header
    }

    /// Factors decoded so far.
    pub fn factors_read(&self) -> u64 {
        self.factors
    }

    fn read_varint(&mut self) -> Result<u64, FormatError> {
        let (val, len) = varint::read_u64(&self.data[self.pos..])?;
        self.pos += len;
        Ok(val)
    }

    fn next_record(&mut self) -> Result<Option<Factor>, FormatError> {
        let records_end = self.pos;
        let code = self.read_varint()?;
        if code == 0 {
            self.check_trailer(records_end)?;
            return Ok(None);
        }

        let code = code - 1;
        let has_extension = code & 1 != 0;
        let reference = NodeId::try_from(code >> 1).map_err(|_| {
            FormatError::InvalidInput(format!("reference {} out of range", code >> 1))
        })?;

        if self.terminal_seen {
            return Err(FormatError::InvalidInput(format!(
                "factor {} follows the terminal factor",
                self.factors
            )));
        }
        if u64::from(reference) > self.extended {
            return Err(FormatError::InvalidInput(format!(
                "factor {} references node {reference}, but only {} nodes exist",
                self.factors,
                self.extended + 1
            )));
        }

        if !has_extension && reference == ROOT {
            return Err(FormatError::InvalidInput(format!(
                "factor {} is a terminal factor on the root",
                self.factors
            )));
        }

        let extension = if has_extension {
            let byte = *self.data.get(self.pos).ok_or_else(|| {
                FormatError::InvalidInput("stream ends inside a factor".to_string())
            })?;
            self.pos += 1;
            self.extended += 1;
            Some(byte)
        } else {
            self.terminal_seen = true;
            None
        };

        self.factors += 1;
        Ok(Some(Factor {
            reference,
            extension,
        }))
    }

    /// `records_end` is the offset of the end marker.
    fn check_trailer(&mut self, records_end: usize) -> Result<(), FormatError> {
        let count = self.read_varint()?;
        if count != self.factors {
            return Err(FormatError::CountMismatch {
                expected: count,
                actual: self.factors,
            });
        }

        if self.header.has_checksum() {
            let stored = self
                .data
                .get(self.pos..self.pos + 4)
                .ok_or_else(|| FormatError::InvalidInput("truncated checksum".to_string()))?;
            let expected = u32::from_be_bytes([stored[0], stored[1], stored[2], stored[3]]);
            let actual = adler32(&self.data[HEADER_LEN..records_end]);
            if expected != actual {
                return Err(FormatError::ChecksumMismatch { expected, actual });
            }
            self.pos += 4;
        }

        if self.pos != self.data.len() {
            return Err(FormatError::InvalidInput(format!(
                "{} trailing bytes after stream",
                self.data.len() - self.pos
            )));
        }
        Ok(())
    }
}

impl Iterator for FactorReader<'_> {
    type Item = Result<Factor, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(f)) => Some(Ok(f)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Decode and validate a whole stream.
pub fn read_all(data: &[u8]) -> Result<(StreamHeader, Vec<Factor>), FormatError> {
    let mut reader = FactorReader::new(data)?;
    let factors = reader.by_ref().collect::<Result<Vec<_>, _>>()?;
    Ok((reader.header(), factors))
}
