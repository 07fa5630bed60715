// Streaming LZ78 compressor.
//
// The driver walks the trie with a cursor, one input byte per step:
//   - the cursor has a child labelled with the byte: descend, emit nothing
//   - otherwise: emit (cursor, byte), grow the trie at the cursor, restart
//     at the root
// When the input ends away from the root, one terminal factor (cursor, -)
// records the unfinished match.

use std::io::{self, Read};

use crate::consumer::{FactorBuffer, FactorConsumer};
use crate::factor::Factor;
use crate::source::{ByteReader, ByteSource, DEFAULT_BUFFER_SIZE};
use crate::trie::{BinaryTrie, DEFAULT_MAX_NODES, NodeId, Trie, TrieError};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for one compression run.
#[derive(Debug, Clone)]
pub struct CompressOptions {
    /// Read buffer size used by `compress_reader`.
    pub buffer_size: usize,
    /// Trie nodes to preallocate.
    pub initial_capacity: usize,
    /// Maximum trie size (root included). Exceeding it aborts the run.
    pub max_nodes: usize,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            initial_capacity: 16,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

impl CompressOptions {
    /// An empty trie sized according to these options.
    pub fn build_trie(&self) -> BinaryTrie {
        BinaryTrie::with_limits(self.initial_capacity, self.max_nodes)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CompressError {
    #[error(transparent)]
    Trie(#[from] TrieError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Counters for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressStats {
    /// Input bytes consumed.
    pub bytes_in: u64,
    /// Factors emitted, terminal factor included.
    pub factors: u64,
    /// Final trie size, root included.
    pub trie_size: usize,
}

/// Everything a completed run hands back.
#[derive(Debug)]
pub struct Finished<T, C> {
    pub trie: T,
    pub consumer: C,
    pub stats: CompressStats,
}

// ---------------------------------------------------------------------------
// Compressor
// ---------------------------------------------------------------------------

/// LZ78 driver over a trie `T`, emitting into a consumer `C`.
///
/// Input can be pushed (`push_byte`, `write`) or pulled from a
/// `ByteSource` (`compress`), in any mix. `finish` closes the run.
///
/// # Example
/// ```
/// use oxilz78::compressor::{CompressOptions, Compressor};
/// use oxilz78::consumer::FactorBuffer;
/// use oxilz78::factor::Factor;
///
/// let mut c = Compressor::with_options(&CompressOptions::default(), FactorBuffer::new());
/// c.write(b"aaaa").unwrap();
/// let done = c.finish().unwrap();
/// assert_eq!(
///     done.consumer.to_vec(),
///     vec![Factor::new(0, b'a'), Factor::new(1, b'a'), Factor::terminal(1)]
/// );
/// ```
pub struct Compressor<T: Trie, C: FactorConsumer> {
    trie: T,
    consumer: C,
    cursor: NodeId,
    bytes_in: u64,
    factors: u64,
    buffer_size: usize,
    /// Set once the trie overflowed; the run cannot continue.
    failed: Option<TrieError>,
}

impl<C: FactorConsumer> Compressor<BinaryTrie, C> {
    /// Compressor over a fresh `BinaryTrie` built from `opts`.
    pub fn with_options(opts: &CompressOptions, consumer: C) -> Self {
        let mut c = Self::new(opts.build_trie(), consumer);
        c.buffer_size = opts.buffer_size;
        c
    }
}

impl<T: Trie, C: FactorConsumer> Compressor<T, C> {
    /// Start a run over `trie`. The trie is expected to be fresh.
    pub fn new(trie: T, consumer: C) -> Self {
        let cursor = trie.root();
        Self {
            trie,
            consumer,
            cursor,
            bytes_in: 0,
            factors: 0,
            buffer_size: DEFAULT_BUFFER_SIZE,
            failed: None,
        }
    }

    /// Current trie position: the longest dictionary match since the last
    /// emitted factor.
    pub fn cursor(&self) -> NodeId {
        self.cursor
    }

    /// Bytes consumed so far.
    pub fn bytes_in(&self) -> u64 {
        self.bytes_in
    }

    pub fn trie(&self) -> &T {
        &self.trie
    }

    pub fn consumer(&self) -> &C {
        &self.consumer
    }

    /// Process one input byte.
    #[inline]
    pub fn push_byte(&mut self, byte: u8) -> Result<(), CompressError> {
        if let Some(err) = &self.failed {
            return Err(err.clone().into());
        }

        if let Some(child) = self.trie.lookup_child(self.cursor, byte) {
            self.cursor = child;
        } else {
            // The factor is final once emitted, even if the dictionary
            // cannot take its node.
            self.emit(Factor::new(self.cursor, byte));
            self.bytes_in += 1;
            if let Err(err) = self.trie.insert_child(self.cursor, byte) {
                log::warn!(
                    "oxilz78: dictionary full after {} input bytes: {err}",
                    self.bytes_in
                );
                self.failed = Some(err.clone());
                return Err(err.into());
            }
            self.cursor = self.trie.root();
            return Ok(());
        }
        self.bytes_in += 1;
        Ok(())
    }

    #[inline]
    fn emit(&mut self, factor: Factor) {
        self.consumer.consume(factor);
        self.factors += 1;
    }

    /// Process a block of input bytes in order.
    pub fn write(&mut self, data: &[u8]) -> Result<(), CompressError> {
        data.iter().try_for_each(|&b| self.push_byte(b))
    }

    /// Pull bytes from `source` until it is exhausted.
    ///
    /// Returns the number of bytes consumed by this call.
    pub fn compress<S: ByteSource>(&mut self, mut source: S) -> Result<u64, CompressError> {
        let start = self.bytes_in;
        while let Some(byte) = source.next_byte()? {
            self.push_byte(byte)?;
        }
        Ok(self.bytes_in - start)
    }

    /// Pull bytes from a reader through a `ByteReader` of the configured
    /// buffer size.
    pub fn compress_reader<R: Read>(&mut self, reader: R) -> Result<u64, CompressError> {
        let source = ByteReader::with_capacity(self.buffer_size, reader);
        self.compress(source)
    }

    /// End the run: emit the terminal factor if the cursor is off the root.
    pub fn finish(mut self) -> Result<Finished<T, C>, CompressError> {
        if let Some(err) = self.failed.take() {
            return Err(err.into());
        }
        if self.cursor != self.trie.root() {
            self.emit(Factor::terminal(self.cursor));
        }

        let stats = CompressStats {
            bytes_in: self.bytes_in,
            factors: self.factors,
            trie_size: self.trie.size(),
        };
        log::debug!(
            "oxilz78: compressed {} bytes into {} factors, trie size {}",
            stats.bytes_in,
            stats.factors,
            stats.trie_size
        );

        Ok(Finished {
            trie: self.trie,
            consumer: self.consumer,
            stats,
        })
    }
}

// ---------------------------------------------------------------------------
// One-shot helpers
// ---------------------------------------------------------------------------

/// Factorize `data` with default options.
///
/// Returns the factors and the final trie size.
pub fn compress_bytes(data: &[u8]) -> Result<(Vec<Factor>, usize), CompressError> {
    let mut c = Compressor::with_options(&CompressOptions::default(), FactorBuffer::new());
    c.write(data)?;
    let done = c.finish()?;
    Ok((done.consumer.to_vec(), done.stats.trie_size))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumer::FactorCounter;
    use crate::trie::ROOT;

    #[test]
    fn empty_input_emits_nothing() {
        let (factors, size) = compress_bytes(b"").unwrap();
        assert!(factors.is_empty());
        assert_eq!(size, 1);
    }

    #[test]
    fn single_byte() {
        let (factors, size) = compress_bytes(b"A").unwrap();
        assert_eq!(factors, vec![Factor::new(ROOT, b'A')]);
        assert_eq!(size, 2);
    }

    #[test]
    fn run_ends_inside_a_match() {
        let (factors, size) = compress_bytes(b"aaaa").unwrap();
        assert_eq!(
            factors,
            vec![Factor::new(ROOT, b'a'), Factor::new(1, b'a'), Factor::terminal(1)]
        );
        assert_eq!(size, 3);
    }

    #[test]
    fn run_ends_on_root() {
        let (factors, size) = compress_bytes(b"ab").unwrap();
        assert_eq!(factors, vec![Factor::new(ROOT, b'a'), Factor::new(ROOT, b'b')]);
        assert_eq!(size, 3);
    }

    #[test]
    fn nul_bytes_are_literals() {
        let (factors, _) = compress_bytes(&[0, 0, 0, 0]).unwrap();
        assert_eq!(
            factors,
            vec![Factor::new(ROOT, 0), Factor::new(1, 0), Factor::terminal(1)]
        );
    }

    #[test]
    fn classic_abab() {
        // a | b | ab | aba | -
        let (factors, size) = compress_bytes(b"abababa").unwrap();
        assert_eq!(
            factors,
            vec![
                Factor::new(0, b'a'),
                Factor::new(0, b'b'),
                Factor::new(1, b'b'),
                Factor::new(3, b'a'),
            ]
        );
        assert_eq!(size, 5);
    }

    #[test]
    fn push_and_pull_agree() {
        let data = b"the rain in spain stays mainly in the plain";
        let (pushed, _) = compress_bytes(data).unwrap();

        let mut c = Compressor::with_options(&CompressOptions::default(), FactorBuffer::new());
        let n = c.compress(&data[..]).unwrap();
        assert_eq!(n, data.len() as u64);
        assert_eq!(c.finish().unwrap().consumer.to_vec(), pushed);

        let opts = CompressOptions {
            buffer_size: 3,
            ..Default::default()
        };
        let mut c = Compressor::with_options(&opts, FactorBuffer::new());
        c.compress_reader(io::Cursor::new(&data[..])).unwrap();
        assert_eq!(c.finish().unwrap().consumer.to_vec(), pushed);
    }

    #[test]
    fn chunked_writes_match_one_shot() {
        let data: Vec<u8> = (0u32..2000).map(|i| (i * 7 % 13) as u8).collect();
        let (expected, _) = compress_bytes(&data).unwrap();

        let mut c = Compressor::with_options(&CompressOptions::default(), FactorBuffer::new());
        for chunk in data.chunks(37) {
            c.write(chunk).unwrap();
        }
        assert_eq!(c.bytes_in(), data.len() as u64);
        assert_eq!(c.finish().unwrap().consumer.to_vec(), expected);
    }

    #[test]
    fn stats_reflect_run() {
        let mut c = Compressor::new(BinaryTrie::new(), FactorCounter::new());
        c.write(b"aaaa").unwrap();
        assert_eq!(c.cursor(), 1);
        assert_eq!(c.consumer().factor_count(), 2);
        let done = c.finish().unwrap();
        assert_eq!(
            done.stats,
            CompressStats {
                bytes_in: 4,
                factors: 3,
                trie_size: 3,
            }
        );
    }

    #[test]
    fn borrowed_trie_and_consumer() {
        let mut trie = BinaryTrie::new();
        let mut sink = FactorBuffer::new();
        let mut c = Compressor::new(&mut trie, &mut sink);
        c.write(b"ab").unwrap();
        c.finish().unwrap();
        assert_eq!(trie.size(), 3);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn dynamic_dispatch() {
        let trie: Box<dyn Trie> = Box::new(BinaryTrie::new());
        let sink: Box<dyn FactorConsumer> = Box::new(FactorCounter::new());
        let mut c = Compressor::new(trie, sink);
        c.write(b"abracadabra").unwrap();
        let done = c.finish().unwrap();
        assert_eq!(done.stats.factors, done.consumer.factor_count());
    }

    #[test]
    fn overflow_is_fatal() {
        let opts = CompressOptions {
            max_nodes: 3,
            ..Default::default()
        };
        let mut c = Compressor::with_options(&opts, FactorBuffer::new());
        c.write(b"ab").unwrap();
        let err = c.push_byte(b'c').unwrap_err();
        assert!(matches!(
            err,
            CompressError::Trie(TrieError::Overflow { capacity: 3 })
        ));
        // The overflowing byte still reaches the consumer.
        assert_eq!(
            c.consumer().to_vec(),
            vec![
                Factor::new(ROOT, b'a'),
                Factor::new(ROOT, b'b'),
                Factor::new(ROOT, b'c'),
            ]
        );
        assert_eq!(c.bytes_in(), 3);
        assert_eq!(c.trie().size(), 3);
        // Matching input would not need a new node, but the run is dead.
        assert!(c.push_byte(b'a').is_err());
        assert!(c.finish().is_err());
    }

    #[test]
    fn source_errors_propagate() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("boom"))
            }
        }
        let mut c = Compressor::with_options(&CompressOptions::default(), FactorCounter::new());
        let err = c.compress_reader(Broken).unwrap_err();
        assert!(matches!(err, CompressError::Io(_)));
    }
}
