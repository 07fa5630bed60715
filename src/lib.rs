//! Oxilz78: streaming LZ78 factorization in Rust.
//!
//! The crate provides:
//! - A dictionary trie with move-to-front child lists (`trie`)
//! - The LZ78 compressor driving it (`compressor`)
//! - Factor sinks (`consumer`) and byte sources (`source`)
//! - A compact factor stream encoding (`format`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use oxilz78::compressor::compress_bytes;
//! use oxilz78::factor::Factor;
//!
//! let (factors, trie_size) = compress_bytes(b"abab").unwrap();
//! assert_eq!(
//!     factors,
//!     vec![Factor::new(0, b'a'), Factor::new(0, b'b'), Factor::new(1, b'b')]
//! );
//! assert_eq!(trie_size, 4);
//! ```

pub mod compressor;
pub mod consumer;
pub mod factor;
pub mod format;
pub mod io;
pub mod source;
pub mod trie;

#[cfg(feature = "cli")]
pub mod cli;

pub use compressor::{CompressError, CompressOptions, Compressor};
pub use consumer::{FactorBuffer, FactorConsumer, FactorCounter};
pub use factor::Factor;
pub use trie::{BinaryTrie, NodeId, ROOT, Trie, TrieError};
