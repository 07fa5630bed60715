mod common;

use oxilz78::compressor::{Compressor, compress_bytes};
use oxilz78::consumer::FactorBuffer;
use oxilz78::format::{self, FactorWriter, StreamFlags};
use oxilz78::trie::{BinaryTrie, NodeId, ROOT, Trie};
use proptest::prelude::*;

use common::{accounted_length, expand};

proptest! {
    #[test]
    fn prop_factors_reconstruct_input(
        data in proptest::collection::vec(any::<u8>(), 0..4096)
    ) {
        let (factors, _) = compress_bytes(&data).unwrap();
        prop_assert_eq!(expand(&factors), data);
    }

    #[test]
    fn prop_small_alphabet_reconstructs(
        data in proptest::collection::vec(0u8..3, 0..8192)
    ) {
        let (factors, trie_size) = compress_bytes(&data).unwrap();
        prop_assert_eq!(accounted_length(&factors), data.len());
        let extended = factors.iter().filter(|f| f.extension.is_some()).count();
        prop_assert_eq!(trie_size, extended + 1);
        prop_assert_eq!(expand(&factors), data);
    }

    #[test]
    fn prop_only_last_factor_may_be_terminal(
        data in proptest::collection::vec(0u8..4, 0..2048)
    ) {
        let (factors, _) = compress_bytes(&data).unwrap();
        if let Some((_, init)) = factors.split_last() {
            prop_assert!(init.iter().all(|f| !f.is_terminal()));
        }
    }

    #[test]
    fn prop_chunking_does_not_matter(
        data in proptest::collection::vec(any::<u8>(), 0..2048),
        chunk in 1usize..64
    ) {
        let (expected, _) = compress_bytes(&data).unwrap();
        let mut c = Compressor::new(BinaryTrie::new(), FactorBuffer::new());
        for part in data.chunks(chunk) {
            c.write(part).unwrap();
        }
        prop_assert_eq!(c.finish().unwrap().consumer.to_vec(), expected);
    }

    #[test]
    fn prop_stream_roundtrip(
        data in proptest::collection::vec(0u8..8, 0..2048),
        checksum in any::<bool>()
    ) {
        let flags = if checksum { StreamFlags::CHECKSUM } else { StreamFlags::empty() };
        let mut c = Compressor::new(BinaryTrie::new(), FactorWriter::new(Vec::new(), flags));
        c.write(&data).unwrap();
        let (bytes, _) = c.finish().unwrap().consumer.finish().unwrap();
        let (_, factors) = format::read_all(&bytes).unwrap();
        prop_assert_eq!(expand(&factors), data);
    }

    #[test]
    fn prop_stream_reader_never_panics(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        let mut framed = b"OX78\x01\x00".to_vec();
        framed.extend_from_slice(&data);
        let _ = format::read_all(&framed);
    }

    /// Random insert/lookup sequences keep labels distinct and size exact.
    #[test]
    fn prop_trie_operations(ops in proptest::collection::vec((0u32..64, any::<u8>()), 0..512)) {
        let mut trie = BinaryTrie::new();
        for (node, label) in ops {
            let node = node % trie.size() as NodeId;
            let before = trie.size();
            match trie.lookup_child(node, label) {
                Some(child) => {
                    prop_assert_eq!(trie.label(child), Some(label));
                    prop_assert_eq!(trie.first_child(node), Some(child));
                    prop_assert_eq!(trie.size(), before);
                }
                None => {
                    let child = trie.insert_child(node, label).unwrap();
                    prop_assert_eq!(trie.size(), before + 1);
                    prop_assert_eq!(child as usize, before);
                    prop_assert_eq!(trie.first_child(node), Some(child));
                }
            }
        }
        for node in 0..trie.size() as NodeId {
            let mut labels: Vec<u8> = trie.children(node).map(|c| trie.label(c).unwrap()).collect();
            let n = labels.len();
            labels.sort_unstable();
            labels.dedup();
            prop_assert_eq!(labels.len(), n);
        }
        prop_assert_eq!(trie.label(ROOT), None);
    }
}
