#![no_main]
use libfuzzer_sys::fuzz_target;
use oxilz78::compressor::{CompressOptions, Compressor};
use oxilz78::consumer::FactorBuffer;
use oxilz78::format::{self, FactorWriter, StreamFlags};
use oxilz78::trie::BinaryTrie;

fn expand(factors: &[oxilz78::Factor]) -> Vec<u8> {
    let mut nodes: Vec<(u32, u8)> = vec![(0, 0)];
    let mut out = Vec::new();
    for f in factors {
        let mut word = Vec::new();
        let mut n = f.reference;
        while n != 0 {
            let (parent, label) = nodes[n as usize];
            word.push(label);
            n = parent;
        }
        word.reverse();
        out.extend_from_slice(&word);
        if let Some(b) = f.extension {
            out.push(b);
            nodes.push((f.reference, b));
        }
    }
    out
}

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    // First byte picks a small node limit so overflow paths get exercised.
    let (head, input) = data.split_at(1);
    let opts = CompressOptions {
        max_nodes: 2 + head[0] as usize * 4,
        ..Default::default()
    };

    let mut sink = FactorBuffer::new();
    let mut c = Compressor::with_options(&opts, &mut sink);
    let overflowed = c.write(input).is_err();
    let consumed = c.bytes_in() as usize;
    let finished = c.finish();
    assert_eq!(finished.is_err(), overflowed);

    let factors = sink.to_vec();
    let decoded = expand(&factors);
    if overflowed {
        assert_eq!(decoded, &input[..consumed]);
        return;
    }
    assert_eq!(decoded, input);

    let mut c = Compressor::new(
        BinaryTrie::new(),
        FactorWriter::new(Vec::new(), StreamFlags::CHECKSUM),
    );
    c.write(input).unwrap();
    let (bytes, _) = c.finish().unwrap().consumer.finish().unwrap();
    let (_, read) = format::read_all(&bytes).unwrap();
    assert_eq!(read, factors);
});
