// Shared helpers for integration tests.
//
// `Expander` rebuilds the input from a factor sequence by growing its own
// dictionary exactly the way the compressor grows the trie: one new node per
// factor with an extension, numbered in emission order.

#![allow(dead_code)]

use oxilz78::factor::Factor;
use oxilz78::trie::NodeId;

/// Dictionary mirror used to invert a factorization.
pub struct Expander {
    /// `(parent, label)` per node; index 0 is the root.
    nodes: Vec<(NodeId, u8)>,
}

impl Expander {
    pub fn new() -> Self {
        Self { nodes: vec![(0, 0)] }
    }

    /// Number of edges from the root to `node`.
    pub fn depth(&self, mut node: NodeId) -> usize {
        let mut d = 0;
        while node != 0 {
            node = self.nodes[node as usize].0;
            d += 1;
        }
        d
    }

    /// Bytes spelled by the path from the root to `node`.
    pub fn spell(&self, mut node: NodeId) -> Vec<u8> {
        let mut out = Vec::new();
        while node != 0 {
            let (parent, label) = self.nodes[node as usize];
            out.push(label);
            node = parent;
        }
        out.reverse();
        out
    }

    /// Append the bytes of `factor` to `out` and grow the dictionary.
    pub fn apply(&mut self, factor: Factor, out: &mut Vec<u8>) {
        assert!(
            (factor.reference as usize) < self.nodes.len(),
            "reference {} before node exists",
            factor.reference
        );
        out.extend_from_slice(&self.spell(factor.reference));
        if let Some(byte) = factor.extension {
            out.push(byte);
            self.nodes.push((factor.reference, byte));
        }
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }
}

/// Rebuild the original input from its factors.
pub fn expand(factors: &[Factor]) -> Vec<u8> {
    let mut ex = Expander::new();
    let mut out = Vec::new();
    for &f in factors {
        ex.apply(f, &mut out);
    }
    out
}

/// Sum over factors of `depth(reference) + has_extension`.
pub fn accounted_length(factors: &[Factor]) -> usize {
    let mut ex = Expander::new();
    let mut sink = Vec::new();
    let mut total = 0;
    for &f in factors {
        total += ex.depth(f.reference) + usize::from(f.extension.is_some());
        ex.apply(f, &mut sink);
    }
    total
}

/// Deterministic pseudo-random bytes over a small alphabet.
pub fn gen_text(size: usize, alphabet: u8, seed: u64) -> Vec<u8> {
    let mut s = seed;
    (0..size)
        .map(|_| {
            s = s.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((s >> 33) % u64::from(alphabet.max(1))) as u8
        })
        .collect()
}
