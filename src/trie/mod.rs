// Dictionary trie for LZ78 factorization.
//
// The trie owns every substring seen so far as a path of byte-labelled
// edges hanging off the root. Nodes are dense integer ids into a single
// growable store; id 0 is the root and doubles as the "no node" value in
// the link arrays.
//
// - `Trie`: the contract the compressor drives (lookup with MTF, insert)
// - `binary`: `BinaryTrie`: first-child / next-sibling arrays

pub mod binary;

pub use binary::BinaryTrie;

/// Dense node identity. `ROOT` is reserved for the empty string.
pub type NodeId = u32;

/// Identity of the root node.
pub const ROOT: NodeId = 0;

/// Number of nodes a trie may hold by default (ids `0..u32::MAX`).
pub const DEFAULT_MAX_NODES: usize = NodeId::MAX as usize;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrieError {
    /// The node-identity space is exhausted. Fatal for the current run.
    #[error("trie overflow: node capacity of {capacity} exhausted")]
    Overflow { capacity: usize },
}

// ---------------------------------------------------------------------------
// Trie trait
// ---------------------------------------------------------------------------

/// A growing dictionary of byte strings, addressed by node id.
///
/// `lookup_child` takes `&mut self`: a successful lookup may reorder the
/// parent's child list (move-to-front), even though no node is added.
pub trait Trie {
    /// The root node (empty string).
    fn root(&self) -> NodeId {
        ROOT
    }

    /// Find the child of `node` reached over an edge labelled `label`.
    ///
    /// On a hit the child becomes the first entry of `node`'s child list.
    /// Returns `None` when no such child exists.
    fn lookup_child(&mut self, node: NodeId, label: u8) -> Option<NodeId>;

    /// Add a child of `parent` labelled `label` and return its id.
    ///
    /// The caller guarantees `parent` has no child with this label yet.
    fn insert_child(&mut self, parent: NodeId, label: u8) -> Result<NodeId, TrieError>;

    /// Number of nodes, root included.
    fn size(&self) -> usize;
}

impl<T: Trie + ?Sized> Trie for &mut T {
    fn root(&self) -> NodeId {
        (**self).root()
    }

    fn lookup_child(&mut self, node: NodeId, label: u8) -> Option<NodeId> {
        (**self).lookup_child(node, label)
    }

    fn insert_child(&mut self, parent: NodeId, label: u8) -> Result<NodeId, TrieError> {
        (**self).insert_child(parent, label)
    }

    fn size(&self) -> usize {
        (**self).size()
    }
}

impl<T: Trie + ?Sized> Trie for Box<T> {
    fn root(&self) -> NodeId {
        (**self).root()
    }

    fn lookup_child(&mut self, node: NodeId, label: u8) -> Option<NodeId> {
        (**self).lookup_child(node, label)
    }

    fn insert_child(&mut self, parent: NodeId, label: u8) -> Result<NodeId, TrieError> {
        (**self).insert_child(parent, label)
    }

    fn size(&self) -> usize {
        (**self).size()
    }
}
