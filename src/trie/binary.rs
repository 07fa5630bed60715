// Binary (first-child / next-sibling) trie.
//
// Each node stores the label of its incoming edge, the head of its child
// list and the next entry in its parent's child list. Children are kept in
// recency order: inserts go to the front and every successful lookup moves
// the matched child to the front.

use super::{DEFAULT_MAX_NODES, NodeId, ROOT, Trie, TrieError};

/// Nodes reserved up front by `BinaryTrie::new`.
const INITIAL_RESERVE: usize = 16;

/// Trie over byte labels with move-to-front child lists.
///
/// Storage is three parallel arrays indexed by node id. A link value of
/// `ROOT` (0) means "none": the root can never be anybody's child or sibling.
#[derive(Debug, Clone)]
pub struct BinaryTrie {
    /// `labels[v]` = byte on the edge into `v`. The root's entry is unused.
    labels: Vec<u8>,
    /// `first_child[v]` = most recently used child of `v`, or `ROOT`.
    first_child: Vec<NodeId>,
    /// `next_sibling[v]` = next child of `v`'s parent, or `ROOT`.
    next_sibling: Vec<NodeId>,
    /// Upper bound on `size()`, root included.
    max_nodes: usize,
}

impl Default for BinaryTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryTrie {
    /// Create a trie holding only the root.
    pub fn new() -> Self {
        Self::with_limits(INITIAL_RESERVE, DEFAULT_MAX_NODES)
    }

    /// Create a trie with `capacity` nodes preallocated that refuses to grow
    /// past `max_nodes` nodes.
    ///
    /// `max_nodes` is clamped to `[1, DEFAULT_MAX_NODES]`; the root always fits.
    pub fn with_limits(capacity: usize, max_nodes: usize) -> Self {
        let max_nodes = max_nodes.clamp(1, DEFAULT_MAX_NODES);
        let capacity = capacity.clamp(1, max_nodes);
        let mut trie = Self {
            labels: Vec::with_capacity(capacity),
            first_child: Vec::with_capacity(capacity),
            next_sibling: Vec::with_capacity(capacity),
            max_nodes,
        };
        trie.push_node(0);
        trie
    }

    /// Node capacity this trie was built with.
    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    /// Label of the edge into `node`. `None` for the root or unknown ids.
    pub fn label(&self, node: NodeId) -> Option<u8> {
        if node == ROOT {
            return None;
        }
        self.labels.get(node as usize).copied()
    }

    /// Head of `node`'s child list, if it has children.
    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.first_child
            .get(node as usize)
            .copied()
            .filter(|&c| c != ROOT)
    }

    /// Next entry in the child list that contains `node`.
    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.next_sibling
            .get(node as usize)
            .copied()
            .filter(|&s| s != ROOT)
    }

    /// Children of `node` in list order. Does not reorder anything.
    pub fn children(&self, node: NodeId) -> Children<'_> {
        Children {
            trie: self,
            next: self.first_child(node),
        }
    }

    fn push_node(&mut self, label: u8) -> NodeId {
        let id = self.labels.len() as NodeId;
        self.labels.push(label);
        self.first_child.push(ROOT);
        self.next_sibling.push(ROOT);
        id
    }
}

impl Trie for BinaryTrie {
    #[inline]
    fn lookup_child(&mut self, node: NodeId, label: u8) -> Option<NodeId> {
        debug_assert!((node as usize) < self.labels.len(), "unknown node {node}");
        let head = self.first_child[node as usize];

        let mut prev = ROOT;
        let mut v = head;
        while v != ROOT && self.labels[v as usize] != label {
            prev = v;
            v = self.next_sibling[v as usize];
        }
        if v == ROOT {
            return None;
        }

        // Move to front: unlink after `prev`, relink ahead of `head`.
        if v != head {
            self.next_sibling[prev as usize] = self.next_sibling[v as usize];
            self.next_sibling[v as usize] = head;
            self.first_child[node as usize] = v;
        }
        Some(v)
    }

    #[inline]
    fn insert_child(&mut self, parent: NodeId, label: u8) -> Result<NodeId, TrieError> {
        debug_assert!(
            (parent as usize) < self.labels.len(),
            "unknown node {parent}"
        );
        if self.labels.len() >= self.max_nodes {
            return Err(TrieError::Overflow {
                capacity: self.max_nodes,
            });
        }
        let child = self.push_node(label);
        self.next_sibling[child as usize] = self.first_child[parent as usize];
        self.first_child[parent as usize] = child;
        Ok(child)
    }

    #[inline]
    fn size(&self) -> usize {
        self.labels.len()
    }
}

/// Iterator over a node's children, front to back.
pub struct Children<'a> {
    trie: &'a BinaryTrie,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.trie.next_sibling(current);
        Some(current)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
