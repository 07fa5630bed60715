// LZ78 factor: "the dictionary string at `reference`, then `extension`".

use crate::trie::NodeId;

/// One unit of LZ78 output.
///
/// `extension` is `None` only for the last factor of a run, when the input
/// ended in the middle of a dictionary match. A literal `0x00` byte is
/// `Some(0)` and is never confused with the missing extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Factor {
    pub reference: NodeId,
    pub extension: Option<u8>,
}

impl Factor {
    /// A factor that extends `reference` by `byte`.
    pub const fn new(reference: NodeId, byte: u8) -> Self {
        Self {
            reference,
            extension: Some(byte),
        }
    }

    /// The trailing factor of a run: a bare dictionary reference.
    pub const fn terminal(reference: NodeId) -> Self {
        Self {
            reference,
            extension: None,
        }
    }

    /// Whether this factor carries no extension byte.
    pub const fn is_terminal(&self) -> bool {
        self.extension.is_none()
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.extension {
            Some(b) if b.is_ascii_graphic() => write!(f, "({}, '{}')", self.reference, b as char),
            Some(b) => write!(f, "({}, {b:#04x})", self.reference),
            None => write!(f, "({}, -)", self.reference),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nul_byte_is_not_terminal() {
        let f = Factor::new(3, 0);
        assert!(!f.is_terminal());
        assert_ne!(f, Factor::terminal(3));
    }

    #[test]
    fn display_forms() {
        assert_eq!(Factor::new(0, b'a').to_string(), "(0, 'a')");
        assert_eq!(Factor::new(7, 0).to_string(), "(7, 0x00)");
        assert_eq!(Factor::terminal(2).to_string(), "(2, -)");
    }
}
