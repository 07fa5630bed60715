// Factor consumers: sinks for the compressor's output.
//
// The compressor hands every factor to a `FactorConsumer` in emission order
// and never revisits it. Built-in sinks:
//   - `FactorBuffer` : keeps every factor in memory
//   - `FactorCounter`: keeps only the count
// The `format` module adds a sink that serializes factors to a writer.

use crate::factor::Factor;
use crate::trie::NodeId;

// ---------------------------------------------------------------------------
// FactorConsumer trait
// ---------------------------------------------------------------------------

/// Receives LZ78 factors in emission order.
///
/// Consuming is append-only. `factor_count` must be exact after any prefix
/// of calls, including zero.
///
/// # Implementing a custom consumer
///
/// ```
/// use oxilz78::consumer::FactorConsumer;
/// use oxilz78::factor::Factor;
///
/// #[derive(Default)]
/// struct Terminals {
///     seen: u64,
///     terminals: u64,
/// }
///
/// impl FactorConsumer for Terminals {
///     fn consume(&mut self, factor: Factor) {
///         self.seen += 1;
///         self.terminals += factor.is_terminal() as u64;
///     }
///     fn factor_count(&self) -> u64 {
///         self.seen
///     }
/// }
/// ```
pub trait FactorConsumer {
    /// Record one factor.
    fn consume(&mut self, factor: Factor);

    /// Number of factors consumed so far.
    fn factor_count(&self) -> u64;
}

impl<C: FactorConsumer + ?Sized> FactorConsumer for &mut C {
    fn consume(&mut self, factor: Factor) {
        (**self).consume(factor)
    }

    fn factor_count(&self) -> u64 {
        (**self).factor_count()
    }
}

impl<C: FactorConsumer + ?Sized> FactorConsumer for Box<C> {
    fn consume(&mut self, factor: Factor) {
        (**self).consume(factor)
    }

    fn factor_count(&self) -> u64 {
        (**self).factor_count()
    }
}

// ---------------------------------------------------------------------------
// FactorBuffer
// ---------------------------------------------------------------------------

/// Stores all factors, split into parallel reference / extension columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactorBuffer {
    refs: Vec<NodeId>,
    extensions: Vec<Option<u8>>,
}

impl FactorBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            refs: Vec::with_capacity(capacity),
            extensions: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// The `index`-th factor in emission order.
    pub fn get(&self, index: usize) -> Option<Factor> {
        Some(Factor {
            reference: *self.refs.get(index)?,
            extension: self.extensions[index],
        })
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Factor> + '_ {
        self.refs
            .iter()
            .zip(&self.extensions)
            .map(|(&reference, &extension)| Factor {
                reference,
                extension,
            })
    }

    pub fn to_vec(&self) -> Vec<Factor> {
        self.iter().collect()
    }

    /// Reference column.
    pub fn references(&self) -> &[NodeId] {
        &self.refs
    }

    /// Extension column.
    pub fn extensions(&self) -> &[Option<u8>] {
        &self.extensions
    }
}

impl FactorConsumer for FactorBuffer {
    #[inline]
    fn consume(&mut self, factor: Factor) {
        self.refs.push(factor.reference);
        self.extensions.push(factor.extension);
    }

    #[inline]
    fn factor_count(&self) -> u64 {
        self.refs.len() as u64
    }
}

// ---------------------------------------------------------------------------
// FactorCounter
// ---------------------------------------------------------------------------

/// Discards factors, counting them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FactorCounter {
    count: u64,
}

impl FactorCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FactorConsumer for FactorCounter {
    #[inline]
    fn consume(&mut self, _factor: Factor) {
        self.count += 1;
    }

    #[inline]
    fn factor_count(&self) -> u64 {
        self.count
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_preserves_order() {
        let mut buf = FactorBuffer::new();
        assert_eq!(buf.factor_count(), 0);
        buf.consume(Factor::new(0, b'a'));
        buf.consume(Factor::new(1, 0));
        buf.consume(Factor::terminal(1));
        assert_eq!(buf.factor_count(), 3);
        assert_eq!(
            buf.to_vec(),
            vec![Factor::new(0, b'a'), Factor::new(1, 0), Factor::terminal(1)]
        );
        assert_eq!(buf.references(), &[0, 1, 1]);
        assert_eq!(buf.extensions(), &[Some(b'a'), Some(0), None]);
        assert_eq!(buf.get(2), Some(Factor::terminal(1)));
        assert_eq!(buf.get(3), None);
    }

    #[test]
    fn counter_counts_every_call() {
        let mut c = FactorCounter::new();
        for i in 0..5 {
            assert_eq!(c.factor_count(), i);
            c.consume(Factor::new(0, i as u8));
        }
        assert_eq!(c.factor_count(), 5);
    }

    #[test]
    fn consumers_work_through_references_and_boxes() {
        fn feed<C: FactorConsumer>(mut sink: C) {
            sink.consume(Factor::new(0, b'x'));
        }

        let mut buf = FactorBuffer::new();
        feed(&mut buf);
        let mut boxed: Box<dyn FactorConsumer> = Box::new(FactorCounter::new());
        boxed.consume(Factor::terminal(0));
        assert_eq!(buf.factor_count(), 1);
        assert_eq!(boxed.factor_count(), 1);
    }
}
