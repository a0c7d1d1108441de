use crate::node::Node;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct Entry {
    f: u32,
    seq: u64,
    node: Node,
}

impl Entry {
    fn key(&self) -> (u32, u64) {
        (self.f, self.seq)
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed so the max-heap yields the lowest key first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

/// Discovered but unexpanded nodes, popped by ascending `f`. Nodes with equal `f`
/// come out in insertion order. The same state may be queued more than once.
#[derive(Default)]
pub struct Frontier {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: Node) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry {
            f: node.f(),
            seq,
            node,
        });
    }

    pub fn pop_best(&mut self) -> Option<Node> {
        self.heap.pop().map(|entry| entry.node)
    }

    pub fn peek_best(&self) -> Option<&Node> {
        self.heap.peek().map(|entry| &entry.node)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Keeps only the `width` best entries. Survivors keep their original
    /// insertion order for tie-breaking.
    pub fn truncate(&mut self, width: usize) {
        if self.heap.len() <= width {
            return;
        }
        let mut kept = Vec::with_capacity(width);
        while kept.len() < width {
            match self.heap.pop() {
                Some(entry) => kept.push(entry),
                None => break,
            }
        }
        self.heap = BinaryHeap::from(kept);
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.next_seq = 0;
    }
}
