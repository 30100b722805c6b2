//! In-order traversal over a tree's arena.
//!
//! The iterator keeps an explicit descent stack of `(node, position)`
//! frames instead of recursing, with inline storage sized for trees up to
//! `MAX_EXPECTED_DEPTH` levels; deeper trees spill the stack to the heap
//! transparently.

use smallvec::SmallVec;

use super::arena::{NodeArena, NodeId};
use super::node::Node;

/// Trees rarely exceed this height (a degree-2 tree needs thousands of
/// entries to); the iterator's stack stays heap-free below it.
pub(crate) const MAX_EXPECTED_DEPTH: usize = 8;

type Frame = (NodeId, usize);

/// Lazy ascending iterator of `(&K, &V)` pairs, created by
/// [`BTree::iter`](super::BTree::iter). Finite and restartable: each call
/// to `iter` walks the tree's state at that moment from the start.
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    arena: &'a NodeArena<K, V>,
    stack: SmallVec<[Frame; MAX_EXPECTED_DEPTH]>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(arena: &'a NodeArena<K, V>, root: NodeId) -> Self {
        let mut iter = Self {
            arena,
            stack: SmallVec::new(),
        };
        iter.descend_left(root);
        iter
    }

    /// Pushes the path from `id` down to its leftmost leaf, each frame
    /// positioned at its first entry.
    fn descend_left(&mut self, mut id: NodeId) {
        loop {
            self.stack.push((id, 0));
            let node = self.arena.node(id);
            if node.is_leaf() {
                return;
            }
            id = node.child(0);
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (id, at) = *self.stack.last()?;
            let arena: &'a NodeArena<K, V> = self.arena;
            let node: &'a Node<K, V> = arena.node(id);

            if at == node.len() {
                self.stack.pop();
                continue;
            }

            // Yield this entry, then queue the subtree between it and the
            // next entry of this node.
            self.stack.last_mut().expect("frame checked above").1 += 1;
            if !node.is_leaf() {
                self.descend_left(node.child(at + 1));
            }

            let entry = node.entry(at);
            return Some((&entry.key, &entry.value));
        }
    }
}
