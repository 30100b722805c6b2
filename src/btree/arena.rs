//! # Node Arena
//!
//! Flat slot storage for tree nodes. Nodes refer to each other by [`NodeId`]
//! index instead of owning pointers, which keeps split and merge to plain
//! moves of node contents and makes dropping the tree a single `Vec` drop.
//!
//! Freed slots are tracked in a free-slot stack and reused before the slot
//! vector grows, so a mixed insert/delete workload does not bloat the arena:
//!
//! ```text
//! slots: [ n0 | n1 | (free) | n3 | (free) ]
//! free:  [ 4, 2 ]                 <- next alloc reuses slot 4
//! ```
//!
//! A freed slot holds an empty node, so deallocating also drops the keys and
//! values that were stored in it. Handing a stale or out-of-range `NodeId`
//! to the arena is a crate bug and panics on the slot index bounds check.

use std::mem;

use super::node::Node;

/// Index of a node slot in the arena. The in-memory analogue of a page
/// number: cheap to copy, meaningless outside its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
pub(crate) struct NodeArena<K, V> {
    slots: Vec<Node<K, V>>,
    free: Vec<NodeId>,
}

impl<K, V> NodeArena<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Stores a node, reusing a freed slot when one is available.
    pub(crate) fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id.index()] = node;
                id
            }
            None => {
                self.slots.push(node);
                NodeId(self.slots.len() as u32 - 1)
            }
        }
    }

    /// Removes the node and recycles its slot. The returned node's subtree
    /// ids stay live; only this slot is freed.
    pub(crate) fn dealloc(&mut self, id: NodeId) -> Node<K, V> {
        let node = mem::take(&mut self.slots[id.index()]);
        self.free.push(id);
        node
    }

    /// Moves the node out of its slot without freeing the slot, leaving an
    /// empty node behind. Pair with [`put`](Self::put) on the same id.
    pub(crate) fn take(&mut self, id: NodeId) -> Node<K, V> {
        mem::take(&mut self.slots[id.index()])
    }

    pub(crate) fn put(&mut self, id: NodeId, node: Node<K, V>) {
        self.slots[id.index()] = node;
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<K, V> {
        &self.slots[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        &mut self.slots[id.index()]
    }

    #[cfg(test)]
    pub(crate) fn live_nodes(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::btree::node::KeyEntry;

    fn leaf_with(key: i32) -> Node<i32, i32> {
        let mut node = Node::new();
        node.insert_entry(KeyEntry { key, value: key }, None, None);
        node
    }

    #[test]
    fn alloc_grows_the_slot_vector() {
        let mut arena = NodeArena::new();

        let a = arena.alloc(leaf_with(1));
        let b = arena.alloc(leaf_with(2));

        assert_ne!(a, b);
        assert_eq!(arena.live_nodes(), 2);
        assert_eq!(arena.node(a).entry(0).key, 1);
        assert_eq!(arena.node(b).entry(0).key, 2);
    }

    #[test]
    fn dealloc_recycles_the_slot() {
        let mut arena = NodeArena::new();

        let a = arena.alloc(leaf_with(1));
        let _b = arena.alloc(leaf_with(2));

        let removed = arena.dealloc(a);
        assert_eq!(removed.entry(0).key, 1);
        assert_eq!(arena.live_nodes(), 1);

        let c = arena.alloc(leaf_with(3));
        assert_eq!(c, a);
        assert_eq!(arena.live_nodes(), 2);
        assert_eq!(arena.node(c).entry(0).key, 3);
    }

    #[test]
    fn take_leaves_the_slot_live() {
        let mut arena = NodeArena::new();

        let a = arena.alloc(leaf_with(7));
        let node = arena.take(a);
        assert_eq!(node.entry(0).key, 7);
        assert_eq!(arena.live_nodes(), 1);

        arena.put(a, node);
        assert_eq!(arena.node(a).entry(0).key, 7);
    }
}
