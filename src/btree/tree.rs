//! # B-Tree Operations
//!
//! This module implements the tree-level algorithms on top of the node
//! primitives: insert, lookup, upsert, delete, delete-min/max and the
//! borrow/merge rebalancing helpers they share.
//!
//! ## Single-Pass Descents
//!
//! Every mutating operation is one downward pass over `current: NodeId`:
//!
//! ```text
//! insert(k):                          delete(k):
//!   split root if full                  loop:
//!   loop:                                 search current for k
//!     split current if full                 miss        -> None
//!       (through tracked parent)            found@leaf  -> remove, done
//!     leaf -> insert, done                  found@inner -> replace from a
//!     else descend                                         spare subtree,
//!                                                          or merge & go on
//!                                           descend     -> fix child first
//!                                                          (borrow | merge)
//! ```
//!
//! Insert splits a full node through its parent *before* entering it, so a
//! promoted median always has somewhere to go. Delete ensures a child can
//! spare a key (holds at least `t`) *before* entering it, so removing an
//! entry never leaves a node in need of an upward fix. The two policies
//! together make every operation O(log N) with no second pass.
//!
//! ## Borrow and Merge
//!
//! A deficient child is fixed through its parent separator:
//!
//! ```text
//! borrow from right sibling:          merge around the separator:
//!
//!    [ .. s .. ]                         [ .. s .. ]
//!    /        \                          /        \
//! [child]   [m | rest..]    =>      [c0 .. ck]  [s0 .. sk]
//!                                        \        /
//!    [ .. m .. ]                    [c0 .. ck | s | s0 .. sk]
//!    /        \
//! [child s]  [rest..]
//! ```
//!
//! A merge consumes a separator from the parent; if that empties the root,
//! the merged node is promoted as the new root immediately and the old root
//! slot is recycled.
//!
//! ## Duplicate Keys
//!
//! `insert` never rejects duplicates; equal keys coexist and are
//! independently deletable. `upsert` is the only key-uniqueness path: it
//! replaces the value of an existing entry in place.

use super::arena::{NodeArena, NodeId};
use super::iter::Iter;
use super::node::{KeyEntry, Node, SearchStep};

/// Smallest supported minimum degree. Constructing a tree with a smaller
/// value clamps to this.
pub const MIN_DEGREE_FLOOR: usize = 2;

/// An ordered map backed by an order-`2t` B-tree with proactive top-down
/// rebalancing. See the [crate docs](crate) for the full contract.
#[derive(Debug)]
pub struct BTree<K, V> {
    arena: NodeArena<K, V>,
    root: NodeId,
    len: usize,
    min_degree: usize,
}

impl<K, V> BTree<K, V> {
    /// Creates an empty tree with the default minimum degree of 2
    /// (at most 3 keys per node).
    pub fn new() -> Self {
        Self::with_min_degree(MIN_DEGREE_FLOOR)
    }

    /// Creates an empty tree with minimum degree `t`: non-root nodes aim to
    /// hold at least `t` keys and every node holds at most `2t - 1`. Values
    /// below 2 are clamped to 2.
    pub fn with_min_degree(t: usize) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.alloc(Node::new());
        Self {
            arena,
            root,
            len: 0,
            min_degree: t.max(MIN_DEGREE_FLOOR),
        }
    }

    /// Number of stored entries, counting duplicates.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    /// Lazy ascending traversal over `(&K, &V)` pairs. Each call starts a
    /// fresh pass over the current state.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.arena, self.root)
    }

    fn max_keys(&self) -> usize {
        2 * self.min_degree - 1
    }
}

impl<K: Ord, V> BTree<K, V> {
    /// Inserts an entry, keeping ascending key order. Duplicate keys are
    /// permitted and land to the right of their twins; use
    /// [`upsert`](Self::upsert) to replace instead.
    pub fn insert(&mut self, key: K, value: V) {
        let entry = KeyEntry { key, value };

        // Splitting a full root up front guarantees every full node met
        // during the descent has a known parent.
        if self.arena.node(self.root).len() == self.max_keys() {
            self.split_root();
        }

        let mut parent: Option<NodeId> = None;
        let mut current = self.root;
        loop {
            if self.arena.node(current).len() == self.max_keys() {
                let parent_id = parent.expect("full non-root node has a tracked parent");
                current = self.split_child(parent_id, current, &entry.key);
            }
            if self.arena.node(current).is_leaf() {
                self.arena.node_mut(current).insert_entry(entry, None, None);
                self.len += 1;
                return;
            }
            let at = self.arena.node(current).descend_index(&entry.key);
            parent = Some(current);
            current = self.arena.node(current).child(at);
        }
    }

    /// Returns the value of an entry with this key, or `None`. With
    /// duplicates present, returns the first match on the search path.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.locate(key)
            .map(|(id, at)| &self.arena.node(id).entry(at).value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.locate(key).is_some()
    }

    /// Replaces the value of an existing entry in place and returns the
    /// previous value, or inserts and returns `None`. This is the only path
    /// that guarantees key uniqueness.
    pub fn upsert(&mut self, key: K, value: V) -> Option<V> {
        match self.locate(&key) {
            Some((id, at)) => Some(self.arena.node_mut(id).replace_value(at, value)),
            None => {
                self.insert(key, value);
                None
            }
        }
    }

    /// Removes one entry with this key and returns its value, or `None`.
    /// The descent fixes every child before entering it, so no upward
    /// rebalancing pass is ever needed.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        let mut current = self.root;
        loop {
            match self.arena.node(current).search(key) {
                SearchStep::Miss => return None,
                SearchStep::Found(at) => {
                    if self.arena.node(current).is_leaf() {
                        let (entry, _) = self.arena.node_mut(current).take(at);
                        self.len -= 1;
                        return Some(entry.value);
                    }

                    let left = self.arena.node(current).child(at);
                    let right = self.arena.node(current).child(at + 1);
                    if self.can_spare(left) {
                        let replacement = self.delete_max_in(left);
                        let old = self.arena.node_mut(current).replace_entry(at, replacement);
                        return Some(old.value);
                    } else if self.can_spare(right) {
                        let replacement = self.delete_min_in(right);
                        let old = self.arena.node_mut(current).replace_entry(at, replacement);
                        return Some(old.value);
                    } else {
                        // Neither subtree can spare its extreme entry: fold
                        // both and the matched separator into one node and
                        // continue the deletion inside it.
                        current = self.merge_with_right(current, at);
                    }
                }
                SearchStep::Descend(at) => {
                    let child = self.arena.node(current).child(at);
                    current = if self.can_spare(child) {
                        child
                    } else {
                        self.fix_child(current, at)
                    };
                }
            }
        }
    }

    /// Removes the smallest entry, or returns `None` on an empty tree.
    pub fn delete_min(&mut self) -> Option<(K, V)> {
        if self.len == 0 {
            return None;
        }
        self.promote_collapsed_root();
        let entry = self.delete_min_in(self.root);
        Some((entry.key, entry.value))
    }

    /// Removes the largest entry, or returns `None` on an empty tree.
    pub fn delete_max(&mut self) -> Option<(K, V)> {
        if self.len == 0 {
            return None;
        }
        self.promote_collapsed_root();
        let entry = self.delete_max_in(self.root);
        Some((entry.key, entry.value))
    }

    fn locate(&self, key: &K) -> Option<(NodeId, usize)> {
        let mut current = self.root;
        loop {
            match self.arena.node(current).search(key) {
                SearchStep::Found(at) => return Some((current, at)),
                SearchStep::Descend(at) => current = self.arena.node(current).child(at),
                SearchStep::Miss => return None,
            }
        }
    }

    /// A node can spare a key when it holds at least `t`. The threshold is
    /// deliberately `t`, not the textbook `t - 1`.
    fn can_spare(&self, id: NodeId) -> bool {
        self.arena.node(id).len() >= self.min_degree
    }

    fn split_root(&mut self) {
        let (median, left, right) = self.arena.take(self.root).split();
        let left_id = self.root;
        self.arena.put(left_id, left);
        let right_id = self.arena.alloc(right);

        let mut new_root = Node::new();
        new_root.insert_entry(median, Some(left_id), Some(right_id));
        self.root = self.arena.alloc(new_root);
    }

    /// Splits a full child through its parent and returns the half the key
    /// descends into. The left half reuses the child's slot, so the
    /// parent's replaced child pointer stays valid.
    fn split_child(&mut self, parent: NodeId, child: NodeId, key: &K) -> NodeId {
        let (median, left, right) = self.arena.take(child).split();
        let goes_left = *key < median.key;

        self.arena.put(child, left);
        let right_id = self.arena.alloc(right);
        self.arena
            .node_mut(parent)
            .insert_entry(median, Some(child), Some(right_id));

        if goes_left {
            child
        } else {
            right_id
        }
    }

    /// Makes the child at `at` able to spare a key before it is entered:
    /// rotate an entry through the parent separator from a sibling that can
    /// spare one, else merge with the adjacent sibling. Returns the node to
    /// descend into.
    fn fix_child(&mut self, parent: NodeId, at: usize) -> NodeId {
        let child = self.arena.node(parent).child(at);
        if self.arena.node(parent).is_first_child(child) {
            let sibling = self.arena.node(parent).child(1);
            if self.can_spare(sibling) {
                // The sibling's minimum moves up to separator; the old
                // separator becomes the child's new maximum.
                let (moved, carried) = self.arena.node_mut(sibling).take_min();
                let separator = self.arena.node_mut(parent).replace_entry(0, moved);
                self.arena.node_mut(child).put_max(separator, carried);
                child
            } else {
                self.merge_with_right(parent, at)
            }
        } else {
            let sibling = self.arena.node(parent).child(at - 1);
            if self.can_spare(sibling) {
                let (moved, carried) = self.arena.node_mut(sibling).take_max();
                let separator = self.arena.node_mut(parent).replace_entry(at - 1, moved);
                self.arena.node_mut(child).put_min(separator, carried);
                child
            } else {
                self.merge_with_left(parent, at)
            }
        }
    }

    /// Deletes the largest entry of the subtree at `start`, fixing each
    /// rightmost child before entering it. The caller guarantees `start`
    /// can withstand a removal.
    fn delete_max_in(&mut self, start: NodeId) -> KeyEntry<K, V> {
        let mut current = start;
        loop {
            if self.arena.node(current).is_leaf() {
                self.len -= 1;
                return self.arena.node_mut(current).take_max().0;
            }

            let last = self.arena.node(current).child_count() - 1;
            let rightmost = self.arena.node(current).child(last);
            if self.can_spare(rightmost) {
                current = rightmost;
                continue;
            }

            let sibling = self.arena.node(current).child(last - 1);
            if self.can_spare(sibling) {
                let (moved, carried) = self.arena.node_mut(sibling).take_max();
                let separator = self.arena.node_mut(current).replace_entry(last - 1, moved);
                self.arena.node_mut(rightmost).put_min(separator, carried);
                current = rightmost;
            } else {
                current = self.merge_with_left(current, last);
            }
        }
    }

    /// Mirror of [`delete_max_in`](Self::delete_max_in) down the leftmost
    /// path.
    fn delete_min_in(&mut self, start: NodeId) -> KeyEntry<K, V> {
        let mut current = start;
        loop {
            if self.arena.node(current).is_leaf() {
                self.len -= 1;
                return self.arena.node_mut(current).take_min().0;
            }

            let leftmost = self.arena.node(current).child(0);
            if self.can_spare(leftmost) {
                current = leftmost;
                continue;
            }

            let sibling = self.arena.node(current).child(1);
            if self.can_spare(sibling) {
                let (moved, carried) = self.arena.node_mut(sibling).take_min();
                let separator = self.arena.node_mut(current).replace_entry(0, moved);
                self.arena.node_mut(leftmost).put_max(separator, carried);
                current = leftmost;
            } else {
                current = self.merge_with_right(current, 0);
            }
        }
    }

    /// Merges the children around separator `at` (the child at `at` and its
    /// right sibling) into one node occupying the sibling's slot. The
    /// child's slot is recycled. Returns the merged node.
    fn merge_with_right(&mut self, parent: NodeId, at: usize) -> NodeId {
        let (separator, taken) = self.arena.node_mut(parent).take(at);
        let child_id = taken.expect("merge parent is internal");
        let sibling_id = self.arena.node(parent).child(at);

        let left = self.arena.dealloc(child_id);
        let right = self.arena.take(sibling_id);
        self.arena.put(sibling_id, Node::merged(left, separator, right));

        self.promote_collapsed_root();
        sibling_id
    }

    /// Merges the child at `at` with its left sibling around separator
    /// `at - 1` into one node occupying the child's slot. The sibling's
    /// slot is recycled. Returns the merged node.
    fn merge_with_left(&mut self, parent: NodeId, at: usize) -> NodeId {
        let (separator, taken) = self.arena.node_mut(parent).take(at - 1);
        let sibling_id = taken.expect("merge parent is internal");
        let child_id = self.arena.node(parent).child(at - 1);

        let left = self.arena.dealloc(sibling_id);
        let right = self.arena.take(child_id);
        self.arena.put(child_id, Node::merged(left, separator, right));

        self.promote_collapsed_root();
        child_id
    }

    /// A merge that consumes the root's last separator leaves a zero-key
    /// root with exactly one child. Promote that child and recycle the old
    /// root slot.
    fn promote_collapsed_root(&mut self) {
        let root = self.arena.node(self.root);
        if !root.entries.is_empty() || root.child_count() != 1 {
            return;
        }
        let promoted = root.child(0);
        self.arena.dealloc(self.root);
        self.root = promoted;
    }
}

impl<K, V> Default for BTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, K, V> IntoIterator for &'a BTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
