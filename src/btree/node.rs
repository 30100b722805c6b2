//! # Node Primitives
//!
//! A [`Node`] owns two paired sequences: entries in strictly ascending key
//! order, and (for internal nodes) one more child id than it has entries.
//! Every mutation that touches both sequences lives here so the
//! offset-by-one relationship is enforced at a single point.
//!
//! The primitives are deliberately low-level. `take`/`put` move an
//! `(entry, child)` pair at an edge or index and are the building blocks of
//! the borrow and merge operations in `tree.rs`; they assume the caller
//! upholds the tree-level fill invariants.

use smallvec::SmallVec;
use std::mem;

use super::arena::NodeId;

/// Inline capacity for child id lists. Covers the default minimum degree
/// (`t = 2` means at most 4 children) without heap allocation; larger
/// degrees spill transparently.
const INLINE_CHILDREN: usize = 8;

pub(crate) type ChildIds = SmallVec<[NodeId; INLINE_CHILDREN]>;

/// An ordered key paired with its value; the atomic stored unit. The key is
/// immutable once stored, the value may be replaced in place (upsert).
#[derive(Debug)]
pub(crate) struct KeyEntry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

/// Outcome of a single-node search: an exact match at an entry index, a
/// child index to descend into, or a miss at a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchStep {
    Found(usize),
    Descend(usize),
    Miss,
}

#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) entries: Vec<KeyEntry<K, V>>,
    pub(crate) children: ChildIds,
}

impl<K, V> Default for Node<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            children: SmallVec::new(),
        }
    }
}

impl<K, V> Node<K, V> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn child(&self, index: usize) -> NodeId {
        self.children[index]
    }

    pub(crate) fn child_count(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn is_first_child(&self, id: NodeId) -> bool {
        self.children.first() == Some(&id)
    }

    #[allow(dead_code)]
    pub(crate) fn is_last_child(&self, id: NodeId) -> bool {
        self.children.last() == Some(&id)
    }

    pub(crate) fn entry(&self, index: usize) -> &KeyEntry<K, V> {
        &self.entries[index]
    }

    pub(crate) fn replace_entry(&mut self, index: usize, entry: KeyEntry<K, V>) -> KeyEntry<K, V> {
        mem::replace(&mut self.entries[index], entry)
    }

    pub(crate) fn replace_value(&mut self, index: usize, value: V) -> V {
        mem::replace(&mut self.entries[index].value, value)
    }

    /// Combines two siblings and their separating parent entry into one
    /// node. Entry and child orders are preserved, so the result satisfies
    /// the boundary property whenever the inputs did.
    pub(crate) fn merged(mut left: Self, separator: KeyEntry<K, V>, mut right: Self) -> Self {
        left.entries.push(separator);
        left.entries.append(&mut right.entries);
        left.children.append(&mut right.children);
        left
    }

    /// Removes and returns the entry at `index` together with the child to
    /// its left (absent on leaves).
    pub(crate) fn take(&mut self, index: usize) -> (KeyEntry<K, V>, Option<NodeId>) {
        let entry = self.entries.remove(index);
        let child = if self.children.is_empty() {
            None
        } else {
            Some(self.children.remove(index))
        };
        (entry, child)
    }

    pub(crate) fn take_min(&mut self) -> (KeyEntry<K, V>, Option<NodeId>) {
        self.take(0)
    }

    pub(crate) fn take_max(&mut self) -> (KeyEntry<K, V>, Option<NodeId>) {
        let entry = self.entries.pop().expect("take_max on an empty node");
        let child = self.children.pop();
        (entry, child)
    }

    /// Inverse of [`take`](Self::take): inserts an entry at `index` with an
    /// optional child to its left.
    pub(crate) fn put(&mut self, index: usize, entry: KeyEntry<K, V>, child: Option<NodeId>) {
        self.entries.insert(index, entry);
        if let Some(child) = child {
            self.children.insert(index, child);
        }
    }

    pub(crate) fn put_min(&mut self, entry: KeyEntry<K, V>, child: Option<NodeId>) {
        self.put(0, entry, child);
    }

    pub(crate) fn put_max(&mut self, entry: KeyEntry<K, V>, child: Option<NodeId>) {
        self.entries.push(entry);
        if let Some(child) = child {
            self.children.push(child);
        }
    }

    /// Splits around the median: the left node keeps the first half of the
    /// entries and children, the right node gets the rest, and the median
    /// entry is returned for promotion into the parent. The caller only
    /// splits full nodes, which yields two halves of `t - 1` entries each.
    pub(crate) fn split(mut self) -> (KeyEntry<K, V>, Self, Self) {
        let entry_mid = self.entries.len() / 2;
        let child_mid = self.children.len() / 2;

        let right_entries = self.entries.split_off(entry_mid + 1);
        let median = self
            .entries
            .pop()
            .expect("split requires a non-empty node");
        let right_children: ChildIds = self.children.drain(child_mid..).collect();

        let right = Node {
            entries: right_entries,
            children: right_children,
        };
        (median, self, right)
    }
}

impl<K: Ord, V> Node<K, V> {
    /// Inserts an entry at its ordered position: before the first stored key
    /// strictly greater than the new key, or at the end. Equal keys land to
    /// the right of existing ones, so duplicate inserts stay stable.
    ///
    /// When `left`/`right` are supplied the entry is a promoted split
    /// median: `left` replaces the child occupying the insertion index (the
    /// subtree that was split) and `right` is inserted immediately after.
    /// The children must be supplied together or not at all.
    pub(crate) fn insert_entry(
        &mut self,
        entry: KeyEntry<K, V>,
        left: Option<NodeId>,
        right: Option<NodeId>,
    ) {
        assert!(
            left.is_some() == right.is_some(),
            "split children must be supplied together or not at all"
        );

        let at = self
            .entries
            .iter()
            .position(|e| entry.key < e.key)
            .unwrap_or(self.entries.len());
        self.entries.insert(at, entry);

        if let (Some(left), Some(right)) = (left, right) {
            if at == self.children.len() {
                self.children.push(left);
            } else {
                self.children[at] = left;
            }
            self.children.insert(at + 1, right);
        }
    }

    /// Linear scan for `key`: an exact match wins, otherwise the first child
    /// whose separator exceeds the key (the last child if none does). On a
    /// leaf a non-match is a miss.
    pub(crate) fn search(&self, key: &K) -> SearchStep {
        for (i, e) in self.entries.iter().enumerate() {
            if *key == e.key {
                return SearchStep::Found(i);
            }
            if *key < e.key {
                return if self.is_leaf() {
                    SearchStep::Miss
                } else {
                    SearchStep::Descend(i)
                };
            }
        }
        if self.is_leaf() {
            SearchStep::Miss
        } else {
            SearchStep::Descend(self.children.len() - 1)
        }
    }

    /// Child index for an insertion descent. Unlike [`search`](Self::search)
    /// an equal key keeps scanning, so duplicates descend to the right of
    /// their twins.
    pub(crate) fn descend_index(&self, key: &K) -> usize {
        self.entries
            .iter()
            .position(|e| *key < e.key)
            .unwrap_or(self.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: i32) -> KeyEntry<i32, i32> {
        KeyEntry {
            key,
            value: key * 10,
        }
    }

    fn keys(node: &Node<i32, i32>) -> Vec<i32> {
        node.entries.iter().map(|e| e.key).collect()
    }

    fn id(raw: u32) -> NodeId {
        // Arena ids are opaque outside the arena; fabricate distinct ones
        // through a throwaway arena.
        let mut arena = crate::btree::arena::NodeArena::<i32, i32>::new();
        let mut last = arena.alloc(Node::new());
        for _ in 0..raw {
            last = arena.alloc(Node::new());
        }
        last
    }

    #[test]
    fn insert_entry_keeps_entries_ordered() {
        let mut node = Node::new();
        for key in [5, 1, 3, 4, 2] {
            node.insert_entry(entry(key), None, None);
        }
        assert_eq!(keys(&node), vec![1, 2, 3, 4, 5]);
        assert!(node.is_leaf());
    }

    #[test]
    fn insert_entry_places_duplicates_after_their_twin() {
        let mut node = Node::new();
        node.insert_entry(entry(2), None, None);
        node.insert_entry(
            KeyEntry {
                key: 2,
                value: 99,
            },
            None,
            None,
        );
        node.insert_entry(entry(1), None, None);

        assert_eq!(keys(&node), vec![1, 2, 2]);
        assert_eq!(node.entry(1).value, 20);
        assert_eq!(node.entry(2).value, 99);
    }

    #[test]
    fn insert_entry_with_split_children_replaces_the_split_slot() {
        let (a, b, c, d) = (id(0), id(1), id(2), id(3));

        let mut node = Node::new();
        node.insert_entry(entry(10), Some(a), Some(b));
        assert_eq!(node.children.as_slice(), &[a, b]);

        // Splitting the subtree at b promotes 20: b is replaced by c, d goes
        // after it.
        node.insert_entry(entry(20), Some(c), Some(d));
        assert_eq!(keys(&node), vec![10, 20]);
        assert_eq!(node.children.as_slice(), &[a, c, d]);
    }

    #[test]
    #[should_panic(expected = "supplied together")]
    fn insert_entry_rejects_one_sided_children() {
        let mut node: Node<i32, i32> = Node::new();
        node.insert_entry(entry(1), Some(id(0)), None);
    }

    #[test]
    fn split_promotes_the_median_of_a_full_leaf() {
        let mut node = Node::new();
        for key in 1..=3 {
            node.insert_entry(entry(key), None, None);
        }

        let (median, left, right) = node.split();
        assert_eq!(median.key, 2);
        assert_eq!(keys(&left), vec![1]);
        assert_eq!(keys(&right), vec![3]);
    }

    #[test]
    fn split_divides_children_around_the_median() {
        let ids: Vec<NodeId> = (0..4).map(id).collect();
        let mut node = Node::new();
        node.insert_entry(entry(10), Some(ids[0]), Some(ids[1]));
        node.insert_entry(entry(20), Some(ids[1]), Some(ids[2]));
        node.insert_entry(entry(30), Some(ids[2]), Some(ids[3]));

        let (median, left, right) = node.split();
        assert_eq!(median.key, 20);
        assert_eq!(keys(&left), vec![10]);
        assert_eq!(keys(&right), vec![30]);
        assert_eq!(left.children.len(), 2);
        assert_eq!(right.children.len(), 2);
    }

    #[test]
    fn search_distinguishes_found_descend_and_miss() {
        let mut leaf = Node::new();
        for key in [2, 4, 6] {
            leaf.insert_entry(entry(key), None, None);
        }
        assert_eq!(leaf.search(&4), SearchStep::Found(1));
        assert_eq!(leaf.search(&3), SearchStep::Miss);
        assert_eq!(leaf.search(&7), SearchStep::Miss);

        let mut internal = Node::new();
        internal.insert_entry(entry(10), Some(id(0)), Some(id(1)));
        assert_eq!(internal.search(&10), SearchStep::Found(0));
        assert_eq!(internal.search(&5), SearchStep::Descend(0));
        assert_eq!(internal.search(&15), SearchStep::Descend(1));
    }

    #[test]
    fn take_and_put_are_inverses_at_both_edges() {
        let mut node = Node::new();
        for key in [1, 2, 3] {
            node.insert_entry(entry(key), None, None);
        }

        let (min, min_child) = node.take_min();
        assert_eq!(min.key, 1);
        assert_eq!(min_child, None);

        let (max, max_child) = node.take_max();
        assert_eq!(max.key, 3);
        assert_eq!(max_child, None);
        assert_eq!(keys(&node), vec![2]);

        node.put_min(min, min_child);
        node.put_max(max, max_child);
        assert_eq!(keys(&node), vec![1, 2, 3]);
    }

    #[test]
    fn merged_keeps_order_across_the_separator() {
        let mut left = Node::new();
        left.insert_entry(entry(1), None, None);
        let mut right = Node::new();
        right.insert_entry(entry(3), None, None);

        let merged = Node::merged(left, entry(2), right);
        assert_eq!(keys(&merged), vec![1, 2, 3]);
        assert!(merged.is_leaf());
    }
}
