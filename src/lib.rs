//! # memtree - In-Memory Ordered B-Tree Map
//!
//! memtree is a generic ordered associative container backed by a
//! self-balancing order-`2t` B-tree. It supports point lookup, ordered
//! insertion (duplicate keys permitted), upsert, deletion by key, deletion
//! of the minimum/maximum key, and lazy in-order traversal.
//!
//! The defining property of the implementation is that every mutating
//! operation is a single downward pass: insertion splits every full node
//! *before* descending into it, and deletion borrows from a sibling or
//! merges siblings *before* descending into a deficient node. No operation
//! ever needs a second upward fix-up pass, so every operation is bounded by
//! tree height, O(log N).
//!
//! ## Quick Start
//!
//! ```
//! use memtree::BTree;
//!
//! let mut tree = BTree::new();
//! tree.insert(2, "two");
//! tree.insert(1, "one");
//! tree.insert(3, "three");
//!
//! assert_eq!(tree.get(&2), Some(&"two"));
//! assert_eq!(tree.delete_min(), Some((1, "one")));
//!
//! let keys: Vec<i32> = tree.iter().map(|(k, _)| *k).collect();
//! assert_eq!(keys, vec![2, 3]);
//! ```
//!
//! ## Architecture
//!
//! The crate is three cohesive layers, leaves first:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │   BTree (tree.rs)                       │  descent algorithms, size,
//! │   insert / get / upsert / delete /      │  root ownership
//! │   delete_min / delete_max / iter        │
//! ├─────────────────────────────────────────┤
//! │   Node (node.rs)                        │  ordered entries + child ids,
//! │   insert_entry / split / search /       │  structural invariants,
//! │   take / put at edges and indexes       │  low-level mutation
//! ├─────────────────────────────────────────┤
//! │   NodeArena (arena.rs)                  │  slot vector addressed by
//! │   alloc / dealloc / take / put          │  NodeId, free-slot recycling
//! └─────────────────────────────────────────┘
//! ```
//!
//! Nodes are addressed by `NodeId` indexes into an arena rather than owning
//! pointers. Splits and merges move node contents between slots, freed slots
//! are recycled, and dropping the tree drops one flat `Vec` with no
//! recursive teardown.
//!
//! ## Scope
//!
//! Purely in-memory and single-threaded: no persistence, no serialization,
//! no interior mutability, no built-in concurrency control. Callers that
//! need concurrent access must serialize externally, since a split or merge
//! may touch any node on the path from the root to a leaf.

pub mod btree;

pub use btree::{BTree, Iter};
