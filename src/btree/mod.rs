//! # B-Tree Core
//!
//! This module implements the order-`2t` B-tree that backs [`BTree`]. The
//! tree is parameterized by a minimum degree `t` (clamped to at least 2):
//! every node holds at most `2t - 1` keys, and rebalancing keeps non-root
//! nodes from starving as keys are deleted.
//!
//! ## Node Structure
//!
//! A node is a bounded container of ordered entries plus, if internal, one
//! more child reference than it has entries:
//!
//! ```text
//!            entries:   [ k0 | k1 | k2 ]
//!            children: [c0 | c1 | c2 | c3]
//!
//!   every key under c1 satisfies  k0 < key < k1
//! ```
//!
//! The offset-by-one relationship between the two sequences is the most
//! error-prone invariant in the structure, so all paired mutation goes
//! through `Node` primitives (`insert_entry`, `take`, `put` and their edge
//! variants) rather than through the sequences directly.
//!
//! ## Proactive Rebalancing
//!
//! Both mutating descents fix nodes *before* entering them:
//!
//! - **Insert** splits every full node through its already-visited parent,
//!   then continues into whichever half the key belongs to. Splitting the
//!   root first guarantees every full node met during the descent has a
//!   known parent.
//! - **Delete** ensures a child can spare a key (holds at least `t`) before
//!   descending into it, either by rotating an entry through the parent
//!   separator from an adjacent sibling or by merging the child with a
//!   sibling around the separator.
//!
//! The spare threshold is deliberately `t`, not the textbook `t - 1`; the
//! tree trades a slightly lower fill factor for never having to revisit a
//! node on the way back up.
//!
//! ## Storage
//!
//! Nodes live in a `NodeArena` and refer to each other by `NodeId` index,
//! the in-memory analogue of a page number. Split and
//! merge allocate and free arena slots; a freed slot is recycled before the
//! slot vector grows.

mod arena;
mod iter;
mod node;
mod tree;

pub use iter::Iter;
pub use tree::BTree;
