//! # cow-btree
//!
//! An ordered, in-memory `K -> V` container backed by a B-tree with a
//! configurable branching factor, exposing:
//!
//! - point lookup, insert and delete (`get`/`set`/`delete`)
//! - positional access by rank (`at`, `get_with_index`)
//! - ascending and descending range iteration (`ascend*`/`descend*`)
//! - a seekable [`Cursor`] for resumable, rank-tracking traversal
//! - an O(1) [`Clone`] via lazy structural sharing: cloning a tree shares
//!   every node with the original until one of the two handles is
//!   written to, and only the nodes on the path being written ever copy
//!
//! See [`BTree`] for the full API.

mod btree;
mod error;

pub use crate::btree::{BTree, Cursor};
pub use crate::error::BTreeError;
