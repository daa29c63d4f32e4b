//! The B-tree implementation backing the crate's public [`crate::BTree`]
//! handle.
//!
//! Structure:
//! - `context.rs` : the ownership-identity token that drives copy-on-write.
//! - `pool.rs`     : a free list recycling node storage across clones.
//! - `node.rs`     : the node type and the recursive split/merge/rotate
//!                   algorithms.
//! - `cursor.rs`   : the seekable in-order iterator.
//! - `tree.rs`     : the public handle tying the pieces together.

mod context;
mod cursor;
mod node;
mod pool;
mod tree;

pub use self::cursor::Cursor;
pub use self::tree::BTree;
