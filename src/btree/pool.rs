//! A free list that recycles node storage across tree handles.
//!
//! The pool is the one piece of this crate that is genuinely shared
//! across threads: several tree handles derived from the same `Clone`
//! lineage may release and acquire nodes from independent threads, each
//! touching only its own handle. `parking_lot::Mutex` guards the list.

use log::trace;
use parking_lot::Mutex;

use super::context::OwnerTag;
use super::node::Node;

pub(crate) struct NodePool<K, V> {
    free: Mutex<Vec<Box<Node<K, V>>>>,
}

impl<K, V> NodePool<K, V> {
    pub(crate) fn new() -> Self {
        NodePool {
            free: Mutex::new(Vec::new()),
        }
    }

    /// Take a node from the free list, tagging it for `owner`, or
    /// allocate a fresh one if the list is empty.
    pub(crate) fn acquire(&self, owner: OwnerTag) -> Box<Node<K, V>> {
        match self.free.lock().pop() {
            Some(mut node) => {
                trace!("reusing pooled node");
                node.reset(owner);
                node
            }
            None => {
                trace!("pool empty, allocating a fresh node");
                Box::new(Node::empty(owner))
            }
        }
    }

    /// Return a node's storage for future reuse. The node must already
    /// have had its `items`/`children` cleared by the caller's removal
    /// logic, or be about to be — `Node::reset` (called on the next
    /// `acquire`) clears them defensively either way.
    pub(crate) fn release(&self, mut node: Box<Node<K, V>>) {
        trace!("releasing node back to the pool");
        node.items.clear();
        node.children.clear();
        self.free.lock().push(node);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.free.lock().len()
    }
}

impl<K, V> Default for NodePool<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
