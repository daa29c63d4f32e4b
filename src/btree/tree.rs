//! [`BTree`], the public handle over the node/pool/context machinery in
//! the rest of this module.

use std::sync::Arc;

use crate::error::BTreeError;

use super::context::OwnerTag;
use super::cursor::Cursor;
use super::node::{self, Node, Removal};
use super::pool::NodePool;

/// An ordered, in-memory `K -> V` container with a configurable branching
/// factor and an O(1) [`Clone`].
///
/// Cloning a `BTree` shares the underlying nodes until one of the two
/// handles is written to, at which point only the path being written
/// copies — every other node, and every clone that never writes, keeps
/// pointing at the original storage.
///
/// ```
/// use cow_btree::BTree;
///
/// let mut t = BTree::new(32);
/// for i in 0..1000 {
///     t.set(i, i * i);
/// }
///
/// let snapshot = t.clone();
/// t.set(0, -1);
///
/// assert_eq!(t.get(&0), Some(&-1));
/// assert_eq!(snapshot.get(&0), Some(&0));
/// assert_eq!(snapshot.len(), 1000);
/// ```
pub struct BTree<K, V> {
    root: Option<Arc<Node<K, V>>>,
    d: usize,
    len: usize,
    ctx: OwnerTag,
    pool: Arc<NodePool<K, V>>,
}

impl<K, V> BTree<K, V> {
    /// Build a tree with branching factor `d`: every non-root node holds
    /// between `d - 1` and `2d - 1` items. Panics if `d < 2`.
    pub fn new(d: usize) -> Self {
        match Self::try_new(d) {
            Ok(tree) => tree,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible counterpart to [`BTree::new`], for callers that derive
    /// `d` from untrusted input.
    pub fn try_new(d: usize) -> Result<Self, BTreeError> {
        if d < 2 {
            return Err(BTreeError::DegreeTooSmall { degree: d });
        }
        Ok(BTree {
            root: None,
            d,
            len: 0,
            ctx: OwnerTag::fresh(),
            pool: Arc::new(NodePool::new()),
        })
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True iff the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The branching factor this tree was built with.
    pub fn branching_factor(&self) -> usize {
        self.d
    }

    fn max_items(&self) -> usize {
        2 * self.d - 1
    }

    fn min_items(&self) -> usize {
        self.d - 1
    }
}

impl<K: Ord, V> BTree<K, V> {
    /// Look up the value for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.root.as_ref().and_then(|root| node::get(root, key))
    }

    /// True iff `key` is present.
    pub fn has(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Look up `key`, returning its value together with its 0-based rank
    /// in sorted order.
    pub fn get_with_index(&self, key: &K) -> Option<(&V, usize)> {
        self.root
            .as_ref()
            .and_then(|root| node::get_with_index(root, key, 0))
    }

    /// The entry at 0-based rank `rank` in sorted order.
    pub fn at(&self, rank: usize) -> Option<(&K, &V)> {
        self.root.as_ref().and_then(|root| node::at(root, rank))
    }

    /// The smallest entry in the tree.
    pub fn min(&self) -> Option<(&K, &V)> {
        self.root.as_ref().and_then(|root| node::min_entry(root))
    }

    /// The largest entry in the tree.
    pub fn max(&self) -> Option<(&K, &V)> {
        self.root.as_ref().and_then(|root| node::max_entry(root))
    }

    /// Visit every entry in ascending order. `visit` returns `false` to
    /// stop early.
    pub fn ascend(&self, mut visit: impl FnMut(&K, &V) -> bool) {
        if let Some(root) = &self.root {
            node::ascend(root, None, None, &mut visit);
        }
    }

    /// Visit every entry with `start <= key < stop`.
    pub fn ascend_range(&self, start: &K, stop: &K, mut visit: impl FnMut(&K, &V) -> bool) {
        if let Some(root) = &self.root {
            node::ascend(root, Some((start, true)), Some((stop, false)), &mut visit);
        }
    }

    /// Visit every entry with `key < stop`.
    pub fn ascend_less_than(&self, stop: &K, mut visit: impl FnMut(&K, &V) -> bool) {
        if let Some(root) = &self.root {
            node::ascend(root, None, Some((stop, false)), &mut visit);
        }
    }

    /// Visit every entry with `key >= start`.
    pub fn ascend_greater_or_equal(&self, start: &K, mut visit: impl FnMut(&K, &V) -> bool) {
        if let Some(root) = &self.root {
            node::ascend(root, Some((start, true)), None, &mut visit);
        }
    }

    /// Visit every entry in descending order.
    pub fn descend(&self, mut visit: impl FnMut(&K, &V) -> bool) {
        if let Some(root) = &self.root {
            node::descend(root, None, None, &mut visit);
        }
    }

    /// Visit every entry with `stop < key <= start`, in descending order.
    pub fn descend_range(&self, start: &K, stop: &K, mut visit: impl FnMut(&K, &V) -> bool) {
        if let Some(root) = &self.root {
            node::descend(root, Some((start, true)), Some((stop, false)), &mut visit);
        }
    }

    /// Visit every entry with `key <= start`, in descending order.
    pub fn descend_less_or_equal(&self, start: &K, mut visit: impl FnMut(&K, &V) -> bool) {
        if let Some(root) = &self.root {
            node::descend(root, Some((start, true)), None, &mut visit);
        }
    }

    /// Visit every entry with `key > stop`, in descending order.
    pub fn descend_greater_than(&self, stop: &K, mut visit: impl FnMut(&K, &V) -> bool) {
        if let Some(root) = &self.root {
            node::descend(root, None, Some((stop, false)), &mut visit);
        }
    }

    /// A cursor positioned just before the smallest entry with key `>=
    /// key` (or directly on an equal entry, if one exists).
    pub fn before(&self, key: &K) -> Cursor<K, V> {
        Cursor::seek_before(&self.root, key)
    }

    /// A cursor positioned just before the smallest entry in the tree.
    pub fn before_min(&self) -> Cursor<K, V> {
        Cursor::seek_before_min(&self.root)
    }

    /// A cursor positioned just after the largest entry with key `<=
    /// key` (or directly on an equal entry, if one exists).
    pub fn after(&self, key: &K) -> Cursor<K, V> {
        Cursor::seek_after(&self.root, key)
    }
}

impl<K: Ord + Clone, V: Clone> BTree<K, V> {
    /// Insert `key` -> `value`, returning the previous value if `key`
    /// was already present.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        let max_items = self.max_items();
        if self.root.is_none() {
            self.root = Some(Arc::new(Node::empty(self.ctx.clone())));
        }
        if self.root.as_ref().unwrap().items.len() == max_items {
            let old_root = self.root.take().unwrap();
            self.root = Some(node::split_root(old_root, &self.pool, &self.ctx));
        }
        let root = self.root.as_mut().unwrap();
        let replaced = node::insert(root, &self.pool, &self.ctx, max_items, key, value);
        if replaced.is_none() {
            self.len += 1;
        }
        replaced
    }

    /// Remove `key`, returning its value if it was present.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        self.remove(Removal::Key(key)).map(|e| e.value)
    }

    /// Remove and return the smallest entry.
    pub fn delete_min(&mut self) -> Option<(K, V)> {
        self.remove(Removal::Min).map(|e| (e.key, e.value))
    }

    /// Remove and return the largest entry.
    pub fn delete_max(&mut self) -> Option<(K, V)> {
        self.remove(Removal::Max).map(|e| (e.key, e.value))
    }

    fn remove(&mut self, target: Removal<'_, K>) -> Option<node::Entry<K, V>> {
        let min_items = self.min_items();
        let root = self.root.as_mut()?;
        let removed = node::remove(root, &self.pool, &self.ctx, min_items, target);
        if removed.is_some() {
            self.len -= 1;
        }

        let root_ref = self.root.as_ref().unwrap();
        if root_ref.items.is_empty() {
            let root_arc = self.root.take().unwrap();
            if root_arc.is_leaf() {
                node::free_node(root_arc, &self.pool, &self.ctx);
                self.root = None;
            } else {
                let child = Arc::clone(&root_arc.children[0]);
                node::free_node(root_arc, &self.pool, &self.ctx);
                self.root = Some(child);
            }
        }
        removed
    }
}

impl<K, V> Clone for BTree<K, V> {
    /// O(1): the clone shares every existing node with `self` and only
    /// diverges lazily, the first time either handle is written to.
    fn clone(&self) -> Self {
        BTree {
            root: self.root.clone(),
            d: self.d,
            len: self.len,
            ctx: OwnerTag::fresh(),
            pool: Arc::clone(&self.pool),
        }
    }
}
