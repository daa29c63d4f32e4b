//! A reusable, seekable iterator over a snapshot of the tree.
//!
//! The cursor never mutates a node, so it holds `Arc` clones of the nodes
//! on its current path rather than going through the pool or an ownership
//! context — walking it costs a refcount bump per level, nothing more, and
//! it stays valid even if the tree it was built from is later written to
//! (the writer copies nodes out from under it rather than touching them).

use std::sync::Arc;

use super::node::{prefix_count, Node};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Ascending,
    Descending,
}

struct Frame<K, V> {
    node: Arc<Node<K, V>>,
    idx: usize,
}

/// A cursor over `(key, value)` pairs in sorted order.
///
/// Construct one via [`crate::BTree::before`], [`crate::BTree::before_min`]
/// or [`crate::BTree::after`], then drive it with [`Cursor::next`]:
///
/// ```
/// # use cow_btree::BTree;
/// let mut t = BTree::new(4);
/// t.set(1, "a");
/// t.set(2, "b");
/// let mut c = t.before_min();
/// while c.next() {
///     println!("{:?} -> {:?}", c.key(), c.value());
/// }
/// ```
pub struct Cursor<K, V> {
    stack: Vec<Frame<K, V>>,
    stay: bool,
    direction: Direction,
    position: Option<usize>,
}

/// Rank of the entry the stack currently points at. Every non-top frame's
/// `idx` is a child edge the path descends through, so `prefix_count` (which
/// excludes that child) is exactly right for it. The top frame can instead
/// sit directly on `items[idx]` of a non-leaf node — this happens whenever a
/// seek lands on a key stored above a leaf — in which case the subtree under
/// `children[idx]`, all smaller than that item, must be counted too.
fn rank_of_stack<K, V>(stack: &[Frame<K, V>]) -> usize {
    let mut total: usize = stack.iter().map(|f| prefix_count(&f.node, f.idx)).sum();
    if let Some(top) = stack.last() {
        if !top.node.is_leaf() {
            total += top.node.children[top.idx].count;
        }
    }
    total
}

impl<K: Ord, V> Cursor<K, V> {
    fn empty(direction: Direction) -> Self {
        Cursor {
            stack: Vec::new(),
            stay: false,
            direction,
            position: None,
        }
    }

    /// Position just before the smallest entry with key `>= key` (or, if an
    /// entry equal to `key` exists, directly on it).
    pub(crate) fn seek_before(root: &Option<Arc<Node<K, V>>>, key: &K) -> Self {
        Self::seek_ascend(root, Some(key))
    }

    /// Position just before the smallest entry in the tree.
    pub(crate) fn seek_before_min(root: &Option<Arc<Node<K, V>>>) -> Self {
        Self::seek_ascend(root, None)
    }

    /// Position just after the largest entry with key `<= key` (or, if an
    /// entry equal to `key` exists, directly on it).
    pub(crate) fn seek_after(root: &Option<Arc<Node<K, V>>>, key: &K) -> Self {
        let mut cur = Self::empty(Direction::Descending);
        let Some(mut node) = root.clone() else {
            return cur;
        };
        loop {
            let (i, found) = node.find(key);
            cur.stack.push(Frame {
                node: node.clone(),
                idx: i,
            });
            if found {
                cur.stay = true;
                cur.position = Some(rank_of_stack(&cur.stack));
                return cur;
            }
            if node.is_leaf() {
                break;
            }
            let next = node.children[i].clone();
            node = next;
        }
        cur.reveal_predecessor();
        cur
    }

    fn seek_ascend(root: &Option<Arc<Node<K, V>>>, key: Option<&K>) -> Self {
        let mut cur = Self::empty(Direction::Ascending);
        let Some(mut node) = root.clone() else {
            return cur;
        };
        loop {
            let (i, found) = match key {
                Some(k) => node.find(k),
                None => (0, false),
            };
            cur.stack.push(Frame {
                node: node.clone(),
                idx: i,
            });
            if found {
                cur.stay = true;
                cur.position = Some(rank_of_stack(&cur.stack));
                return cur;
            }
            if node.is_leaf() {
                break;
            }
            let next = node.children[i].clone();
            node = next;
        }
        // The leaf's insertion index already names the smallest entry
        // `>= key` in this leaf (or `len()`, meaning "ask an ancestor").
        let climbed = {
            let mut stay = false;
            while let Some(top) = cur.stack.last() {
                if top.idx < top.node.items.len() {
                    stay = true;
                    break;
                }
                cur.stack.pop();
            }
            stay
        };
        cur.stay = climbed;
        if climbed {
            cur.position = Some(rank_of_stack(&cur.stack));
        }
        cur
    }

    /// Pop frames that have nothing smaller to reveal at this level, then
    /// decrement the first non-exhausted ancestor's index to land on the
    /// predecessor item. Used both by `seek_after` and by descending
    /// advancement after a leaf runs out.
    fn reveal_predecessor(&mut self) {
        while let Some(top) = self.stack.last() {
            if top.idx == 0 {
                self.stack.pop();
            } else {
                break;
            }
        }
        if let Some(top) = self.stack.last_mut() {
            top.idx -= 1;
            self.stay = true;
            self.position = Some(rank_of_stack(&self.stack));
        } else {
            self.stay = false;
            self.position = None;
        }
    }

    /// Advance to the next entry in traversal order, returning `true` if
    /// one was found. `key`/`value`/`index` are valid only after a call
    /// that returned `true`.
    pub fn next(&mut self) -> bool {
        if self.stack.is_empty() {
            return false;
        }
        if self.stay {
            self.stay = false;
            return true;
        }
        let success = match self.direction {
            Direction::Ascending => self.advance_ascend(),
            Direction::Descending => self.advance_descend(),
        };
        if success {
            self.position = Some(match self.direction {
                Direction::Ascending => self.position.expect("positioned cursor") + 1,
                Direction::Descending => self.position.expect("positioned cursor") - 1,
            });
        }
        success
    }

    fn advance_ascend(&mut self) -> bool {
        {
            let top = self.stack.last_mut().expect("non-empty stack");
            top.idx += 1;
        }
        let top_has_children = !self.stack.last().unwrap().node.is_leaf();
        if top_has_children {
            let mut node = {
                let top = self.stack.last().unwrap();
                top.node.children[top.idx].clone()
            };
            loop {
                let is_leaf = node.is_leaf();
                let next = if !is_leaf {
                    Some(node.children[0].clone())
                } else {
                    None
                };
                self.stack.push(Frame { node, idx: 0 });
                if is_leaf {
                    break;
                }
                node = next.expect("internal node has a leftmost child");
            }
            return true;
        }
        loop {
            match self.stack.last() {
                None => return false,
                Some(top) if top.idx < top.node.items.len() => return true,
                Some(_) => {
                    self.stack.pop();
                }
            }
        }
    }

    fn advance_descend(&mut self) -> bool {
        let top_is_leaf = self.stack.last().unwrap().node.is_leaf();
        if !top_is_leaf {
            let mut node = {
                let top = self.stack.last().unwrap();
                top.node.children[top.idx].clone()
            };
            loop {
                if node.is_leaf() {
                    let idx = node.items.len() - 1;
                    self.stack.push(Frame { node, idx });
                    break;
                }
                let idx = node.children.len() - 1;
                let next = node.children[idx].clone();
                self.stack.push(Frame { node, idx });
                node = next;
            }
            return true;
        }
        {
            let top = self.stack.last_mut().expect("non-empty stack");
            if top.idx > 0 {
                top.idx -= 1;
                return true;
            }
        }
        self.stack.pop();
        loop {
            match self.stack.last_mut() {
                None => return false,
                Some(top) if top.idx == 0 => {
                    self.stack.pop();
                }
                Some(top) => {
                    top.idx -= 1;
                    return true;
                }
            }
        }
    }

    /// The key at the current position, or `None` before the first
    /// successful `next()` or after the last.
    pub fn key(&self) -> Option<&K> {
        self.stack.last().map(|f| &f.node.items[f.idx].key)
    }

    /// The value at the current position.
    pub fn value(&self) -> Option<&V> {
        self.stack.last().map(|f| &f.node.items[f.idx].value)
    }

    /// The 0-based rank of the current entry in sorted order.
    pub fn index(&self) -> Option<usize> {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::super::context::OwnerTag;
    use super::super::node::insert;
    use super::super::pool::NodePool;
    use super::*;

    fn build(n: usize) -> (Arc<Node<i32, i32>>, NodePool<i32, i32>) {
        let pool = NodePool::new();
        let ctx = OwnerTag::fresh();
        let mut root = Arc::new(Node::empty(ctx.clone()));
        for i in 0..n as i32 {
            if root.items.len() == 3 {
                root = super::super::node::split_root(root, &pool, &ctx);
            }
            insert(&mut root, &pool, &ctx, 3, i, i * 10);
        }
        (root, pool)
    }

    #[test]
    fn ascend_visits_everything_in_order() {
        let (root, _pool) = build(50);
        let mut c = Cursor::seek_before_min(&Some(root));
        let mut seen = Vec::new();
        while c.next() {
            seen.push(*c.key().unwrap());
        }
        let expected: Vec<i32> = (0..50).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn before_key_lands_on_successor() {
        let (root, _pool) = build(50);
        let mut c = Cursor::seek_before(&Some(root), &25);
        assert!(c.next());
        assert_eq!(c.key(), Some(&25));
        assert_eq!(c.index(), Some(25));
    }

    /// `build(7)` with max_items = 3 (D = 2) leaves keys `1` and `3` in the
    /// root itself rather than a leaf: root items = [1, 3], children =
    /// [{0}, {2}, {4,5,6}]. Seeking directly onto one of those keys must
    /// still report its true rank, counting the subtree immediately to its
    /// left (not just the children strictly before it).
    #[test]
    fn before_and_after_report_correct_rank_for_keys_stored_in_internal_nodes() {
        let (root, _pool) = build(7);

        let mut before = Cursor::seek_before(&Some(root.clone()), &3);
        assert!(before.next());
        assert_eq!(before.key(), Some(&3));
        assert_eq!(before.index(), Some(3));

        let mut before_mid = Cursor::seek_before(&Some(root.clone()), &1);
        assert!(before_mid.next());
        assert_eq!(before_mid.key(), Some(&1));
        assert_eq!(before_mid.index(), Some(1));

        let mut after = Cursor::seek_after(&Some(root), &3);
        assert!(after.next());
        assert_eq!(after.key(), Some(&3));
        assert_eq!(after.index(), Some(3));
    }

    #[test]
    fn after_key_descends_in_order() {
        let (root, _pool) = build(50);
        let mut c = Cursor::seek_after(&Some(root), &25);
        let mut seen = Vec::new();
        while c.next() {
            seen.push(*c.key().unwrap());
        }
        let expected: Vec<i32> = (0..=25).rev().collect();
        assert_eq!(seen, expected);
    }
}
