//! The AVL tree proper.
//!
//! Nodes are kept in a dense `Vec` and linked by [`NodeId`] handles. All
//! structural recursion is bounded by the tree height, which is at most
//! `1.44 * log2(n + 2)`.

use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

use crate::handle::NodeId;
use crate::iter::{IntoIter, Iter, RangeFrom};

/// One node of the arena.
#[derive(Clone)]
pub(crate) struct Node<V> {
    pub(crate) key: usize,
    pub(crate) value: V,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    pub(crate) height: u8,
}

impl<V> Node<V> {
    fn leaf(key: usize, value: V) -> Self {
        Self {
            key,
            value,
            left: NodeId::NIL,
            right: NodeId::NIL,
            height: 1,
        }
    }
}

/// A structural defect found by [`AvlTree::check`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeDefect {
    /// A key is out of order with respect to its ancestors.
    #[error("key {key} violates the search order")]
    Ordering {
        /// The misplaced key.
        key: usize,
    },
    /// A cached height disagrees with the subtree.
    #[error("node {key} stores height {stored}, subtree has height {actual}")]
    Height {
        /// Key of the node.
        key: usize,
        /// Height cached in the node.
        stored: u8,
        /// Height computed from the children.
        actual: u8,
    },
    /// A node is out of AVL balance.
    #[error("node {key} has balance factor {factor}")]
    Balance {
        /// Key of the node.
        key: usize,
        /// Left height minus right height.
        factor: i32,
    },
    /// Some arena nodes are not reachable from the root.
    #[error("{reachable} nodes reachable from the root, {stored} stored")]
    Count {
        /// Nodes found by walking the tree.
        reachable: usize,
        /// Length of the arena.
        stored: usize,
    },
}

/// An ordered map from `usize` keys to values, balanced as an AVL tree.
///
/// Iteration is always in strictly ascending key order.
///
/// # Example
///
/// ```
/// use tessera_avl::AvlTree;
///
/// let mut tree = AvlTree::new();
/// tree.insert(7, "seven");
/// tree.insert(2, "two");
/// assert_eq!(tree.first(), Some((2, &"two")));
/// assert_eq!(tree.remove(7), Some("seven"));
/// assert_eq!(tree.len(), 1);
/// ```
#[derive(Clone)]
pub struct AvlTree<V> {
    pub(crate) nodes: Vec<Node<V>>,
    pub(crate) root: NodeId,
}

impl<V> Default for AvlTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> AvlTree<V> {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: NodeId::NIL,
        }
    }

    /// Creates an empty tree with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root: NodeId::NIL,
        }
    }

    /// Builds a balanced tree from entries with strictly increasing keys.
    ///
    /// Runs in linear time.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the keys are not strictly increasing.
    #[must_use]
    pub fn from_sorted(entries: Vec<(usize, V)>) -> Self {
        debug_assert!(
            entries.windows(2).all(|w| w[0].0 < w[1].0),
            "from_sorted requires strictly increasing keys"
        );
        let mut tree = Self {
            nodes: entries
                .into_iter()
                .map(|(key, value)| Node::leaf(key, value))
                .collect(),
            root: NodeId::NIL,
        };
        tree.root = tree.link_range(0, tree.nodes.len());
        tree
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = NodeId::NIL;
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: usize) -> Option<&V> {
        let id = self.find(key);
        (!id.is_nil()).then(|| &self.nodes[id.index()].value)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: usize) -> Option<&mut V> {
        let id = self.find(key);
        if id.is_nil() {
            None
        } else {
            Some(&mut self.nodes[id.index()].value)
        }
    }

    /// Returns true if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: usize) -> bool {
        !self.find(key).is_nil()
    }

    /// Inserts `value` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: usize, value: V) -> Option<V> {
        let (root, old) = self.insert_at(self.root, key, value);
        self.root = root;
        old
    }

    /// Appends an entry whose key is larger than every stored key.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `key` does not exceed the current last key.
    pub fn push_back(&mut self, key: usize, value: V) {
        debug_assert!(
            self.last().map_or(true, |(last, _)| last < key),
            "push_back key {key} is not beyond the last key"
        );
        self.insert(key, value);
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: usize) -> Option<V> {
        let (root, removed) = self.remove_at(self.root, key);
        self.root = root;
        removed.map(|id| self.release(id))
    }

    /// Returns the entry with the smallest key.
    #[must_use]
    pub fn first(&self) -> Option<(usize, &V)> {
        let mut id = self.root;
        if id.is_nil() {
            return None;
        }
        while !self.nodes[id.index()].left.is_nil() {
            id = self.nodes[id.index()].left;
        }
        let node = &self.nodes[id.index()];
        Some((node.key, &node.value))
    }

    /// Returns the entry with the largest key.
    #[must_use]
    pub fn last(&self) -> Option<(usize, &V)> {
        let mut id = self.root;
        if id.is_nil() {
            return None;
        }
        while !self.nodes[id.index()].right.is_nil() {
            id = self.nodes[id.index()].right;
        }
        let node = &self.nodes[id.index()];
        Some((node.key, &node.value))
    }

    /// Removes and returns the entry with the smallest key.
    pub fn pop_first(&mut self) -> Option<(usize, V)> {
        let key = self.first()?.0;
        self.remove(key).map(|value| (key, value))
    }

    /// Removes and returns the entry with the largest key.
    pub fn pop_last(&mut self) -> Option<(usize, V)> {
        let key = self.last()?.0;
        self.remove(key).map(|value| (key, value))
    }

    /// Removes every entry with key `>= bound`, starting from the high end.
    pub fn truncate(&mut self, bound: usize) {
        while let Some((key, _)) = self.last() {
            if key < bound {
                break;
            }
            self.pop_last();
        }
    }

    /// Keeps only the entries for which `keep` returns true.
    ///
    /// `keep` sees the entries in ascending key order and may modify the
    /// values it keeps.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(usize, &mut V) -> bool,
    {
        let mut doomed = Vec::new();
        for id in self.inorder_ids() {
            let node = &mut self.nodes[id.index()];
            if !keep(node.key, &mut node.value) {
                doomed.push(node.key);
            }
        }
        for key in doomed {
            self.remove(key);
        }
    }

    /// Rewrites every key through `relabel` without restructuring the tree.
    ///
    /// `relabel` must be strictly increasing on the stored keys.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the relabeled keys are out of order.
    pub fn relabel_keys<F>(&mut self, mut relabel: F)
    where
        F: FnMut(usize) -> usize,
    {
        for node in &mut self.nodes {
            node.key = relabel(node.key);
        }
        debug_assert!(
            self.keys().zip(self.keys().skip(1)).all(|(a, b)| a < b),
            "relabel_keys must preserve the key order"
        );
    }

    /// Returns an iterator over the entries in ascending key order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self)
    }

    /// Returns an iterator over the entries with key `>= key`.
    ///
    /// The first item is the entry at `key` if present, otherwise the entry
    /// at its insertion point.
    #[must_use]
    pub fn range_from(&self, key: usize) -> RangeFrom<'_, V> {
        RangeFrom::new(self, key)
    }

    /// Returns the keys in ascending order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = usize> + ExactSizeIterator + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Returns the values in ascending key order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Returns mutable references to all values in storage order.
    ///
    /// Storage order is unrelated to key order.
    pub fn values_mut(&mut self) -> impl ExactSizeIterator<Item = &mut V> + '_ {
        self.nodes.iter_mut().map(|node| &mut node.value)
    }

    /// Verifies ordering, cached heights, balance and the node count.
    ///
    /// # Errors
    ///
    /// Returns the first defect found.
    pub fn check(&self) -> Result<(), TreeDefect> {
        let mut reachable = 0;
        self.check_at(self.root, None, None, &mut reachable)?;
        if reachable == self.nodes.len() {
            Ok(())
        } else {
            Err(TreeDefect::Count {
                reachable,
                stored: self.nodes.len(),
            })
        }
    }

    fn find(&self, key: usize) -> NodeId {
        let mut id = self.root;
        while !id.is_nil() {
            let node = &self.nodes[id.index()];
            id = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return id,
            };
        }
        NodeId::NIL
    }

    pub(crate) fn inorder_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        let mut id = self.root;
        loop {
            while !id.is_nil() {
                stack.push(id);
                id = self.nodes[id.index()].left;
            }
            match stack.pop() {
                Some(top) => {
                    out.push(top);
                    id = self.nodes[top.index()].right;
                }
                None => break,
            }
        }
        out
    }

    fn height(&self, id: NodeId) -> u8 {
        if id.is_nil() {
            0
        } else {
            self.nodes[id.index()].height
        }
    }

    fn balance_factor(&self, id: NodeId) -> i32 {
        let node = &self.nodes[id.index()];
        i32::from(self.height(node.left)) - i32::from(self.height(node.right))
    }

    fn update_height(&mut self, id: NodeId) {
        let node = &self.nodes[id.index()];
        let height = 1 + self.height(node.left).max(self.height(node.right));
        self.nodes[id.index()].height = height;
    }

    fn rotate_right(&mut self, y: NodeId) -> NodeId {
        let x = self.nodes[y.index()].left;
        self.nodes[y.index()].left = self.nodes[x.index()].right;
        self.nodes[x.index()].right = y;
        self.update_height(y);
        self.update_height(x);
        x
    }

    fn rotate_left(&mut self, x: NodeId) -> NodeId {
        let y = self.nodes[x.index()].right;
        self.nodes[x.index()].right = self.nodes[y.index()].left;
        self.nodes[y.index()].left = x;
        self.update_height(x);
        self.update_height(y);
        y
    }

    fn rebalance(&mut self, id: NodeId) -> NodeId {
        self.update_height(id);
        let factor = self.balance_factor(id);
        if factor > 1 {
            let left = self.nodes[id.index()].left;
            if self.balance_factor(left) < 0 {
                self.nodes[id.index()].left = self.rotate_left(left);
            }
            return self.rotate_right(id);
        }
        if factor < -1 {
            let right = self.nodes[id.index()].right;
            if self.balance_factor(right) > 0 {
                self.nodes[id.index()].right = self.rotate_right(right);
            }
            return self.rotate_left(id);
        }
        id
    }

    fn insert_at(&mut self, id: NodeId, key: usize, value: V) -> (NodeId, Option<V>) {
        if id.is_nil() {
            let new = NodeId::new(self.nodes.len());
            self.nodes.push(Node::leaf(key, value));
            return (new, None);
        }
        let node = &self.nodes[id.index()];
        let (left, right) = (node.left, node.right);
        match key.cmp(&node.key) {
            Ordering::Less => {
                let (left, old) = self.insert_at(left, key, value);
                self.nodes[id.index()].left = left;
                if old.is_some() {
                    return (id, old);
                }
            }
            Ordering::Greater => {
                let (right, old) = self.insert_at(right, key, value);
                self.nodes[id.index()].right = right;
                if old.is_some() {
                    return (id, old);
                }
            }
            Ordering::Equal => {
                let old = std::mem::replace(&mut self.nodes[id.index()].value, value);
                return (id, Some(old));
            }
        }
        (self.rebalance(id), None)
    }

    /// Unlinks `key` from the subtree at `id`. The unlinked node stays in the
    /// arena and is returned alongside the new subtree root.
    fn remove_at(&mut self, id: NodeId, key: usize) -> (NodeId, Option<NodeId>) {
        if id.is_nil() {
            return (id, None);
        }
        let node = &self.nodes[id.index()];
        let (left, right) = (node.left, node.right);
        match key.cmp(&node.key) {
            Ordering::Less => {
                let (new_left, removed) = self.remove_at(left, key);
                if removed.is_none() {
                    return (id, None);
                }
                self.nodes[id.index()].left = new_left;
                (self.rebalance(id), removed)
            }
            Ordering::Greater => {
                let (new_right, removed) = self.remove_at(right, key);
                if removed.is_none() {
                    return (id, None);
                }
                self.nodes[id.index()].right = new_right;
                (self.rebalance(id), removed)
            }
            Ordering::Equal => {
                if left.is_nil() {
                    return (right, Some(id));
                }
                if right.is_nil() {
                    return (left, Some(id));
                }
                let (new_right, successor) = self.detach_min(right);
                let succ = &mut self.nodes[successor.index()];
                succ.left = left;
                succ.right = new_right;
                (self.rebalance(successor), Some(id))
            }
        }
    }

    fn detach_min(&mut self, id: NodeId) -> (NodeId, NodeId) {
        let left = self.nodes[id.index()].left;
        if left.is_nil() {
            return (self.nodes[id.index()].right, id);
        }
        let (new_left, min) = self.detach_min(left);
        self.nodes[id.index()].left = new_left;
        (self.rebalance(id), min)
    }

    /// Frees an unlinked node by moving the last arena node into its slot.
    fn release(&mut self, id: NodeId) -> V {
        let last = NodeId::new(self.nodes.len() - 1);
        if id != last {
            let key = self.nodes[last.index()].key;
            self.redirect(key, last, id);
        }
        self.nodes.swap_remove(id.index()).value
    }

    /// Repoints the link that leads to the node `from` (holding `key`) at `to`.
    fn redirect(&mut self, key: usize, from: NodeId, to: NodeId) {
        if self.root == from {
            self.root = to;
            return;
        }
        let mut id = self.root;
        loop {
            debug_assert!(!id.is_nil(), "key {key} not reachable from the root");
            let node = &mut self.nodes[id.index()];
            let link = if key < node.key {
                &mut node.left
            } else {
                &mut node.right
            };
            if *link == from {
                *link = to;
                return;
            }
            id = *link;
        }
    }

    fn link_range(&mut self, lo: usize, hi: usize) -> NodeId {
        if lo >= hi {
            return NodeId::NIL;
        }
        let mid = lo + (hi - lo) / 2;
        let left = self.link_range(lo, mid);
        let right = self.link_range(mid + 1, hi);
        let id = NodeId::new(mid);
        let node = &mut self.nodes[mid];
        node.left = left;
        node.right = right;
        self.update_height(id);
        id
    }

    fn check_at(
        &self,
        id: NodeId,
        lower: Option<usize>,
        upper: Option<usize>,
        count: &mut usize,
    ) -> Result<u8, TreeDefect> {
        if id.is_nil() {
            return Ok(0);
        }
        *count += 1;
        let node = &self.nodes[id.index()];
        let key = node.key;
        if lower.is_some_and(|lo| key <= lo) || upper.is_some_and(|hi| key >= hi) {
            return Err(TreeDefect::Ordering { key });
        }
        let lh = self.check_at(node.left, lower, Some(key), count)?;
        let rh = self.check_at(node.right, Some(key), upper, count)?;
        let actual = 1 + lh.max(rh);
        if node.height != actual {
            return Err(TreeDefect::Height {
                key,
                stored: node.height,
                actual,
            });
        }
        let factor = i32::from(lh) - i32::from(rh);
        if factor.abs() > 1 {
            return Err(TreeDefect::Balance { key, factor });
        }
        Ok(actual)
    }
}

impl<V: fmt::Debug> fmt::Debug for AvlTree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V: PartialEq> PartialEq for AvlTree<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<V: Eq> Eq for AvlTree<V> {}

/// Later values win on duplicate keys.
impl<V> FromIterator<(usize, V)> for AvlTree<V> {
    fn from_iter<I: IntoIterator<Item = (usize, V)>>(iter: I) -> Self {
        let entries: Vec<_> = iter.into_iter().collect();
        if entries.windows(2).all(|w| w[0].0 < w[1].0) {
            return Self::from_sorted(entries);
        }
        let mut tree = Self::with_capacity(entries.len());
        tree.extend(entries);
        tree
    }
}

impl<V> Extend<(usize, V)> for AvlTree<V> {
    fn extend<I: IntoIterator<Item = (usize, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<V> IntoIterator for AvlTree<V> {
    type Item = (usize, V);
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> IntoIter<V> {
        IntoIter::new(self.nodes)
    }
}

impl<'a, V> IntoIterator for &'a AvlTree<V> {
    type Item = (usize, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}
