//! Iterators over [`AvlTree`].
//!
//! Borrowing iterators walk the tree with explicit stacks of ancestors; the
//! stacks live inline for trees of height up to 32.

use std::iter::FusedIterator;

use smallvec::SmallVec;

use crate::handle::NodeId;
use crate::tree::{AvlTree, Node};

type Stack = SmallVec<[NodeId; 32]>;

/// Ascending, double-ended iterator over the entries of a tree.
pub struct Iter<'a, V> {
    nodes: &'a [Node<V>],
    front: Stack,
    back: Stack,
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(tree: &'a AvlTree<V>) -> Self {
        let mut iter = Self {
            nodes: &tree.nodes,
            front: Stack::new(),
            back: Stack::new(),
            remaining: tree.nodes.len(),
        };
        iter.push_left_spine(tree.root);
        iter.push_right_spine(tree.root);
        iter
    }

    fn push_left_spine(&mut self, mut id: NodeId) {
        while !id.is_nil() {
            self.front.push(id);
            id = self.nodes[id.index()].left;
        }
    }

    fn push_right_spine(&mut self, mut id: NodeId) {
        while !id.is_nil() {
            self.back.push(id);
            id = self.nodes[id.index()].right;
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (usize, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front.pop()?;
        self.remaining -= 1;
        let node = &self.nodes[id.index()];
        self.push_left_spine(node.right);
        Some((node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for Iter<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back.pop()?;
        self.remaining -= 1;
        let node = &self.nodes[id.index()];
        self.push_right_spine(node.left);
        Some((node.key, &node.value))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

/// Ascending iterator starting at the first key not below a bound.
pub struct RangeFrom<'a, V> {
    nodes: &'a [Node<V>],
    stack: Stack,
}

impl<'a, V> RangeFrom<'a, V> {
    pub(crate) fn new(tree: &'a AvlTree<V>, key: usize) -> Self {
        let mut stack = Stack::new();
        let mut id = tree.root;
        while !id.is_nil() {
            let node = &tree.nodes[id.index()];
            if node.key >= key {
                stack.push(id);
                id = node.left;
            } else {
                id = node.right;
            }
        }
        Self {
            nodes: &tree.nodes,
            stack,
        }
    }
}

impl<'a, V> Iterator for RangeFrom<'a, V> {
    type Item = (usize, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = &self.nodes[id.index()];
        let mut child = node.right;
        while !child.is_nil() {
            self.stack.push(child);
            child = self.nodes[child.index()].left;
        }
        Some((node.key, &node.value))
    }
}

impl<V> FusedIterator for RangeFrom<'_, V> {}

/// Owning iterator over the entries of a tree, in ascending key order.
pub struct IntoIter<V> {
    inner: std::vec::IntoIter<Node<V>>,
}

impl<V> IntoIter<V> {
    pub(crate) fn new(mut nodes: Vec<Node<V>>) -> Self {
        nodes.sort_unstable_by_key(|node| node.key);
        Self {
            inner: nodes.into_iter(),
        }
    }
}

impl<V> Iterator for IntoIter<V> {
    type Item = (usize, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|node| (node.key, node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> DoubleEndedIterator for IntoIter<V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|node| (node.key, node.value))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> FusedIterator for IntoIter<V> {}

#[cfg(test)]
mod tests {
    use crate::AvlTree;

    fn sample() -> AvlTree<i32> {
        [(10, 1), (20, 2), (30, 3), (40, 4), (50, 5)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_double_ended_meets_in_middle() {
        let tree = sample();
        let mut iter = tree.iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next(), Some((10, &1)));
        assert_eq!(iter.next_back(), Some((50, &5)));
        assert_eq!(iter.next(), Some((20, &2)));
        assert_eq!(iter.next_back(), Some((40, &4)));
        assert_eq!(iter.next(), Some((30, &3)));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn test_reverse() {
        let tree = sample();
        let keys: Vec<_> = tree.iter().rev().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![50, 40, 30, 20, 10]);
    }

    #[test]
    fn test_range_from_insertion_point() {
        let tree = sample();
        let from_exact: Vec<_> = tree.range_from(30).map(|(k, _)| k).collect();
        assert_eq!(from_exact, vec![30, 40, 50]);
        let from_gap: Vec<_> = tree.range_from(31).map(|(k, _)| k).collect();
        assert_eq!(from_gap, vec![40, 50]);
        assert_eq!(tree.range_from(51).next(), None);
        assert_eq!(tree.range_from(0).count(), 5);
    }

    #[test]
    fn test_empty_tree() {
        let tree: AvlTree<()> = AvlTree::new();
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.range_from(0).next(), None);
    }
}
