//! Node handles.
//!
//! Handles are 32-bit indices into the node arena of one tree.

use std::fmt;

/// A handle to a node in the arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
    /// The empty link.
    pub(crate) const NIL: Self = Self(u32::MAX);

    /// Creates a handle from an arena index.
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn new(index: usize) -> Self {
        debug_assert!(index < u32::MAX as usize, "tree arena capacity exceeded");
        Self(index as u32)
    }

    /// Returns the arena index of this handle.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) const fn is_nil(self) -> bool {
        self.0 == u32::MAX
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            write!(f, "Node(nil)")
        } else {
            write!(f, "Node({})", self.0)
        }
    }
}
