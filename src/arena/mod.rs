/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Arena storage for tree nodes.
//!
//! Nodes are addressed by [`NodeIndex`], a slot position paired with the
//! generation the node was stored under.  An index that outlives its node no
//! longer resolves, even after the slot is reused.

use crate::error::Result;
use generational_arena::{Arena, Index};
use std::ops::{Index as IndexOp, IndexMut};

/// Index into a [`NodeArena`].
///
/// Wraps a [`generational_arena::Index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub(crate) struct NodeIndex(Index);

impl NodeIndex {
    #[inline]
    pub(crate) fn position(self) -> usize {
        self.0.into_raw_parts().0
    }

    #[inline]
    pub(crate) fn generation(self) -> u64 {
        self.0.into_raw_parts().1
    }
}

/// Newtype over [`Arena`] whose growth reports allocation failure instead of
/// aborting.
#[derive(Debug, Clone)]
pub(crate) struct NodeArena<T> {
    nodes: Arena<T>,
}

impl<T> NodeArena<T> {
    pub(crate) fn new() -> NodeArena<T> {
        NodeArena { nodes: Arena::new() }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Result<NodeArena<T>> {
        Self::check_allocation(capacity)?;

        Ok(NodeArena { nodes: Arena::with_capacity(capacity) })
    }

    /// Number of stored values.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Number of values that can be stored before the arena grows.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Stores `value` and returns its index.  When every slot is taken the
    /// arena doubles first.
    ///
    /// Fails without touching the arena if it cannot grow.
    pub(crate) fn insert(&mut self, value: T) -> Result<NodeIndex> {
        let value = match self.nodes.try_insert(value) {
            Ok(index) => return Ok(NodeIndex(index)),
            Err(value) => value,
        };

        let additional = self.nodes.capacity().max(1);

        Self::check_allocation(self.nodes.capacity().saturating_add(additional))?;
        self.nodes.reserve(additional);

        Ok(NodeIndex(self.nodes.insert(value)))
    }

    /// `Arena` aborts when it cannot grow, so the allocation is tried on a
    /// scratch vector first.  Its elements are at least as large as an arena
    /// entry.
    fn check_allocation(slots: usize) -> Result<()> {
        let mut scratch: Vec<(u64, Option<usize>, T)> = Vec::new();

        scratch.try_reserve_exact(slots)?;

        Ok(())
    }

    pub(crate) fn remove(&mut self, index: NodeIndex) -> Option<T> {
        self.nodes.remove(index.0)
    }

    #[inline]
    pub(crate) fn contains(&self, index: NodeIndex) -> bool {
        self.nodes.contains(index.0)
    }

    #[inline]
    pub(crate) fn get(&self, index: NodeIndex) -> Option<&T> {
        self.nodes.get(index.0)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, index: NodeIndex) -> Option<&mut T> {
        self.nodes.get_mut(index.0)
    }
}

// Tree links always point at live nodes, so these panic on a stale index.
impl<T> IndexOp<NodeIndex> for NodeArena<T> {
    type Output = T;

    fn index(&self, index: NodeIndex) -> &T {
        self.get(index).expect("stale node index")
    }
}

impl<T> IndexMut<NodeIndex> for NodeArena<T> {
    fn index_mut(&mut self, index: NodeIndex) -> &mut T {
        self.get_mut(index).expect("stale node index")
    }
}
