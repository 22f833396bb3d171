/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

mod erase;
mod insert;

use crate::arena::{NodeArena, NodeIndex};
use crate::error::{Result, TreeError};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{self, AtomicU64};

/// Creates a [`RedBlackTree`](tree/struct.RedBlackTree.html) containing the given keys:
///
/// ```
/// # use rbtree::*;
/// #
/// let mut t = RedBlackTree::new();
///
/// t.insert(1).unwrap();
/// t.insert(2).unwrap();
/// t.insert(3).unwrap();
///
/// assert_eq!(rbt![1, 2, 3], t);
/// ```
///
/// # Panics
///
/// Panics if node storage cannot be allocated.
#[macro_export]
macro_rules! rbt {
    ($($e:expr),* $(,)?) => {
        <$crate::RedBlackTree<_> as ::core::iter::FromIterator<_>>::from_iter([$($e),*])
    };
}

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(0);

/// Identifies the tree a [`NodeRef`] was handed out by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TreeId(u64);

impl TreeId {
    fn next() -> TreeId {
        TreeId(NEXT_TREE_ID.fetch_add(1, atomic::Ordering::Relaxed))
    }
}

/// Handle to a node of a [`RedBlackTree`].
///
/// Handles are returned by [`insert()`](RedBlackTree::insert),
/// [`find()`](RedBlackTree::find), [`min()`](RedBlackTree::min) and
/// [`max()`](RedBlackTree::max), and stay valid until the node they point at is
/// released.  Note that [`erase()`](RedBlackTree::erase) may release a node other
/// than the one it was given, so after any erase every handle must be considered
/// possibly stale.  A stale handle is detected: lookups return `None` and
/// `erase()` returns [`TreeError::InvalidReference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    tree: TreeId,
    index: NodeIndex,
}

impl Display for NodeRef {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            fmt,
            "node {}.{} of tree {}",
            self.index.position(),
            self.index.generation(),
            self.tree.0
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Debug, Clone)]
struct Node<K> {
    key: K,
    color: Color,
    parent: Option<NodeIndex>,
    left: Option<NodeIndex>,
    right: Option<NodeIndex>,
}

impl<K> Node<K> {
    fn new_red(key: K, parent: Option<NodeIndex>) -> Node<K> {
        Node { key, color: Color::Red, parent, left: None, right: None }
    }

    #[inline]
    fn child(&self, side: Side) -> Option<NodeIndex> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    fn child_mut(&mut self, side: Side) -> &mut Option<NodeIndex> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// A mutable ordered collection of keys.  This implementation uses a
/// [red-black tree](https://en.wikipedia.org/wiki/Red-Black_tree).
///
/// Keys equal to an existing key are accepted and kept: the tree behaves as an
/// ordered multiset.
///
/// # Complexity
///
/// Let *n* be the number of keys in the tree.
///
/// ## Temporal complexity
///
/// | Operation                  | Average   | Worst case  |
/// |:-------------------------- | ---------:| -----------:|
/// | `new()`                    |      Θ(1) |        Θ(1) |
/// | `insert()`                 | Θ(log(n)) |   Θ(log(n)) |
/// | `erase()`                  | Θ(log(n)) |   Θ(log(n)) |
/// | `find()`                   | Θ(log(n)) |   Θ(log(n)) |
/// | `min()` / `max()`          | Θ(log(n)) |   Θ(log(n)) |
/// | `len()`                    |      Θ(1) |        Θ(1) |
/// | `to_vec()`                 |      Θ(n) |        Θ(n) |
/// | `clear()`                  |      Θ(n) |        Θ(n) |
///
/// # Implementation details
///
/// Nodes live in a generational arena owned by the tree and link to each other
/// through arena indices, parent links included.  Balancing follows the classic
/// bottom-up scheme of "Introduction to Algorithms" (Cormen et al., chapter 13),
/// except that erasing a node with two children splices out its in-order
/// predecessor instead of its successor.
#[derive(Debug)]
pub struct RedBlackTree<K> {
    id: TreeId,
    nodes: NodeArena<Node<K>>,
    root: Option<NodeIndex>,
}

impl<K> RedBlackTree<K> {
    #[must_use]
    pub fn new() -> RedBlackTree<K> {
        RedBlackTree { id: TreeId::next(), nodes: NodeArena::new(), root: None }
    }

    /// Creates an empty tree with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Result<RedBlackTree<K>> {
        Ok(RedBlackTree {
            id: TreeId::next(),
            nodes: NodeArena::with_capacity(capacity)?,
            root: None,
        })
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nodes the tree can hold before its node storage grows.
    #[must_use]
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    #[must_use]
    pub fn root(&self) -> Option<NodeRef> {
        self.root.map(|r| self.node_ref(r))
    }

    /// Returns the key stored in `node`, or `None` if the handle is stale or
    /// belongs to another tree.
    #[must_use]
    pub fn get(&self, node: NodeRef) -> Option<&K> {
        self.resolve(node).map(|index| &self.nodes[index].key)
    }

    #[must_use]
    pub fn color(&self, node: NodeRef) -> Option<Color> {
        self.resolve(node).map(|index| self.nodes[index].color)
    }

    /// Returns the node holding the smallest key.
    #[must_use]
    pub fn min(&self) -> Option<NodeRef> {
        self.root.map(|r| self.node_ref(self.extreme(r, Side::Left)))
    }

    /// Returns the node holding the largest key.
    #[must_use]
    pub fn max(&self) -> Option<NodeRef> {
        self.root.map(|r| self.node_ref(self.extreme(r, Side::Right)))
    }

    #[must_use]
    pub fn first(&self) -> Option<&K> {
        self.min().and_then(|n| self.get(n))
    }

    #[must_use]
    pub fn last(&self) -> Option<&K> {
        self.max().and_then(|n| self.get(n))
    }

    /// Releases every node of the tree and returns how many were released.
    ///
    /// The tree is empty afterwards and can be reused.  Every handle previously
    /// obtained from it becomes stale.
    pub fn clear(&mut self) -> usize {
        let mut pending: Vec<NodeIndex> = self.root.take().into_iter().collect();
        let mut released = 0;

        while let Some(index) = pending.pop() {
            if let Some(node) = self.nodes.remove(index) {
                pending.extend(node.left);
                pending.extend(node.right);
                released += 1;
            }
        }

        debug_assert_eq!(self.nodes.len(), 0);
        tracing::debug!(released, "released tree nodes");

        released
    }

    /// Releases every node and then the tree itself.  Returns the number of
    /// nodes released.
    pub fn destroy(mut self) -> usize {
        self.clear()
    }

    #[inline]
    fn node_ref(&self, index: NodeIndex) -> NodeRef {
        NodeRef { tree: self.id, index }
    }

    fn resolve(&self, node: NodeRef) -> Option<NodeIndex> {
        (node.tree == self.id && self.nodes.contains(node.index)).then_some(node.index)
    }

    /// Absent children are NIL leaves, which are black.
    #[inline]
    fn is_black(&self, node: Option<NodeIndex>) -> bool {
        !self.is_red(node)
    }

    #[inline]
    fn is_red(&self, node: Option<NodeIndex>) -> bool {
        node.is_some_and(|n| self.nodes[n].color == Color::Red)
    }

    /// Which side of `parent` holds `child`.
    fn side_of(&self, child: NodeIndex, parent: NodeIndex) -> Side {
        if self.nodes[parent].left == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Walks from `from` towards `side` until there is no further child.
    fn extreme(&self, from: NodeIndex, side: Side) -> NodeIndex {
        let mut current = from;

        while let Some(next) = self.nodes[current].child(side) {
            current = next;
        }

        current
    }

    /// Makes `new` take `old`'s place under `parent`, or at the root if `parent`
    /// is `None`.  The parent link of `new` is left to the caller.
    fn replace_child(&mut self, parent: Option<NodeIndex>, old: NodeIndex, new: Option<NodeIndex>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let node = &mut self.nodes[p];

                if node.left == Some(old) {
                    node.left = new;
                } else {
                    node.right = new;
                }
            }
        }
    }

    /// Rotates the subtree rooted at `x` towards `side`.
    ///
    /// For `Side::Left` this is the classic left rotation: the right child `y`
    /// of `x` takes the place of `x`, `x` becomes the left child of `y` and the
    /// former left subtree of `y` becomes the right subtree of `x`.
    /// `Side::Right` is the mirror image.  Does nothing if `x` has no child to
    /// promote.  Colors are never changed.
    ///
    /// ```text
    ///        x                          y
    ///       ╱ ╲      rotate left       ╱ ╲
    ///      a   y     ───────────▶     x   c
    ///         ╱ ╲                    ╱ ╲
    ///        b   c                  a   b
    /// ```
    fn rotate(&mut self, x: NodeIndex, side: Side) {
        let Some(y) = self.nodes[x].child(side.opposite()) else {
            return;
        };

        let inner = self.nodes[y].child(side);

        *self.nodes[x].child_mut(side.opposite()) = inner;

        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(x);
        }

        let parent = self.nodes[x].parent;

        self.nodes[y].parent = parent;
        self.replace_child(parent, x, Some(y));

        *self.nodes[y].child_mut(side) = Some(x);
        self.nodes[x].parent = Some(y);

        tracing::trace!(pivot = x.position(), ?side, "rotated subtree");
    }

    /// Calls `visit` on every key in ascending order.
    fn for_each_in_order<'a>(&'a self, mut visit: impl FnMut(&'a K)) {
        let mut stack: Vec<NodeIndex> =
            Vec::with_capacity(height::conservative_height(self.len()) + 1);
        let mut current = self.root;

        loop {
            while let Some(index) = current {
                stack.push(index);
                current = self.nodes[index].left;
            }

            let Some(index) = stack.pop() else {
                break;
            };
            let node = &self.nodes[index];

            visit(&node.key);
            current = node.right;
        }
    }

    fn keys_in_order(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.len());

        self.for_each_in_order(|k| keys.push(k));

        keys
    }
}

impl<K> RedBlackTree<K>
where
    K: Ord,
{
    /// Returns a node holding `key`, or `None` if there is none.  With duplicate
    /// keys any of the equal nodes may be returned.
    #[must_use]
    pub fn find<Q: ?Sized>(&self, key: &Q) -> Option<NodeRef>
    where
        K: Borrow<Q>,
        Q: Ord,
    {
        let mut current = self.root;

        while let Some(index) = current {
            let node = &self.nodes[index];

            match key.cmp(node.key.borrow()) {
                Ordering::Less => current = node.left,
                Ordering::Equal => return Some(self.node_ref(index)),
                Ordering::Greater => current = node.right,
            }
        }

        None
    }

    #[must_use]
    pub fn contains<Q: ?Sized>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord,
    {
        self.find(key).is_some()
    }

    /// Removes one occurrence of `key` and returns it.
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: Ord,
    {
        let node = self.find(key)?;

        self.erase(node).ok()
    }
}

impl<K> RedBlackTree<K>
where
    K: Clone,
{
    /// Writes every key in ascending order to the front of `dest` and returns
    /// the number of keys written.
    ///
    /// Fails with [`TreeError::BufferTooSmall`] without writing anything if
    /// `dest` is shorter than [`len()`](RedBlackTree::len).
    pub fn to_ordered_sequence(&self, dest: &mut [K]) -> Result<usize> {
        let required = self.len();

        if dest.len() < required {
            return Err(TreeError::BufferTooSmall { required, capacity: dest.len() });
        }

        let mut written = 0;

        self.for_each_in_order(|key| {
            dest[written].clone_from(key);
            written += 1;
        });

        Ok(written)
    }

    /// Returns every key in ascending order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.len());

        self.for_each_in_order(|key| keys.push(key.clone()));

        keys
    }
}

mod height {
    pub fn lg_floor(size: usize) -> usize {
        debug_assert!(size > 0);

        (usize::BITS - size.leading_zeros()) as usize - 1
    }

    /// Upper bound of the height of a red-black tree with `size` nodes.
    pub fn conservative_height(size: usize) -> usize {
        if size > 0 {
            2 * lg_floor(size + 1)
        } else {
            0
        }
    }
}

impl<K> Clone for RedBlackTree<K>
where
    K: Clone,
{
    /// The clone is a distinct tree: handles of `self` are not valid for it.
    fn clone(&self) -> RedBlackTree<K> {
        RedBlackTree { id: TreeId::next(), nodes: self.nodes.clone(), root: self.root }
    }
}

impl<K> Default for RedBlackTree<K> {
    fn default() -> RedBlackTree<K> {
        RedBlackTree::new()
    }
}

impl<K: PartialEq> PartialEq for RedBlackTree<K> {
    fn eq(&self, other: &RedBlackTree<K>) -> bool {
        self.len() == other.len() && self.keys_in_order() == other.keys_in_order()
    }
}

impl<K: Eq> Eq for RedBlackTree<K> {}

impl<K: Hash> Hash for RedBlackTree<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Add the hash of length so that if two collections are added one after the other it
        // doesn't hash to the same thing as a single collection with the same elements in the same
        // order.
        self.len().hash(state);

        self.for_each_in_order(|k| k.hash(state));
    }
}

impl<K> Display for RedBlackTree<K>
where
    K: Display,
{
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;

        fmt.write_str("{")?;

        for k in self.keys_in_order() {
            if !first {
                fmt.write_str(", ")?;
            }
            k.fmt(fmt)?;
            first = false;
        }

        fmt.write_str("}")
    }
}

impl<K: Ord> Extend<K> for RedBlackTree<K> {
    /// # Panics
    ///
    /// Panics if node storage cannot be allocated.
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            if let Err(error) = self.insert(key) {
                panic!("cannot extend red-black tree: {error}");
            }
        }
    }
}

impl<K: Ord> FromIterator<K> for RedBlackTree<K> {
    /// # Panics
    ///
    /// Panics if node storage cannot be allocated.
    fn from_iter<I: IntoIterator<Item = K>>(into_iter: I) -> RedBlackTree<K> {
        let mut tree = RedBlackTree::new();

        tree.extend(into_iter);

        tree
    }
}

#[cfg(feature = "serde")]
pub mod serde {
    use super::*;
    use ::serde::de::{Deserialize, Deserializer, Error, SeqAccess, Visitor};
    use ::serde::ser::{Serialize, Serializer};
    use std::fmt;
    use std::marker::PhantomData;

    /// Serializes as the flat ascending sequence of keys.
    impl<K> Serialize for RedBlackTree<K>
    where
        K: Serialize,
    {
        fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
            serializer.collect_seq(self.keys_in_order())
        }
    }

    impl<'de, K> Deserialize<'de> for RedBlackTree<K>
    where
        K: Ord + Deserialize<'de>,
    {
        fn deserialize<D: Deserializer<'de>>(
            deserializer: D,
        ) -> std::result::Result<RedBlackTree<K>, D::Error> {
            deserializer.deserialize_seq(RedBlackTreeVisitor { phantom: PhantomData })
        }
    }

    struct RedBlackTreeVisitor<K> {
        phantom: PhantomData<K>,
    }

    impl<'de, K> Visitor<'de> for RedBlackTreeVisitor<K>
    where
        K: Ord + Deserialize<'de>,
    {
        type Value = RedBlackTree<K>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a sequence")
        }

        fn visit_seq<A>(self, mut seq: A) -> std::result::Result<RedBlackTree<K>, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut tree = RedBlackTree::new();

            while let Some(key) = seq.next_element()? {
                tree.insert(key).map_err(<A::Error as Error>::custom)?;
            }

            Ok(tree)
        }
    }
}
