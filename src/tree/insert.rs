/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use super::{Color, Node, NodeRef, RedBlackTree, Side};
use crate::arena::NodeIndex;
use crate::error::Result;

impl<K> RedBlackTree<K>
where
    K: Ord,
{
    /// Inserts `key` and returns a handle to its node.
    ///
    /// Keys equal to one already present are inserted as well, to the right of
    /// the existing ones.  The only failure is running out of node storage, in
    /// which case the tree is left untouched.
    pub fn insert(&mut self, key: K) -> Result<NodeRef> {
        let mut parent: Option<NodeIndex> = None;
        let mut side = Side::Left;
        let mut current = self.root;

        while let Some(index) = current {
            let node = &self.nodes[index];

            side = if key < node.key { Side::Left } else { Side::Right };
            parent = Some(index);
            current = node.child(side);
        }

        let z = self.nodes.insert(Node::new_red(key, parent))?;

        match parent {
            Some(p) => *self.nodes[p].child_mut(side) = Some(z),
            None => self.root = Some(z),
        }

        self.insert_fixup(z);

        Ok(self.node_ref(z))
    }

    /// Restores the red-black invariants after `z` was attached as a red leaf.
    ///
    /// The only possible violation is `z` and its parent both being red.  Each
    /// iteration either resolves it with at most two rotations or pushes it two
    /// levels up by recoloring.
    fn insert_fixup(&mut self, mut z: NodeIndex) {
        while let Some(mut parent) = self.nodes[z].parent {
            if self.nodes[parent].color == Color::Black {
                break;
            }

            // The root is black on entry, so a red parent always has a parent.
            let Some(grandparent) = self.nodes[parent].parent else {
                break;
            };

            let side = self.side_of(parent, grandparent);
            let uncle = self.nodes[grandparent].child(side.opposite());

            if let Some(uncle) = uncle.filter(|&u| self.nodes[u].color == Color::Red) {
                tracing::trace!(node = z.position(), "insert fix-up: red uncle");

                self.nodes[parent].color = Color::Black;
                self.nodes[uncle].color = Color::Black;
                self.nodes[grandparent].color = Color::Red;

                z = grandparent;
                continue;
            }

            if self.nodes[parent].child(side.opposite()) == Some(z) {
                tracing::trace!(node = z.position(), "insert fix-up: inner child");

                self.rotate(parent, side);
                std::mem::swap(&mut z, &mut parent);
            }

            tracing::trace!(node = z.position(), "insert fix-up: outer child");

            self.nodes[parent].color = Color::Black;
            self.nodes[grandparent].color = Color::Red;
            self.rotate(grandparent, side.opposite());

            break;
        }

        if let Some(root) = self.root {
            self.nodes[root].color = Color::Black;
        }
    }
}
