/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use super::{Color, NodeRef, RedBlackTree, Side};
use crate::arena::NodeIndex;
use crate::error::{Result, TreeError};

impl<K> RedBlackTree<K> {
    /// Removes the key held by `node` from the tree and returns it.
    ///
    /// If `node` has two children the node physically released is its in-order
    /// predecessor: `node` keeps its identity and takes over the predecessor's
    /// key.  Any handle, including one to a node other than `node`, may
    /// therefore be stale after this call.
    ///
    /// Fails with [`TreeError::InvalidReference`], leaving the tree untouched, if
    /// `node` is stale or was handed out by another tree.
    pub fn erase(&mut self, node: NodeRef) -> Result<K> {
        let z = self.resolve(node).ok_or(TreeError::InvalidReference)?;

        let y = match (self.nodes[z].left, self.nodes[z].right) {
            (Some(left), Some(_)) => self.extreme(left, Side::Right),
            _ => z,
        };

        let x = self.nodes[y].left.or(self.nodes[y].right);
        let parent = self.nodes[y].parent;

        if let Some(x) = x {
            self.nodes[x].parent = parent;
        }
        self.replace_child(parent, y, x);

        let Some(spliced) = self.nodes.remove(y) else {
            unreachable!("spliced node is not in the arena");
        };

        let removed = if y == z {
            spliced.key
        } else {
            std::mem::replace(&mut self.nodes[z].key, spliced.key)
        };

        if spliced.color == Color::Black {
            self.erase_fixup(x, parent);
        }

        Ok(removed)
    }

    /// Restores the black height after a black node was spliced out above `x`.
    ///
    /// `x` carries an extra black.  It may be absent, in which case it is the NIL
    /// leaf below `parent` that took the spliced node's place.  Each iteration
    /// either moves the extra black one level up by recoloring the sibling, or
    /// absorbs it with at most three rotations.
    fn erase_fixup(&mut self, mut x: Option<NodeIndex>, mut parent: Option<NodeIndex>) {
        while x != self.root && self.is_black(x) {
            let Some(p) = parent else {
                break;
            };

            let side = if self.nodes[p].left == x { Side::Left } else { Side::Right };

            // The path through `x` is one black short, so its sibling is a real node.
            let Some(mut w) = self.nodes[p].child(side.opposite()) else {
                break;
            };

            if self.nodes[w].color == Color::Red {
                tracing::trace!(parent = p.position(), "erase fix-up: red sibling");

                self.nodes[w].color = Color::Black;
                self.nodes[p].color = Color::Red;
                self.rotate(p, side);

                match self.nodes[p].child(side.opposite()) {
                    Some(sibling) => w = sibling,
                    None => break,
                }
            }

            let near = self.nodes[w].child(side);
            let far = self.nodes[w].child(side.opposite());

            if self.is_black(near) && self.is_black(far) {
                tracing::trace!(parent = p.position(), "erase fix-up: black nephews");

                self.nodes[w].color = Color::Red;

                x = Some(p);
                parent = self.nodes[p].parent;
                continue;
            }

            if self.is_black(far) {
                tracing::trace!(parent = p.position(), "erase fix-up: red near nephew");

                if let Some(near) = near {
                    self.nodes[near].color = Color::Black;
                }
                self.nodes[w].color = Color::Red;
                self.rotate(w, side.opposite());

                match self.nodes[p].child(side.opposite()) {
                    Some(sibling) => w = sibling,
                    None => break,
                }
            }

            tracing::trace!(parent = p.position(), "erase fix-up: red far nephew");

            let parent_color = self.nodes[p].color;

            self.nodes[w].color = parent_color;
            self.nodes[p].color = Color::Black;
            if let Some(far) = self.nodes[w].child(side.opposite()) {
                self.nodes[far].color = Color::Black;
            }
            self.rotate(p, side);

            x = self.root;
        }

        if let Some(x) = x {
            self.nodes[x].color = Color::Black;
        }
    }
}
