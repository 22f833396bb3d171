/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

#![cfg_attr(feature = "fatal-warnings", deny(warnings))]

// Note: Keep this in sync with `README.md`.  Note that the doc links must be removed.
//! # rbtree
//!
//! A mutable [red-black tree](https://en.wikipedia.org/wiki/Red-Black_tree) of ordered keys
//! with logarithmic insertion, deletion, lookup and min/max queries.
//!
//! Nodes are stored in an arena owned by the tree and are addressed by [`NodeRef`] handles.
//! A handle outlives neither its node nor its tree: using it after the node was released, or
//! with another tree, is detected and reported instead of reading whatever took its place.
//!
//! Duplicate keys are allowed; the tree behaves as an ordered multiset.
//!
//! # Example
//!
//! ```rust
//! use rbtree::{Color, RedBlackTree};
//!
//! let mut tree = RedBlackTree::new();
//!
//! for key in [10, 20, 30] {
//!     tree.insert(key).unwrap();
//! }
//!
//! let root = tree.root().unwrap();
//!
//! assert_eq!(tree.get(root), Some(&20));
//! assert_eq!(tree.color(root), Some(Color::Black));
//! assert_eq!(tree.to_vec(), vec![10, 20, 30]);
//!
//! let twenty = tree.find(&20).unwrap();
//!
//! assert_eq!(tree.erase(twenty), Ok(20));
//! assert_eq!(tree.find(&20), None);
//!
//! let mut keys = [0; 2];
//!
//! assert_eq!(tree.to_ordered_sequence(&mut keys), Ok(2));
//! assert_eq!(keys, [10, 30]);
//!
//! assert_eq!(tree.destroy(), 2);
//! ```

mod arena;
pub mod error;
pub mod tree;

pub use error::{Result, TreeError};
pub use tree::{Color, NodeRef, RedBlackTree};
