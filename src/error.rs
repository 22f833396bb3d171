/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Error type shared by every fallible tree operation.

use std::collections::TryReserveError;

/// A specialized `Result` type for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors reported by [`RedBlackTree`](crate::RedBlackTree).
///
/// Absence is never an error: lookups that find nothing return `None`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Storage for a new node could not be reserved.
    #[error("failed to allocate storage for a tree node")]
    AllocationFailed(#[from] TryReserveError),

    /// The handle refers to a node that was released, or to another tree.
    #[error("node reference does not belong to this tree")]
    InvalidReference,

    /// The destination buffer cannot hold every key of the tree.
    #[error("destination buffer holds {capacity} keys but the tree holds {required}")]
    BufferTooSmall {
        /// Number of keys in the tree.
        required: usize,
        /// Length of the buffer that was supplied.
        capacity: usize,
    },
}
