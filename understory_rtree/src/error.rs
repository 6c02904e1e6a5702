// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural invariant violations reported by [`RTree::validate`](crate::RTree::validate).

/// A broken structural invariant, with the depth (root = 0) of the offending node.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    /// A node's box differs from the union of its children's boxes.
    #[error("node at depth {depth} has a bounding box that is not the union of its children")]
    StaleBounds {
        /// Depth of the node.
        depth: usize,
    },
    /// A node's height does not match its distance from the root, so leaves are not level.
    #[error("node at depth {depth} has height {found}, expected {expected}")]
    HeightMismatch {
        /// Depth of the node.
        depth: usize,
        /// Height implied by the root height and the depth.
        expected: usize,
        /// Height stored on the node.
        found: usize,
    },
    /// The leaf flag disagrees with the node height or with the kind of children held.
    #[error("node at depth {depth} mixes up leaf entries and subtrees")]
    LeafMismatch {
        /// Depth of the node.
        depth: usize,
    },
    /// A node holds more children than the configured maximum.
    #[error("node at depth {depth} has {children} children, more than the maximum of {max}")]
    Overfull {
        /// Depth of the node.
        depth: usize,
        /// Number of children found.
        children: usize,
        /// Configured maximum fanout.
        max: usize,
    },
    /// A node other than the root has no children.
    #[error("non-root node at depth {depth} is empty")]
    EmptyNode {
        /// Depth of the node.
        depth: usize,
    },
    /// The number of stored items differs from the tracked length.
    #[error("tree tracks {expected} items but holds {found}")]
    CountMismatch {
        /// Length tracked by the tree.
        expected: usize,
        /// Items actually reachable from the root.
        found: usize,
    },
}
