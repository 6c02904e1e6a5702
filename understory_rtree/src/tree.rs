// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`RTree`] container: construction, queries, and structural checks.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::InvariantError;
use crate::extract::{Bounds, Extract};
use crate::node::{Arena, Child, Node, NodeIdx};
use crate::types::{Aabb2D, Scalar};

/// Fanout used by [`RTree::new`].
pub const DEFAULT_MAX_ENTRIES: usize = 9;

/// Smallest accepted maximum fanout.
const MIN_MAX_ENTRIES: usize = 4;

/// A dynamic 2D R-tree over items of type `T` with `S` coordinates.
///
/// Items are stored by value in the leaves. Their boxes come from the
/// extraction strategy `E` (see [`Extract`]), captured once on insertion.
///
/// Nodes hold between `min_entries` and `max_entries` children when produced by
/// a split; bulk loading and removal may leave some nodes less full, but every
/// leaf always sits at the same depth and every node's box is exactly the
/// union of its children.
pub struct RTree<T, S: Scalar = f64, E = Bounds> {
    pub(crate) max_entries: usize,
    pub(crate) min_entries: usize,
    pub(crate) root: NodeIdx,
    pub(crate) arena: Arena<T, S>,
    pub(crate) len: usize,
    pub(crate) extract: E,
}

impl<T, S: Scalar> RTree<T, S, Bounds> {
    /// Create an empty tree with the default fanout of 9.
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }

    /// Create an empty tree with the given maximum fanout (at least 4).
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self::with_extractor(max_entries, Bounds)
    }
}

impl<T, S: Scalar> Default for RTree<T, S, Bounds> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S: Scalar, E> RTree<T, S, E> {
    /// Create an empty tree with a custom box extraction strategy.
    ///
    /// `max_entries` is raised to 4 if smaller; the minimum fanout is
    /// `ceil(0.4 * max_entries)`, never below 2.
    pub fn with_extractor(max_entries: usize, extract: E) -> Self {
        let max_entries = max_entries.max(MIN_MAX_ENTRIES);
        let min_entries = max_entries.saturating_mul(2).div_ceil(5).max(2);
        let mut arena = Arena::default();
        let root = arena.alloc(Node::new_leaf(Vec::new()));
        Self {
            max_entries,
            min_entries,
            root,
            arena,
            len: 0,
            extract,
        }
    }

    /// Maximum number of children per node.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Minimum number of children per node produced by a split.
    pub fn min_entries(&self) -> usize {
        self.min_entries
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree; 1 while the root is a single leaf.
    pub fn height(&self) -> usize {
        self.arena.get(self.root).height
    }

    /// Bounding box of everything stored, or `None` for an empty tree.
    pub fn bounds(&self) -> Option<Aabb2D<S>> {
        if self.is_empty() {
            None
        } else {
            Some(self.arena.get(self.root).bbox)
        }
    }

    /// The extraction strategy in use.
    pub fn extractor(&self) -> &E {
        &self.extract
    }

    /// Remove every item, resetting the root to an empty leaf.
    pub fn clear(&mut self) -> &mut Self {
        self.arena.clear();
        self.root = self.arena.alloc(Node::new_leaf(Vec::new()));
        self.len = 0;
        self
    }

    /// All stored items, in tree order.
    pub fn all(&self) -> Vec<&T> {
        let mut out = Vec::with_capacity(self.len);
        self.visit_all(self.root, &mut |item| out.push(item));
        out
    }

    /// Borrowing iterator over all stored items.
    pub fn iter(&self) -> Iter<'_, T, S> {
        Iter {
            arena: &self.arena,
            stack: vec![self.root],
            current: core::slice::Iter::default(),
        }
    }

    /// Items whose boxes intersect `bbox` (touching counts).
    pub fn search(&self, bbox: &Aabb2D<S>) -> Vec<&T> {
        let mut out = Vec::new();
        self.search_with(bbox, |item| out.push(item));
        out
    }

    /// Visit items whose boxes intersect `bbox` without collecting them.
    pub fn search_with<'a, F: FnMut(&'a T)>(&'a self, bbox: &Aabb2D<S>, mut f: F) {
        if !bbox.intersects(&self.arena.get(self.root).bbox) {
            return;
        }
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            for child in &self.arena.get(idx).children {
                match child {
                    Child::Item { item, bbox: ib } => {
                        if bbox.intersects(ib) {
                            f(item);
                        }
                    }
                    Child::Node(ci) => {
                        let cb = self.arena.get(*ci).bbox;
                        if !bbox.intersects(&cb) {
                            continue;
                        }
                        if bbox.contains(&cb) {
                            // Everything below intersects; skip the box tests.
                            self.visit_all(*ci, &mut f);
                        } else {
                            stack.push(*ci);
                        }
                    }
                }
            }
        }
    }

    /// Whether any stored item's box intersects `bbox`.
    pub fn collides(&self, bbox: &Aabb2D<S>) -> bool {
        if !bbox.intersects(&self.arena.get(self.root).bbox) {
            return false;
        }
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            for child in &self.arena.get(idx).children {
                match child {
                    Child::Item { bbox: ib, .. } => {
                        if bbox.intersects(ib) {
                            return true;
                        }
                    }
                    Child::Node(ci) => {
                        let cb = self.arena.get(*ci).bbox;
                        if bbox.intersects(&cb) {
                            // Non-root nodes are never empty, so containment implies a hit.
                            if bbox.contains(&cb) {
                                return true;
                            }
                            stack.push(*ci);
                        }
                    }
                }
            }
        }
        false
    }

    /// Check every structural invariant of the tree.
    ///
    /// This walks the whole tree and is meant for tests and debugging.
    pub fn validate(&self) -> Result<(), InvariantError> {
        let root_height = self.height();
        let mut found = 0_usize;
        let mut stack = vec![(self.root, 0_usize)];
        while let Some((idx, depth)) = stack.pop() {
            let node = self.arena.get(idx);
            let expected = root_height.saturating_sub(depth);
            if node.height != expected || expected == 0 {
                return Err(InvariantError::HeightMismatch {
                    depth,
                    expected,
                    found: node.height,
                });
            }
            if node.leaf != (node.height == 1) {
                return Err(InvariantError::LeafMismatch { depth });
            }
            if node.children.len() > self.max_entries {
                return Err(InvariantError::Overfull {
                    depth,
                    children: node.children.len(),
                    max: self.max_entries,
                });
            }
            if depth > 0 && node.children.is_empty() {
                return Err(InvariantError::EmptyNode { depth });
            }
            if node.bbox != self.arena.children_bbox(&node.children) {
                return Err(InvariantError::StaleBounds { depth });
            }
            for child in &node.children {
                match (child, node.leaf) {
                    (Child::Item { .. }, true) => found += 1,
                    (Child::Node(ci), false) => stack.push((*ci, depth + 1)),
                    _ => return Err(InvariantError::LeafMismatch { depth }),
                }
            }
        }
        if found != self.len {
            return Err(InvariantError::CountMismatch {
                expected: self.len,
                found,
            });
        }
        Ok(())
    }

    /// Visit every item under `idx` without box tests.
    pub(crate) fn visit_all<'a, F: FnMut(&'a T)>(&'a self, idx: NodeIdx, f: &mut F) {
        let mut stack = vec![idx];
        while let Some(i) = stack.pop() {
            for child in &self.arena.get(i).children {
                match child {
                    Child::Item { item, .. } => f(item),
                    Child::Node(ci) => stack.push(*ci),
                }
            }
        }
    }
}

impl<T, S: Scalar, E: Extract<T, S>> Extend<T> for RTree<T, S, E> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T, S: Scalar> FromIterator<T> for RTree<T, S, Bounds>
where
    Bounds: Extract<T, S>,
{
    /// Bulk load the items into a tree with the default fanout.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.bulk_load(iter);
        tree
    }
}

impl<'a, T, S: Scalar, E> IntoIterator for &'a RTree<T, S, E> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S: Scalar, E> Debug for RTree<T, S, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RTree")
            .field("max_entries", &self.max_entries)
            .field("min_entries", &self.min_entries)
            .field("len", &self.len)
            .field("height", &self.height())
            .field("arena_nodes", &self.arena.live())
            .finish_non_exhaustive()
    }
}

/// Iterator over all items of an [`RTree`], returned by [`RTree::iter`].
pub struct Iter<'a, T, S> {
    arena: &'a Arena<T, S>,
    stack: Vec<NodeIdx>,
    current: core::slice::Iter<'a, Child<T, S>>,
}

impl<'a, T, S: Scalar> Iterator for Iter<'a, T, S> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(child) = self.current.next() {
                match child {
                    Child::Item { item, .. } => return Some(item),
                    Child::Node(ci) => self.stack.push(*ci),
                }
                continue;
            }
            let idx = self.stack.pop()?;
            self.current = self.arena.get(idx).children.iter();
        }
    }
}

impl<T, S> Debug for Iter<'_, T, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Iter")
            .field("pending_nodes", &self.stack.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
impl<T, S: Scalar, E> RTree<T, S, E> {
    /// Count non-root nodes holding fewer than `min_entries` children.
    pub(crate) fn underfull_nodes(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            let node = self.arena.get(idx);
            if idx != self.root && node.children.len() < self.min_entries {
                count += 1;
            }
            for child in &node.children {
                if let Child::Node(ci) = child {
                    stack.push(*ci);
                }
            }
        }
        count
    }

    /// Count non-root internal nodes holding fewer than `min_entries` children.
    pub(crate) fn underfull_internal_nodes(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            let node = self.arena.get(idx);
            if idx != self.root && !node.leaf && node.children.len() < self.min_entries {
                count += 1;
            }
            for child in &node.children {
                if let Child::Node(ci) = child {
                    stack.push(*ci);
                }
            }
        }
        count
    }

    /// Child count of the root node.
    pub(crate) fn root_fanout(&self) -> usize {
        self.arena.get(self.root).children.len()
    }
}
