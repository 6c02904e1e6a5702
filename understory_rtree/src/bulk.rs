// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! OMT bulk loading.
//!
//! A batch is packed top-down: the target height is `ceil(log_M(N))`, the root
//! fanout is reduced so the upper levels come out as full as possible, and each
//! level is cut into vertical bands (by min x) and then cells (by min y) using
//! grouped selection instead of full sorts. The packed tree is then merged
//! into whatever the tree already holds.

use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::extract::Extract;
use crate::node::{Child, Node, NodeIdx};
use crate::tree::RTree;
use crate::types::{Aabb2D, Scalar};

type Entry<T, S> = (T, Aabb2D<S>);

impl<T, S: Scalar, E: Extract<T, S>> RTree<T, S, E> {
    /// Insert a batch of items, packing them into balanced nodes.
    ///
    /// Batches smaller than [`min_entries`](Self::min_entries) fall back to
    /// one-by-one insertion; an empty batch leaves the tree untouched.
    pub fn bulk_load<I: IntoIterator<Item = T>>(&mut self, items: I) -> &mut Self {
        let items: Vec<T> = items.into_iter().collect();
        if items.is_empty() {
            return self;
        }
        if items.len() < self.min_entries {
            for item in items {
                self.insert(item);
            }
            return self;
        }

        let entries: Vec<Entry<T, S>> = items
            .into_iter()
            .map(|item| {
                let bbox = self.extract.aabb(&item);
                debug_assert!(
                    bbox.is_valid(),
                    "item boxes must have ordered, non-NaN coordinates: {bbox:?}"
                );
                (item, bbox)
            })
            .collect();
        let n = entries.len();
        let (height, fanout) = packing_shape(n, self.max_entries);
        let packed = self.build(entries, height, fanout);
        self.len += n;
        self.merge(packed);
        self
    }

    /// Pack `items` into a subtree of the given height.
    fn build(&mut self, mut items: Vec<Entry<T, S>>, height: usize, fanout: usize) -> NodeIdx {
        let n = items.len();
        if n <= self.max_entries {
            let children = items
                .into_iter()
                .map(|(item, bbox)| Child::Item { item, bbox })
                .collect();
            let leaf = self.arena.alloc(Node::new_leaf(children));
            self.arena.refresh_bbox(leaf);
            return self.lift(leaf, height);
        }

        let n2 = n.div_ceil(fanout);
        let n1 = n2 * ceil_sqrt(fanout);
        {
            let extract = &self.extract;
            multi_select(&mut items, n1, |a, b| extract.cmp_min_x(&a.0, &b.0));
        }

        let mut children = Vec::with_capacity(fanout);
        let mut rest = items.into_iter();
        loop {
            let mut band: Vec<Entry<T, S>> = rest.by_ref().take(n1).collect();
            if band.is_empty() {
                break;
            }
            {
                let extract = &self.extract;
                multi_select(&mut band, n2, |a, b| extract.cmp_min_y(&a.0, &b.0));
            }
            let mut cells = band.into_iter();
            loop {
                let cell: Vec<Entry<T, S>> = cells.by_ref().take(n2).collect();
                if cell.is_empty() {
                    break;
                }
                let child = self.build(cell, height - 1, self.max_entries);
                children.push(Child::Node(child));
            }
        }

        let node = self.arena.alloc(Node::new_internal(height, children));
        self.arena.refresh_bbox(node);
        node
    }

    /// Wrap `idx` in single-child parents until it reaches `height`, so a
    /// short cell still ends with its leaf at the common depth.
    fn lift(&mut self, mut idx: NodeIdx, height: usize) -> NodeIdx {
        loop {
            let (h, bbox) = {
                let node = self.arena.get(idx);
                (node.height, node.bbox)
            };
            if h >= height {
                return idx;
            }
            let mut parent = Node::new_internal(h + 1, vec![Child::Node(idx)]);
            parent.bbox = bbox;
            idx = self.arena.alloc(parent);
        }
    }

    /// Combine the freshly packed subtree rooted at `packed` with the current root.
    fn merge(&mut self, packed: NodeIdx) {
        let root = self.arena.get(self.root);
        if root.children.is_empty() {
            let old = self.root;
            self.root = packed;
            self.arena.release(old);
            log::trace!("bulk load into empty r-tree");
            return;
        }

        let root_height = root.height;
        let packed_height = self.arena.get(packed).height;
        if root_height == packed_height {
            log::trace!("bulk load merged as sibling of the root at height {root_height}");
            self.split_root(self.root, packed);
            return;
        }

        let (outer, inner) = if root_height < packed_height {
            (packed, self.root)
        } else {
            (self.root, packed)
        };
        self.root = outer;
        let outer_height = root_height.max(packed_height);
        let inner_height = root_height.min(packed_height);
        let bbox = self.arena.get(inner).bbox;
        log::trace!(
            "bulk load merged as subtree of height {inner_height} into height {outer_height}"
        );
        self.insert_child(Child::Node(inner), bbox, outer_height - inner_height - 1);
    }
}

/// Target height for `n` items and the root fanout that fills the levels below it.
fn packing_shape(n: usize, max_entries: usize) -> (usize, usize) {
    let mut height = 1;
    // Capacity of one child of the root: max_entries^(height - 1).
    let mut below = 1_usize;
    while below.saturating_mul(max_entries) < n {
        below *= max_entries;
        height += 1;
    }
    (height, n.div_ceil(below))
}

fn ceil_sqrt(n: usize) -> usize {
    let mut r = 1_usize;
    while r * r < n {
        r += 1;
    }
    r
}

/// Reorder `items` so that consecutive groups of `n` are ordered relative to
/// each other (every element of a group compares `<=` every element of the
/// next), without sorting inside groups.
pub(crate) fn multi_select<X, F>(items: &mut [X], n: usize, mut cmp: F)
where
    F: FnMut(&X, &X) -> Ordering,
{
    if items.is_empty() || n == 0 {
        return;
    }
    let mut stack = vec![(0, items.len() - 1)];
    while let Some((left, right)) = stack.pop() {
        if right - left <= n {
            continue;
        }
        let mid = left + (right - left).div_ceil(2 * n) * n;
        items[left..=right].select_nth_unstable_by(mid - left, &mut cmp);
        stack.push((left, mid));
        stack.push((mid, right));
    }
}
