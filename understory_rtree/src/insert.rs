// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental insertion: subtree choice, overflow splits, and root growth.
//!
//! Splits follow the R*-tree recipe. The split axis is the one whose sorted
//! order yields the smallest total margin over every legal distribution; the
//! split index along that axis minimizes the overlap of the two groups, then
//! their summed area.

use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::extract::Extract;
use crate::node::{Child, Node, NodeIdx};
use crate::tree::RTree;
use crate::types::{Aabb2D, Scalar, area, cmp_t, enlargement, intersection_area, margin};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

impl<T, S: Scalar, E: Extract<T, S>> RTree<T, S, E> {
    /// Insert one item.
    ///
    /// The item's box must have finite, ordered coordinates; this is only
    /// checked in debug builds.
    pub fn insert(&mut self, item: T) -> &mut Self {
        let bbox = self.extract.aabb(&item);
        debug_assert!(
            bbox.is_valid(),
            "item boxes must have ordered, non-NaN coordinates: {bbox:?}"
        );
        let level = self.height() - 1;
        self.insert_child(Child::Item { item, bbox }, bbox, level);
        self.len += 1;
        self
    }

    /// Attach `child` (an item, or a subtree when merging) below the node at
    /// depth `level` on the best path, then repair overflow and ancestor boxes.
    pub(crate) fn insert_child(&mut self, child: Child<T, S>, bbox: Aabb2D<S>, level: usize) {
        let mut path = Vec::new();
        let target = self.choose_subtree(&bbox, level, &mut path);
        let node = self.arena.get_mut(target);
        node.children.push(child);
        self.arena.extend_bbox(target, bbox);

        let mut depth = path.len();
        while depth > 0 && self.arena.get(path[depth - 1]).children.len() > self.max_entries {
            self.split(&path, depth - 1);
            depth -= 1;
        }
        for &idx in &path[..depth] {
            self.arena.extend_bbox(idx, bbox);
        }
    }

    /// Walk from the root toward depth `level`, recording the path taken.
    fn choose_subtree(&self, bbox: &Aabb2D<S>, level: usize, path: &mut Vec<NodeIdx>) -> NodeIdx {
        let mut idx = self.root;
        loop {
            path.push(idx);
            let node = self.arena.get(idx);
            if node.leaf || path.len() - 1 == level {
                return idx;
            }

            let mut best: Option<(S::Acc, S::Acc, NodeIdx)> = None;
            for child in &node.children {
                let Child::Node(ci) = child else {
                    continue;
                };
                let cb = self.arena.get(*ci).bbox;
                let grow = enlargement(&cb, bbox);
                let size = area(&cb);
                let better = match best {
                    None => true,
                    Some((bg, bs, _)) => grow < bg || (grow == bg && size < bs),
                };
                if better {
                    best = Some((grow, size, *ci));
                }
            }
            // Internal nodes are never empty.
            let Some((_, _, next)) = best else {
                return idx;
            };
            idx = next;
        }
    }

    /// Split the overflowing node at `path[level]` in two.
    fn split(&mut self, path: &[NodeIdx], level: usize) {
        let idx = path[level];
        let m = self.min_entries;
        let (height, leaf) = {
            let node = self.arena.get(idx);
            (node.height, node.leaf)
        };
        let mut children = core::mem::take(&mut self.arena.get_mut(idx).children);
        self.choose_split_axis(&mut children, m);
        let at = self.choose_split_index(&children, m);
        let right = children.split_off(at);

        self.arena.get_mut(idx).children = children;
        self.arena.refresh_bbox(idx);
        let sibling = self.arena.alloc(Node {
            bbox: Aabb2D::empty(),
            height,
            leaf,
            children: right,
        });
        self.arena.refresh_bbox(sibling);

        if level > 0 {
            self.arena
                .get_mut(path[level - 1])
                .children
                .push(Child::Node(sibling));
        } else {
            self.split_root(idx, sibling);
        }
    }

    /// Replace the root by a new node holding `left` and `right`.
    pub(crate) fn split_root(&mut self, left: NodeIdx, right: NodeIdx) {
        let height = self.arena.get(left).height + 1;
        let root = self.arena.alloc(Node::new_internal(
            height,
            vec![Child::Node(left), Child::Node(right)],
        ));
        self.arena.refresh_bbox(root);
        self.root = root;
        log::trace!("r-tree root split, height is now {height}");
    }

    /// Leave `children` sorted along the axis with the smaller total margin.
    fn choose_split_axis(&self, children: &mut [Child<T, S>], m: usize) {
        self.sort_children(children, Axis::X);
        let x_margin = self.all_dist_margin(children, m);
        self.sort_children(children, Axis::Y);
        let y_margin = self.all_dist_margin(children, m);
        if x_margin < y_margin {
            self.sort_children(children, Axis::X);
        }
    }

    /// Sum of group margins over every distribution with at least `m` children per side.
    fn all_dist_margin(&self, children: &[Child<T, S>], m: usize) -> S::Acc {
        let n = children.len();
        let mut left = self.arena.children_bbox(&children[..m]);
        let mut right = self.arena.children_bbox(&children[n - m..]);
        let mut total = margin(&left) + margin(&right);
        for c in &children[m..n - m] {
            left = left.union(&self.arena.child_bbox(c));
            total = total + margin(&left);
        }
        for c in children[m..n - m].iter().rev() {
            right = right.union(&self.arena.child_bbox(c));
            total = total + margin(&right);
        }
        total
    }

    /// Pick the split point with the least overlap, then the least total area.
    fn choose_split_index(&self, children: &[Child<T, S>], m: usize) -> usize {
        let n = children.len();
        let mut best: Option<(S::Acc, S::Acc, usize)> = None;
        for i in m..=n - m {
            let b1 = self.arena.children_bbox(&children[..i]);
            let b2 = self.arena.children_bbox(&children[i..]);
            let overlap = intersection_area(&b1, &b2);
            let size = area(&b1) + area(&b2);
            let better = match best {
                // Metrics that do not compare (NaN) never win.
                None => overlap.partial_cmp(&overlap).is_some(),
                Some((bo, bs, _)) => overlap < bo || (overlap == bo && size < bs),
            };
            if better {
                best = Some((overlap, size, i));
            }
        }
        best.map(|(_, _, i)| i).unwrap_or(n - m)
    }

    /// Stable sort by minimum coordinate: items through the extractor, subtrees by their boxes.
    fn sort_children(&self, children: &mut [Child<T, S>], axis: Axis) {
        children.sort_by(|a, b| match (a, b) {
            (Child::Item { item: ia, .. }, Child::Item { item: ib, .. }) => match axis {
                Axis::X => self.extract.cmp_min_x(ia, ib),
                Axis::Y => self.extract.cmp_min_y(ia, ib),
            },
            (Child::Node(na), Child::Node(nb)) => {
                let (ba, bb) = (self.arena.get(*na).bbox, self.arena.get(*nb).bbox);
                match axis {
                    Axis::X => cmp_t(&ba.min_x, &bb.min_x),
                    Axis::Y => cmp_t(&ba.min_y, &bb.min_y),
                }
            }
            // Nodes never mix items and subtrees.
            _ => Ordering::Equal,
        });
    }
}
