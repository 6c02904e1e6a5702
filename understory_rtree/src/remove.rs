// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Removal and condensation.

use alloc::vec;
use alloc::vec::Vec;

use crate::extract::Extract;
use crate::node::{Child, NodeIdx};
use crate::tree::RTree;
use crate::types::Scalar;

impl<T, S: Scalar, E: Extract<T, S>> RTree<T, S, E> {
    /// Remove one stored item equal to `item`.
    ///
    /// Does nothing if no such item is stored.
    pub fn remove(&mut self, item: &T) -> &mut Self
    where
        T: PartialEq,
    {
        self.remove_by(item, |stored, wanted| stored == wanted)
    }

    /// Remove one stored item for which `eq(stored, item)` holds.
    ///
    /// Only subtrees whose boxes contain `item`'s box are searched, so `eq`
    /// should only match items with the same box. Does nothing if no match.
    pub fn remove_by<F>(&mut self, item: &T, mut eq: F) -> &mut Self
    where
        F: FnMut(&T, &T) -> bool,
    {
        let bbox = self.extract.aabb(item);
        // (node, index of the next child to try)
        let mut path: Vec<(NodeIdx, usize)> = vec![(self.root, 0)];
        while let Some(&(idx, next)) = path.last() {
            let node = self.arena.get(idx);
            if node.leaf {
                let found = node.children.iter().position(
                    |c| matches!(c, Child::Item { item: stored, .. } if eq(stored, item)),
                );
                if let Some(pos) = found {
                    self.arena.get_mut(idx).children.remove(pos);
                    self.len -= 1;
                    self.condense(&path);
                    return self;
                }
                path.pop();
                continue;
            }

            let descend = node.children[next..]
                .iter()
                .enumerate()
                .find_map(|(offset, c)| match c {
                    Child::Node(ci) if self.arena.get(*ci).bbox.contains(&bbox) => {
                        Some((next + offset, *ci))
                    }
                    _ => None,
                });
            match descend {
                Some((i, ci)) => {
                    if let Some(top) = path.last_mut() {
                        top.1 = i + 1;
                    }
                    path.push((ci, 0));
                }
                None => {
                    path.pop();
                }
            }
        }
        self
    }

    /// Repair the tree along `path` (root first) after a leaf lost an item:
    /// unlink emptied nodes and recompute the boxes of the rest.
    fn condense(&mut self, path: &[(NodeIdx, usize)]) {
        for i in (0..path.len()).rev() {
            let idx = path[i].0;
            if !self.arena.get(idx).children.is_empty() {
                self.arena.refresh_bbox(idx);
                continue;
            }
            if i == 0 {
                log::trace!("r-tree emptied by removal");
                self.clear();
                return;
            }
            // The parent frame points one past the child it descended into.
            let (parent, next) = path[i - 1];
            self.arena.get_mut(parent).children.remove(next - 1);
            self.arena.release(idx);
        }
    }
}
