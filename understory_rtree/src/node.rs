// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree nodes and the arena that owns them.
//!
//! Nodes never point at their parents. Every traversal that needs to walk back
//! up (insertion, removal) records the path it took on an explicit stack.

use alloc::vec::Vec;

use crate::types::{Aabb2D, Scalar, union_aabb};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIdx(usize);

impl NodeIdx {
    const fn new(i: usize) -> Self {
        Self(i)
    }

    pub(crate) const fn get(self) -> usize {
        self.0
    }
}

/// A child slot: stored items in leaves, subtrees in internal nodes.
#[derive(Clone, Debug)]
pub(crate) enum Child<T, S> {
    Node(NodeIdx),
    Item { item: T, bbox: Aabb2D<S> },
}

#[derive(Clone, Debug)]
pub(crate) struct Node<T, S> {
    pub(crate) bbox: Aabb2D<S>,
    /// 1 for leaves, growing toward the root.
    pub(crate) height: usize,
    pub(crate) leaf: bool,
    pub(crate) children: Vec<Child<T, S>>,
}

impl<T, S: Scalar> Node<T, S> {
    pub(crate) fn new_leaf(children: Vec<Child<T, S>>) -> Self {
        Self {
            bbox: Aabb2D::empty(),
            height: 1,
            leaf: true,
            children,
        }
    }

    pub(crate) fn new_internal(height: usize, children: Vec<Child<T, S>>) -> Self {
        Self {
            bbox: Aabb2D::empty(),
            height,
            leaf: false,
            children,
        }
    }
}

/// Slot storage for nodes with recycling of freed slots.
#[derive(Clone, Debug)]
pub(crate) struct Arena<T, S> {
    nodes: Vec<Node<T, S>>,
    free: Vec<NodeIdx>,
}

impl<T, S> Default for Arena<T, S> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<T, S: Scalar> Arena<T, S> {
    pub(crate) fn alloc(&mut self, node: Node<T, S>) -> NodeIdx {
        if let Some(idx) = self.free.pop() {
            self.nodes[idx.get()] = node;
            idx
        } else {
            self.nodes.push(node);
            NodeIdx::new(self.nodes.len() - 1)
        }
    }

    /// Return a node's slot to the free list, dropping whatever it still holds.
    pub(crate) fn release(&mut self, idx: NodeIdx) {
        let node = &mut self.nodes[idx.get()];
        node.children = Vec::new();
        node.bbox = Aabb2D::empty();
        self.free.push(idx);
    }

    /// Drop every node.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
    }

    /// Number of live (not freed) nodes.
    pub(crate) fn live(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    #[inline]
    pub(crate) fn get(&self, idx: NodeIdx) -> &Node<T, S> {
        &self.nodes[idx.get()]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, idx: NodeIdx) -> &mut Node<T, S> {
        &mut self.nodes[idx.get()]
    }

    #[inline]
    pub(crate) fn child_bbox(&self, child: &Child<T, S>) -> Aabb2D<S> {
        match child {
            Child::Node(i) => self.get(*i).bbox,
            Child::Item { bbox, .. } => *bbox,
        }
    }

    /// Union of the boxes of `children`, or the empty box.
    pub(crate) fn children_bbox(&self, children: &[Child<T, S>]) -> Aabb2D<S> {
        children
            .iter()
            .fold(Aabb2D::empty(), |acc, c| union_aabb(acc, self.child_bbox(c)))
    }

    /// Recompute a node's box from scratch.
    pub(crate) fn refresh_bbox(&mut self, idx: NodeIdx) {
        let bbox = self.children_bbox(&self.get(idx).children);
        self.get_mut(idx).bbox = bbox;
    }

    /// Grow a node's box to also cover `bbox`.
    pub(crate) fn extend_bbox(&mut self, idx: NodeIdx, bbox: Aabb2D<S>) {
        let node = self.get_mut(idx);
        node.bbox = union_aabb(node.bbox, bbox);
    }
}
