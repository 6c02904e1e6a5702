// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_rtree --heading-base-level=0

//! Understory R-tree: a dynamic, bulk-loadable 2D R-tree.
//!
//! Understory R-tree answers "which stored items' boxes intersect this box?" in
//! sub-linear time while items come and go.
//!
//! - Insert items one at a time, or pack a whole batch with [`RTree::bulk_load`].
//! - Query by intersecting rectangle ([`RTree::search`]) or just ask whether
//!   anything is there ([`RTree::collides`]).
//! - Remove items by equality or with a custom matcher.
//!
//! Items are stored by value. Their boxes come from an [`Extract`] strategy chosen
//! at construction: the default [`Bounds`] asks the item itself through
//! [`HasAabb`] (implemented for [`Aabb2D`] and `(Aabb2D, payload)` tuples), and any
//! closure `Fn(&T) -> Aabb2D<S>` works too.
//!
//! It is generic over the scalar type (`f32`, `f64`, `i64`) and does not depend on
//! any geometry crate; enable the `kurbo` feature to index `kurbo::Rect` directly.
//!
//! # Example
//!
//! ```rust
//! use understory_rtree::{Aabb2D, RTree};
//!
//! let mut tree: RTree<(Aabb2D<f64>, u32)> = RTree::new();
//! tree.insert((Aabb2D::new(0.0, 0.0, 10.0, 10.0), 1));
//! tree.insert((Aabb2D::new(5.0, 5.0, 15.0, 15.0), 2));
//!
//! let hits = tree.search(&Aabb2D::new(12.0, 12.0, 20.0, 20.0));
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].1, 2);
//!
//! tree.remove(&(Aabb2D::new(5.0, 5.0, 15.0, 15.0), 2));
//! assert!(!tree.collides(&Aabb2D::new(12.0, 12.0, 20.0, 20.0)));
//! ```
//!
//! Bulk loading packs leaves far more tightly than repeated insertion, and can
//! be mixed freely with later inserts and removals:
//!
//! ```rust
//! use understory_rtree::{Aabb2D, RTree};
//!
//! let cells: Vec<Aabb2D<i64>> = (0..100)
//!     .map(|i| Aabb2D::<i64>::from_xywh((i % 10) * 10, (i / 10) * 10, 8, 8))
//!     .collect();
//!
//! let mut tree: RTree<Aabb2D<i64>, i64> = RTree::new();
//! tree.bulk_load(cells);
//! tree.insert(Aabb2D::new(200, 200, 210, 210));
//!
//! assert_eq!(tree.len(), 101);
//! assert_eq!(tree.search(&Aabb2D::new(0, 0, 9, 9)).len(), 1);
//! assert!(tree.validate().is_ok());
//! ```
//!
//! ## Tree shape
//!
//! - `max_entries` (default 9, at least 4) bounds every node's fanout; splits
//!   leave at least `min_entries = ceil(0.4 * max_entries)` children per side.
//! - Splits pick the axis with the smallest total margin, then the split index
//!   with the least overlap (R*-tree style).
//! - Bulk loads use OMT packing and merge into the existing tree, as a new
//!   root sibling when heights match or as a subtree otherwise.
//! - All leaves sit at the same depth; every node's box is exactly the union of
//!   its children. [`RTree::validate`] checks this.
//!
//! ### Float semantics
//!
//! This crate assumes finite, non-NaN coordinates with `min <= max`. Debug builds
//! assert this on insertion; release builds silently produce wrong answers.
//! Area and margin metrics use widened accumulators (`f32`→`f64`, `i64`→`i128`).
//!
//! The tree has no interior mutability; share it across threads behind your own lock.

#![no_std]

extern crate alloc;

mod bulk;
pub mod error;
pub mod extract;
mod insert;
mod node;
mod remove;
pub mod tree;
pub mod types;

#[cfg(test)]
mod testing;

pub use error::InvariantError;
pub use extract::{Bounds, Extract, HasAabb};
pub use tree::{DEFAULT_MAX_ENTRIES, Iter, RTree};
pub use types::{Aabb2D, Scalar};

/// R-tree with i64 coordinates and i128 metrics.
pub type RTreeI64<T, E = Bounds> = RTree<T, i64, E>;

/// R-tree with f32 coordinates and f64 metrics.
pub type RTreeF32<T, E = Bounds> = RTree<T, f32, E>;

/// R-tree with f64 coordinates and f64 metrics.
pub type RTreeF64<T, E = Bounds> = RTree<T, f64, E>;
