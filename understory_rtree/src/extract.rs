// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounding-box extraction strategies.
//!
//! The tree never inspects items directly. It asks an [`Extract`] strategy,
//! supplied at construction, for each item's box and for the axis ordering used
//! by node splitting and bulk packing.
//!
//! - [`Bounds`] (the default) works for any item implementing [`HasAabb`].
//! - Any closure `Fn(&T) -> Aabb2D<S>` is also a strategy.
//!
//! An item's extracted box must stay the same for as long as the item is in the
//! tree; to move an item, remove it and insert it again.

use core::cmp::Ordering;

use crate::types::{Aabb2D, Scalar, cmp_t};

/// Items that know their own bounding box.
pub trait HasAabb<S: Scalar> {
    /// The item's bounding box.
    fn aabb(&self) -> Aabb2D<S>;
}

impl<S: Scalar> HasAabb<S> for Aabb2D<S> {
    #[inline]
    fn aabb(&self) -> Aabb2D<S> {
        *self
    }
}

/// A box with an attached payload, such as `(Aabb2D::new(0, 0, 1, 1), id)`.
impl<S: Scalar, P> HasAabb<S> for (Aabb2D<S>, P) {
    #[inline]
    fn aabb(&self) -> Aabb2D<S> {
        self.0
    }
}

/// Strategy for turning items into boxes and ordering them along each axis.
pub trait Extract<T, S: Scalar> {
    /// Bounding box of `item`. Must be stable for the item's lifetime in the tree.
    fn aabb(&self, item: &T) -> Aabb2D<S>;

    /// Order two items by minimum x.
    fn cmp_min_x(&self, a: &T, b: &T) -> Ordering {
        cmp_t(&self.aabb(a).min_x, &self.aabb(b).min_x)
    }

    /// Order two items by minimum y.
    fn cmp_min_y(&self, a: &T, b: &T) -> Ordering {
        cmp_t(&self.aabb(a).min_y, &self.aabb(b).min_y)
    }
}

/// Default strategy: the item reports its own box via [`HasAabb`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Bounds;

impl<T: HasAabb<S>, S: Scalar> Extract<T, S> for Bounds {
    #[inline]
    fn aabb(&self, item: &T) -> Aabb2D<S> {
        item.aabb()
    }
}

impl<T, S, F> Extract<T, S> for F
where
    S: Scalar,
    F: Fn(&T) -> Aabb2D<S>,
{
    #[inline]
    fn aabb(&self, item: &T) -> Aabb2D<S> {
        self(item)
    }
}

#[cfg(feature = "kurbo")]
mod kurbo_impls {
    use super::HasAabb;
    use crate::types::Aabb2D;

    impl From<kurbo::Rect> for Aabb2D<f64> {
        fn from(r: kurbo::Rect) -> Self {
            // Kurbo allows negative-size rects; normalize so min <= max.
            let r = r.abs();
            Self::new(r.x0, r.y0, r.x1, r.y1)
        }
    }

    impl From<Aabb2D<f64>> for kurbo::Rect {
        fn from(a: Aabb2D<f64>) -> Self {
            Self::new(a.min_x, a.min_y, a.max_x, a.max_y)
        }
    }

    impl HasAabb<f64> for kurbo::Rect {
        #[inline]
        fn aabb(&self) -> Aabb2D<f64> {
            (*self).into()
        }
    }
}
