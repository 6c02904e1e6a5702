// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic data generators shared by the unit tests.

use alloc::vec::Vec;

use crate::types::Aabb2D;

/// Xorshift generator; reproducible without pulling in an RNG crate.
#[derive(Clone, Debug)]
pub(crate) struct Rng(u64);

impl Rng {
    pub(crate) fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    pub(crate) fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1_u64 << 53) as f64)
    }
}

/// `count` boxes with corners in `[0, extent)` and sides up to `max_size`.
pub(crate) fn random_boxes(
    rng: &mut Rng,
    count: usize,
    extent: f64,
    max_size: f64,
) -> Vec<Aabb2D<f64>> {
    (0..count)
        .map(|_| {
            let x = rng.next_f64() * extent;
            let y = rng.next_f64() * extent;
            let w = rng.next_f64() * max_size;
            let h = rng.next_f64() * max_size;
            Aabb2D::<f64>::from_xywh(x, y, w, h)
        })
        .collect()
}
