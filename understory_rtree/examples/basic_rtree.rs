// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Understory R-tree: bulk load, insert, query, and remove.

use understory_rtree::{Aabb2D, RTree};

#[derive(Clone, Debug, PartialEq)]
struct Shop {
    name: &'static str,
    x: f64,
    y: f64,
}

fn main() {
    // Index a payload by a closure instead of storing the box in the item.
    let mut shops: RTree<Shop, f64, _> =
        RTree::with_extractor(8, |s: &Shop| Aabb2D::from_point(s.x, s.y));
    shops.bulk_load([
        Shop { name: "bakery", x: 2.0, y: 3.0 },
        Shop { name: "books", x: 8.0, y: 1.0 },
        Shop { name: "cafe", x: 3.0, y: 4.0 },
        Shop { name: "florist", x: 15.0, y: 12.0 },
    ]);
    shops.insert(Shop { name: "market", x: 4.0, y: 2.0 });

    let near: Vec<_> = shops
        .search(&Aabb2D::new(0.0, 0.0, 5.0, 5.0))
        .into_iter()
        .map(|s| s.name)
        .collect();
    println!("shops near the origin: {near:?}");

    shops.remove(&Shop { name: "cafe", x: 3.0, y: 4.0 });
    println!(
        "after closing the cafe: {} shops, anything at (3,4)? {}",
        shops.len(),
        shops.collides(&Aabb2D::from_point(3.0, 4.0))
    );

    // Boxes with payloads use the default extractor.
    let mut rooms: RTree<(Aabb2D<i64>, u32), i64> = RTree::with_max_entries(4);
    for id in 0..20_u32 {
        let i = i64::from(id);
        rooms.insert((Aabb2D::<i64>::from_xywh((i % 5) * 10, (i / 5) * 10, 9, 9), id));
    }
    println!(
        "rooms: len={}, height={}, bounds={:?}",
        rooms.len(),
        rooms.height(),
        rooms.bounds()
    );
    if let Err(err) = rooms.validate() {
        println!("tree is inconsistent: {err}");
    }
}
