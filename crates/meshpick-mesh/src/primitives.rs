//! Procedural triangle meshes.
//!
//! All builders emit counter-clockwise triangles seen from outside and
//! leave the store with computed normals.

use std::f64::consts::PI;

use meshpick_math::Point3;

use crate::store::{GeometryStore, Vertex};

/// Build an axis-aligned box spanning `min..max`.
///
/// 8 vertices and 12 triangles, two per side, in the face order
/// `-Z, +Z, -Y, +Y, -X, +X`.
/// ```text
///     v7----v6
///    /|    /|
///   v4----v5|    z
///   | v3--|-v2   | y
///   |/    |/     |/
///   v0----v1     +---x
/// ```
pub fn make_box(min: Point3, max: Point3) -> GeometryStore {
    let mut store = GeometryStore::with_capacity(8, 12);
    for z in [min.z, max.z] {
        store.add_vertex(Vertex::new(Point3::new(min.x, min.y, z)));
        store.add_vertex(Vertex::new(Point3::new(max.x, min.y, z)));
        store.add_vertex(Vertex::new(Point3::new(max.x, max.y, z)));
        store.add_vertex(Vertex::new(Point3::new(min.x, max.y, z)));
    }

    const FACES: [[u32; 3]; 12] = [
        [0, 2, 1],
        [0, 3, 2],
        [4, 5, 6],
        [4, 6, 7],
        [0, 1, 5],
        [0, 5, 4],
        [3, 7, 6],
        [3, 6, 2],
        [0, 4, 7],
        [0, 7, 3],
        [1, 2, 6],
        [1, 6, 5],
    ];
    for [a, b, c] in FACES {
        store.add_face(a, b, c);
    }

    store.compute_normals();
    store
}

/// The `[-1, 1]^3` cube.
pub fn make_unit_cube() -> GeometryStore {
    make_box(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
}

/// Build a UV sphere centered at the origin.
///
/// `segments` counts vertices around each latitude ring (at least 3) and
/// `rings` counts latitude bands from pole to pole (at least 2).
pub fn make_uv_sphere(radius: f64, segments: u32, rings: u32) -> GeometryStore {
    let segments = segments.max(3);
    let rings = rings.max(2);

    let mut store = GeometryStore::new();
    let north = store.add_vertex(Vertex::new(Point3::new(0.0, 0.0, radius)));
    for i in 1..rings {
        let theta = PI * i as f64 / rings as f64;
        for j in 0..segments {
            let phi = 2.0 * PI * j as f64 / segments as f64;
            store.add_vertex(Vertex::new(Point3::new(
                radius * theta.sin() * phi.cos(),
                radius * theta.sin() * phi.sin(),
                radius * theta.cos(),
            )));
        }
    }
    let south = store.add_vertex(Vertex::new(Point3::new(0.0, 0.0, -radius)));

    let ring = |i: u32, j: u32| 1 + (i - 1) * segments + j % segments;

    for j in 0..segments {
        store.add_face(north, ring(1, j), ring(1, j + 1));
    }
    for i in 1..rings - 1 {
        for j in 0..segments {
            let (a, b) = (ring(i, j), ring(i, j + 1));
            let (c, d) = (ring(i + 1, j), ring(i + 1, j + 1));
            store.add_face(a, c, d);
            store.add_face(a, d, b);
        }
    }
    for j in 0..segments {
        store.add_face(south, ring(rings - 1, j + 1), ring(rings - 1, j));
    }

    store.compute_normals();
    store
}

/// Build a flat `cells x cells` grid of side `size` in the `z = 0` plane,
/// centered at the origin and facing `+Z`.
pub fn make_grid(cells: u32, size: f64) -> GeometryStore {
    let cells = cells.max(1);
    let n = cells + 1;
    let step = size / cells as f64;
    let origin = -0.5 * size;

    let mut store = GeometryStore::with_capacity((n * n) as usize, (2 * cells * cells) as usize);
    for j in 0..n {
        for i in 0..n {
            store.add_vertex(Vertex::new(Point3::new(
                origin + i as f64 * step,
                origin + j as f64 * step,
                0.0,
            )));
        }
    }

    let idx = |i: u32, j: u32| j * n + i;
    for j in 0..cells {
        for i in 0..cells {
            let (a, b) = (idx(i, j), idx(i + 1, j));
            let (c, d) = (idx(i + 1, j + 1), idx(i, j + 1));
            store.add_face(a, b, c);
            store.add_face(a, c, d);
        }
    }

    store.compute_normals();
    store
}
