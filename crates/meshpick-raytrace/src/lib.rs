#![warn(missing_docs)]

//! Closest-hit ray casting against triangle meshes.
//!
//! # Architecture
//!
//! - [`Ray`] - origin and (unnormalized) direction
//! - [`Hit`] - closest-hit accumulator refined in place by every test
//! - [`intersect`] - ray-triangle and ray-box intersection
//! - [`bvh`] - bounding volume hierarchy over a [`GeometryStore`](meshpick_mesh::GeometryStore)
//!
//! # Example
//!
//! ```
//! use meshpick_math::{Point3, Vec3};
//! use meshpick_mesh::primitives::make_unit_cube;
//! use meshpick_raytrace::{Bvh, BvhSettings, Hit, Ray};
//!
//! let cube = make_unit_cube();
//! let bvh = Bvh::build(&cube, &BvhSettings::default())?;
//!
//! let ray = Ray::new(Point3::new(0.3, 0.2, 5.0), Vec3::new(0.0, 0.0, -1.0));
//! let mut hit = Hit::new();
//! assert!(bvh.intersect(&cube, &ray, &mut hit));
//! assert!((hit.t() - 4.0).abs() < 1e-12);
//! # Ok::<(), meshpick_raytrace::RaytraceError>(())
//! ```

pub mod bvh;
pub mod error;
mod hit;
pub mod intersect;
mod ray;

pub use bvh::{Bvh, BvhNode, BvhSettings, BvhStats};
pub use error::{RaytraceError, Result};
pub use hit::Hit;
pub use intersect::{intersect_box, intersect_triangle, BoxHit};
pub use ray::Ray;
