#![warn(missing_docs)]

//! meshpick - closest-hit ray picking on triangle meshes.
//!
//! A [`Mesh`] owns its geometry, a bounding box and an optional BVH, and
//! answers "what does this ray hit first". A [`Camera`] turns a pixel into
//! a world-space ray so that screen positions can be picked.
//!
//! # Example
//!
//! ```rust,no_run
//! use meshpick::{pick, BvhSettings, Camera, Mesh};
//!
//! let mesh = Mesh::load("bunny.off", &BvhSettings::default())?;
//! let camera = Camera::default();
//! if let Some(hit) = pick(&mesh, &camera, 400.0, 300.0) {
//!     println!("face {:?} at {}", hit.face_id(), hit.intersection_point());
//! }
//! # Ok::<(), meshpick::Error>(())
//! ```

pub mod camera;
pub mod error;
mod mesh;

pub use camera::{pick, Camera, CameraSettings};
pub use error::{Error, Result};
pub use mesh::Mesh;

pub use meshpick_math::{Point3, Transform, Vec3};
pub use meshpick_mesh::{load, primitives, Aabb3, GeometryStore, MeshError, Vertex};
pub use meshpick_raytrace::{Bvh, BvhSettings, BvhStats, Hit, Ray, RaytraceError};
