#![warn(missing_docs)]

//! Triangle mesh storage and file loading for meshpick.
//!
//! - [`GeometryStore`] - vertex and face arrays, normals, bounding box
//! - [`Aabb3`] - axis-aligned bounding box with a null state
//! - [`load`] - read an `.off` or `.obj` file by extension
//! - [`primitives`] - procedural boxes, spheres and grids
//!
//! # Example
//!
//! ```no_run
//! use meshpick_mesh::load;
//!
//! let store = load("models/scene.obj")?;
//! println!("{} faces", store.num_faces());
//! # Ok::<(), meshpick_mesh::MeshError>(())
//! ```

mod aabb;
pub mod error;
pub mod obj;
pub mod off;
pub mod primitives;
mod store;

use std::path::Path;

pub use aabb::Aabb3;
pub use error::{MeshError, Result};
pub use obj::{read_obj, read_obj_from_reader};
pub use off::{read_off, read_off_from_reader};
pub use store::{Face, GeometryStore, Vertex};

/// Load a triangle mesh, choosing the parser from the file extension
/// (`off` or `obj`, any case).
///
/// Normals are recomputed whenever the file does not provide them.
pub fn load(path: impl AsRef<Path>) -> Result<GeometryStore> {
    let path = path.as_ref();
    log::info!("loading {}", path.display());

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let store = match ext.as_str() {
        "off" => read_off(path)?,
        "obj" => read_obj(path)?,
        _ => return Err(MeshError::UnsupportedExtension(ext)),
    };

    log::info!(
        "{}: {} vertices, {} faces",
        path.display(),
        store.num_vertices(),
        store.num_faces()
    );
    Ok(store)
}
