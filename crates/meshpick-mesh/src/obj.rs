//! Wavefront OBJ reader.
//!
//! Parsing is delegated to `tobj`, which triangulates polygons and
//! re-indexes every attribute onto a single index buffer. All objects and
//! groups of the file end up in one [`GeometryStore`], in file order.

use std::io::BufRead;
use std::path::Path;

use meshpick_math::{Point3, Vec2, Vec3, Vec4};

use crate::error::{MeshError, Result};
use crate::store::{GeometryStore, Vertex};

/// Read an OBJ file from a path.
pub fn read_obj(path: impl AsRef<Path>) -> Result<GeometryStore> {
    let path = path.as_ref();
    let (models, materials) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)?;
    if let Err(e) = materials {
        log::warn!("{}: materials not loaded: {e}", path.display());
    }
    models_to_store(&models)
}

/// Read OBJ data from a buffered reader. `mtllib` statements are ignored.
pub fn read_obj_from_reader<R: BufRead>(mut reader: R) -> Result<GeometryStore> {
    let (models, _) = tobj::load_obj_buf(&mut reader, &tobj::GPU_LOAD_OPTIONS, |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })?;
    models_to_store(&models)
}

fn models_to_store(models: &[tobj::Model]) -> Result<GeometryStore> {
    let has_normals = !models.is_empty() && models.iter().all(|m| !m.mesh.normals.is_empty());

    let mut store = GeometryStore::new();
    for model in models {
        let part = mesh_to_store(&model.mesh, has_normals, store.num_faces())?;
        store.merge(&part);
    }

    store.validate()?;

    if !has_normals {
        log::warn!("OBJ data has no normals for every object, recomputing");
        store.compute_normals();
    }

    Ok(store)
}

fn mesh_to_store(mesh: &tobj::Mesh, copy_normals: bool, first_face: usize) -> Result<GeometryStore> {
    let num_vertices = mesh.positions.len() / 3;
    let mut part = GeometryStore::with_capacity(num_vertices, mesh.indices.len() / 3);

    for i in 0..num_vertices {
        let p = &mesh.positions[3 * i..3 * i + 3];
        let mut vertex = Vertex::new(Point3::new(p[0] as f64, p[1] as f64, p[2] as f64));

        if let Some(t) = mesh.texcoords.get(2 * i..2 * i + 2) {
            vertex = vertex.with_texcoord(Vec2::new(t[0] as f64, t[1] as f64));
        }
        if let Some(c) = mesh.vertex_color.get(3 * i..3 * i + 3) {
            vertex = vertex.with_color(Vec4::new(c[0] as f64, c[1] as f64, c[2] as f64, 1.0));
        }
        if copy_normals {
            if let Some(n) = mesh.normals.get(3 * i..3 * i + 3) {
                vertex = vertex.with_normal(Vec3::new(n[0] as f64, n[1] as f64, n[2] as f64));
            }
        }

        part.add_vertex(vertex);
    }

    for (k, tri) in mesh.indices.chunks(3).enumerate() {
        if tri.len() != 3 {
            return Err(MeshError::NonTriangularFace {
                face: first_face + k,
                arity: tri.len(),
            });
        }
        part.add_face(tri[0], tri[1], tri[2]);
    }

    Ok(part)
}
