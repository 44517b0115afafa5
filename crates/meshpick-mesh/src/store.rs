//! Vertex and face storage for triangle meshes.

use meshpick_math::{Point3, Tolerance, Transform, Vec2, Vec3, Vec4};

use crate::aabb::Aabb3;
use crate::error::{MeshError, Result};

/// A triangle as three indices into the vertex list.
pub type Face = [u32; 3];

/// A mesh vertex with its shading attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position.
    pub position: Point3,
    /// Unit normal (zero until computed or loaded).
    pub normal: Vec3,
    /// RGBA color in `[0, 1]`.
    pub color: Vec4,
    /// Texture coordinate.
    pub texcoord: Vec2,
}

impl Vertex {
    /// Color given to vertices that the source data does not color.
    pub fn default_color() -> Vec4 {
        Vec4::new(0.6, 0.6, 0.6, 1.0)
    }

    /// A vertex at `position` with default attributes.
    pub fn new(position: Point3) -> Self {
        Self {
            position,
            normal: Vec3::zeros(),
            color: Self::default_color(),
            texcoord: Vec2::zeros(),
        }
    }

    /// Replace the normal.
    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = normal;
        self
    }

    /// Replace the color.
    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    /// Replace the texture coordinate.
    pub fn with_texcoord(mut self, texcoord: Vec2) -> Self {
        self.texcoord = texcoord;
        self
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::new(Point3::origin())
    }
}

/// Vertex and face arrays of a triangle mesh.
///
/// Faces refer to vertices by index, and a face's position in the face list
/// is its face id everywhere else (BVH leaves, hit records). Derived data
/// such as normals and bounding boxes are only recomputed on request.
#[derive(Debug, Clone, Default)]
pub struct GeometryStore {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
}

impl GeometryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with room for the given counts.
    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
        }
    }

    /// Append a vertex, returning its index.
    pub fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        self.vertices.push(vertex);
        (self.vertices.len() - 1) as u32
    }

    /// Append a triangle, returning its face id.
    ///
    /// Indices are not checked here; see [`GeometryStore::validate`].
    pub fn add_face(&mut self, i0: u32, i1: u32, i2: u32) -> usize {
        self.faces.push([i0, i1, i2]);
        self.faces.len() - 1
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// True if the store holds no faces.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// All vertices.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Mutable access to the vertices. Derived data goes stale after edits.
    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    /// All faces.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// The `corner`-th vertex (0, 1 or 2) of face `face_id`.
    pub fn vertex_of_face(&self, face_id: usize, corner: usize) -> &Vertex {
        &self.vertices[self.faces[face_id][corner] as usize]
    }

    /// Corner positions of face `face_id`.
    #[inline]
    pub fn triangle(&self, face_id: usize) -> [Point3; 3] {
        let [a, b, c] = self.faces[face_id];
        [
            self.vertices[a as usize].position,
            self.vertices[b as usize].position,
            self.vertices[c as usize].position,
        ]
    }

    /// Un-normalized face normal `(v1 - v0) x (v2 - v0)`; its length is twice
    /// the triangle area.
    pub fn face_normal(&self, face_id: usize) -> Vec3 {
        let [v0, v1, v2] = self.triangle(face_id);
        (v1 - v0).cross(&(v2 - v0))
    }

    /// Recompute smooth vertex normals.
    ///
    /// Each face adds its un-normalized normal to its three corners, so large
    /// triangles weigh more than small ones. Vertices not used by any
    /// non-degenerate face end up with a zero normal.
    pub fn compute_normals(&mut self) {
        for v in &mut self.vertices {
            v.normal = Vec3::zeros();
        }

        for face_id in 0..self.faces.len() {
            let n = self.face_normal(face_id);
            for &i in &self.faces[face_id] {
                self.vertices[i as usize].normal += n;
            }
        }

        for v in &mut self.vertices {
            v.normal = v.normal.try_normalize(0.0).unwrap_or_else(Vec3::zeros);
        }
    }

    /// Tightest box around every vertex position (null when there are none).
    pub fn compute_bounding_box(&self) -> Aabb3 {
        let mut aabb = Aabb3::null();
        for v in &self.vertices {
            aabb.extend(&v.position);
        }
        aabb
    }

    /// Check that every face is made of valid vertex indices.
    pub fn validate(&self) -> Result<()> {
        let vertex_count = self.vertices.len();
        for (face, indices) in self.faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::FaceIndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Face ids whose triangle has (almost) zero area.
    pub fn degenerate_faces(&self, tol: &Tolerance) -> Vec<usize> {
        (0..self.faces.len())
            .filter(|&f| {
                let [a, b, c] = self.triangle(f);
                tol.is_degenerate_triangle(&a, &b, &c)
            })
            .collect()
    }

    /// Move every vertex by `transform`; normals are carried along and
    /// re-normalized.
    pub fn transform(&mut self, transform: &Transform) {
        for v in &mut self.vertices {
            v.position = transform.apply_point(&v.position);
            v.normal = transform
                .apply_normal(&v.normal)
                .try_normalize(0.0)
                .unwrap_or_else(Vec3::zeros);
        }
    }

    /// Append another store, offsetting its face indices.
    pub fn merge(&mut self, other: &GeometryStore) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|f| [f[0] + offset, f[1] + offset, f[2] + offset]),
        );
    }
}
