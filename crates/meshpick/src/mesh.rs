//! Triangle mesh with a bounding box and an optional BVH.

use std::path::Path;

use meshpick_mesh::{Aabb3, GeometryStore, Vertex};
use meshpick_raytrace::{intersect_box, intersect_triangle, Bvh, BvhSettings, Hit, Ray};

use crate::error::Result;

/// A triangle mesh ready for ray queries.
///
/// Owns its [`GeometryStore`], the store's bounding box and, optionally, a
/// [`Bvh`]. Derived data is never refreshed automatically: after editing the
/// store through [`Mesh::store_mut`], call [`Mesh::update_normals`],
/// [`Mesh::update_bounding_box`] and [`Mesh::update_bvh`] as needed.
#[derive(Debug, Clone)]
pub struct Mesh {
    store: GeometryStore,
    bbox: Aabb3,
    bvh: Option<Box<Bvh>>,
    bvh_settings: BvhSettings,
}

impl Mesh {
    /// Wrap a store. The bounding box is computed; no BVH is built, so
    /// queries use the brute-force path until [`Mesh::update_bvh`] is called.
    pub fn new(store: GeometryStore) -> Self {
        let bbox = store.compute_bounding_box();
        Self {
            store,
            bbox,
            bvh: None,
            bvh_settings: BvhSettings::default(),
        }
    }

    /// Wrap a store and build its BVH.
    pub fn with_bvh(store: GeometryStore, settings: &BvhSettings) -> Result<Self> {
        let mut mesh = Self::new(store);
        mesh.update_bvh_with(settings)?;
        Ok(mesh)
    }

    /// Load an `.off` or `.obj` file and build its BVH.
    pub fn load(path: impl AsRef<Path>, settings: &BvhSettings) -> Result<Self> {
        let store = meshpick_mesh::load(path)?;
        Self::with_bvh(store, settings)
    }

    /// The geometry.
    pub fn store(&self) -> &GeometryStore {
        &self.store
    }

    /// Mutable access to the geometry. Derived data goes stale.
    pub fn store_mut(&mut self) -> &mut GeometryStore {
        &mut self.store
    }

    /// Recompute vertex normals from the current positions.
    pub fn update_normals(&mut self) {
        self.store.compute_normals();
    }

    /// Recompute the bounding box from the current positions.
    pub fn update_bounding_box(&mut self) {
        self.bbox = self.store.compute_bounding_box();
    }

    /// Rebuild the BVH with the current settings.
    pub fn update_bvh(&mut self) -> Result<()> {
        let settings = self.bvh_settings;
        self.update_bvh_with(&settings)
    }

    /// Rebuild the BVH with new settings. On error the previous BVH and
    /// settings are kept.
    pub fn update_bvh_with(&mut self, settings: &BvhSettings) -> Result<()> {
        let bvh = Bvh::build(&self.store, settings)?;
        self.bvh = Some(Box::new(bvh));
        self.bvh_settings = *settings;
        Ok(())
    }

    /// Drop the BVH. Queries fall back to brute force.
    pub fn clear_bvh(&mut self) {
        self.bvh = None;
    }

    /// The BVH, if one has been built.
    pub fn bvh(&self) -> Option<&Bvh> {
        self.bvh.as_deref()
    }

    /// Settings used by [`Mesh::update_bvh`].
    pub fn bvh_settings(&self) -> &BvhSettings {
        &self.bvh_settings
    }

    /// Bounding box as of the last [`Mesh::update_bounding_box`].
    pub fn bounding_box(&self) -> &Aabb3 {
        &self.bbox
    }

    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.store.num_faces()
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.store.num_vertices()
    }

    /// Corner `corner` (0, 1 or 2) of face `face_id`.
    pub fn vertex_of_face(&self, face_id: usize, corner: usize) -> &Vertex {
        self.store.vertex_of_face(face_id, corner)
    }

    /// Intersect a single face, refining `hit` if it is closer.
    pub fn intersect_face(&self, ray: &Ray, hit: &mut Hit, face_id: usize) -> bool {
        intersect_triangle(ray, &self.store.triangle(face_id), face_id, hit)
    }

    /// Refine `hit` with the closest intersection of `ray` and the mesh.
    /// Returns `true` if `hit` was updated.
    ///
    /// Uses the BVH when present, otherwise [`Mesh::intersect_brute_force`].
    pub fn intersect(&self, ray: &Ray, hit: &mut Hit) -> bool {
        match &self.bvh {
            Some(bvh) => bvh.intersect(&self.store, ray, hit),
            None => self.intersect_brute_force(ray, hit),
        }
    }

    /// Test every face, after rejecting rays that miss the bounding box or
    /// enter it beyond `hit`.
    pub fn intersect_brute_force(&self, ray: &Ray, hit: &mut Hit) -> bool {
        match intersect_box(ray, &self.bbox) {
            Some(bh) if bh.t_min <= hit.t() => {}
            _ => return false,
        }

        let mut found = false;
        for face_id in 0..self.num_faces() {
            found |= self.intersect_face(ray, hit, face_id);
        }
        found
    }

    /// Closest hit along `ray`, if any.
    pub fn cast(&self, ray: &Ray) -> Option<Hit> {
        let mut hit = Hit::new();
        self.intersect(ray, &mut hit).then_some(hit)
    }
}

impl From<GeometryStore> for Mesh {
    fn from(store: GeometryStore) -> Self {
        Self::new(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use approx::assert_relative_eq;
    use meshpick_math::{Point3, Transform, Vec3};
    use meshpick_mesh::primitives::{make_grid, make_unit_cube, make_uv_sphere};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::fs;

    fn cube() -> Mesh {
        Mesh::with_bvh(make_unit_cube(), &BvhSettings::default()).unwrap()
    }

    fn random_ray(rng: &mut StdRng, reach: f64) -> Ray {
        let origin = Point3::new(
            rng.gen_range(-reach..reach),
            rng.gen_range(-reach..reach),
            rng.gen_range(-reach..reach),
        );
        let target = Point3::new(
            rng.gen_range(-1.5..1.5),
            rng.gen_range(-1.5..1.5),
            rng.gen_range(-1.5..1.5),
        );
        Ray::through(origin, target)
    }

    fn assert_paths_agree(mesh: &Mesh, ray: &Ray) {
        let mut bvh_hit = Hit::new();
        let mut brute_hit = Hit::new();
        let a = mesh.intersect(ray, &mut bvh_hit);
        let b = mesh.intersect_brute_force(ray, &mut brute_hit);
        assert_eq!(a, b);
        assert_eq!(bvh_hit.face_id(), brute_hit.face_id());
        if a {
            assert_relative_eq!(bvh_hit.t(), brute_hit.t(), epsilon = 1e-12);
            assert_relative_eq!(bvh_hit.bary_coords(), brute_hit.bary_coords(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_cube_top_face() {
        let mesh = cube();
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let mut hit = Hit::new();
        assert!(mesh.intersect(&ray, &mut hit));
        assert_relative_eq!(hit.t(), 4.0, epsilon = 1e-12);
        // (0, 0, 1) lies on the diagonal shared by both top triangles.
        assert!(matches!(hit.face_id(), Some(2) | Some(3)));
        assert_relative_eq!(
            hit.intersection_point(),
            Point3::new(0.0, 0.0, 1.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_cube_miss() {
        let mesh = cube();
        let ray = Ray::new(Point3::new(10.0, 10.0, 10.0), Vec3::new(1.0, 0.0, 0.0));
        let mut hit = Hit::new();
        assert!(!mesh.intersect(&ray, &mut hit));
        assert!(!hit.is_hit());
        assert!(!mesh.intersect_brute_force(&ray, &mut hit));
        assert!(mesh.cast(&ray).is_none());
    }

    #[test]
    fn test_brute_force_without_bvh() {
        let mesh = Mesh::new(make_unit_cube());
        assert!(mesh.bvh().is_none());

        let ray = Ray::new(Point3::new(0.3, 5.0, 0.2), Vec3::new(0.0, -2.0, 0.0));
        let hit = mesh.cast(&ray).unwrap();
        assert_relative_eq!(hit.t(), 2.0, epsilon = 1e-12);
        assert!(matches!(hit.face_id(), Some(6) | Some(7)));
    }

    #[test]
    fn test_closer_prior_hit_rejects_mesh() {
        let mut mesh = cube();
        let ray = Ray::new(Point3::new(0.2, 0.1, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let mut hit = Hit::with_max_distance(1.0);
        assert!(!mesh.intersect(&ray, &mut hit));
        mesh.clear_bvh();
        assert!(!mesh.intersect(&ray, &mut hit));
        assert_eq!(hit.t(), 1.0);
    }

    #[test]
    fn test_origin_inside_hits_far_side() {
        let mesh = cube();
        let ray = Ray::new(Point3::new(0.1, 0.2, 0.3), Vec3::new(1.0, 0.0, 0.0));
        let hit = mesh.cast(&ray).unwrap();
        assert_relative_eq!(hit.t(), 0.9, epsilon = 1e-12);
        assert!(matches!(hit.face_id(), Some(10) | Some(11)));
        assert_paths_agree(&mesh, &ray);
    }

    #[test]
    fn test_paths_agree_on_sphere() {
        let mesh = Mesh::with_bvh(
            make_uv_sphere(1.0, 40, 20),
            &BvhSettings {
                max_leaf_faces: 6,
                max_depth: 100,
            },
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..400 {
            assert_paths_agree(&mesh, &random_ray(&mut rng, 6.0));
        }
    }

    #[test]
    fn test_paths_agree_on_grid() {
        let mesh = Mesh::with_bvh(make_grid(20, 3.0), &BvhSettings::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..400 {
            assert_paths_agree(&mesh, &random_ray(&mut rng, 4.0));
        }
    }

    #[test]
    fn test_edit_then_update() {
        let mut mesh = cube();
        mesh.store_mut()
            .transform(&Transform::translation(0.0, 0.0, 10.0));
        mesh.update_normals();
        mesh.update_bounding_box();
        mesh.update_bvh().unwrap();

        assert_relative_eq!(mesh.bounding_box().min.z, 9.0);
        let ray = Ray::new(Point3::new(0.2, 0.1, 20.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = mesh.cast(&ray).unwrap();
        assert_relative_eq!(hit.t(), 9.0, epsilon = 1e-12);
    }

    #[test]
    fn test_vertex_edit_then_update_bvh() {
        let mut mesh = cube();
        let ray = Ray::new(Point3::new(0.2, 0.1, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(mesh.cast(&ray).unwrap().t(), 4.0, epsilon = 1e-12);

        for v in mesh.store_mut().vertices_mut() {
            v.position.z *= 3.0;
        }
        mesh.update_bounding_box();
        mesh.update_bvh().unwrap();

        assert_relative_eq!(mesh.bounding_box().max.z, 3.0);
        assert_relative_eq!(mesh.cast(&ray).unwrap().t(), 2.0, epsilon = 1e-12);
        assert_paths_agree(&mesh, &ray);
    }

    #[test]
    fn test_invalid_settings_keep_previous_bvh() {
        let mut mesh = cube();
        let bad = BvhSettings {
            max_leaf_faces: 0,
            max_depth: 10,
        };
        assert!(matches!(mesh.update_bvh_with(&bad), Err(Error::Raytrace(_))));
        assert!(mesh.bvh().is_some());
        assert_eq!(*mesh.bvh_settings(), BvhSettings::default());
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = Mesh::with_bvh(GeometryStore::new(), &BvhSettings::default()).unwrap();
        assert!(mesh.bounding_box().is_null());
        let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, 1.0));
        assert!(mesh.cast(&ray).is_none());
    }

    #[test]
    fn test_load_off() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.off");
        fs::write(
            &path,
            "OFF\n4 2 0\n-1 -1 0\n1 -1 0\n1 1 0\n-1 1 0\n3 0 1 2\n3 0 2 3\n",
        )
        .unwrap();

        let mesh = Mesh::load(&path, &BvhSettings::default()).unwrap();
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.num_vertices(), 4);
        assert!(mesh.bvh().is_some());
        assert_relative_eq!(mesh.vertex_of_face(0, 1).position, Point3::new(1.0, -1.0, 0.0));

        let ray = Ray::new(Point3::new(0.5, -0.5, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = mesh.cast(&ray).unwrap();
        assert_eq!(hit.face_id(), Some(0));
    }

    #[test]
    fn test_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.off");
        fs::write(&path, "OFF\n12 hello\n").unwrap();
        assert!(matches!(
            Mesh::load(&path, &BvhSettings::default()),
            Err(Error::Mesh(_))
        ));
    }
}
