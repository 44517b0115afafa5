//! Ray-triangle intersection.

use meshpick_math::{Point3, Vec3};

use crate::{Hit, Ray};

/// Intersect a ray with one triangle and refine `hit` if it is closer.
///
/// Solves `o + t*d = v0 + u*(v1 - v0) + v*(v2 - v0)` for `(t, u, v)` by
/// Cramer's rule. The intersection is accepted when `t > 0`, `u >= 0`,
/// `v >= 0`, `u + v <= 1` and `t < hit.t()`; then `hit` is overwritten
/// and `true` is returned. Otherwise `hit` is left untouched.
///
/// A triangle parallel to the ray, or with zero area, makes the system
/// singular. The resulting infinities and NaNs fail the tests above, so
/// such triangles are never reported.
pub fn intersect_triangle(ray: &Ray, tri: &[Point3; 3], face_id: usize, hit: &mut Hit) -> bool {
    let d = ray.direction();
    let e1 = tri[1] - tri[0];
    let e2 = tri[2] - tri[0];
    let b = ray.origin() - tri[0];

    // det [-d, e1, e2] = -d . (e1 x e2)
    let n = e1.cross(&e2);
    let det = -d.dot(&n);

    let t = b.dot(&n) / det;
    let u = -d.dot(&b.cross(&e2)) / det;
    let v = -d.dot(&e1.cross(&b)) / det;

    if !(t > 0.0 && u >= 0.0 && v >= 0.0 && u + v <= 1.0 && t < hit.t()) {
        return false;
    }

    hit.record(t, face_id, Vec3::new(1.0 - u - v, u, v), ray.at(t));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn xy_triangle() -> [Point3; 3] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_hit_inside() {
        let ray = Ray::new(Point3::new(0.25, 0.25, 2.0), Vec3::new(0.0, 0.0, -1.0));
        let mut hit = Hit::new();
        assert!(intersect_triangle(&ray, &xy_triangle(), 4, &mut hit));
        assert_relative_eq!(hit.t(), 2.0, epsilon = 1e-12);
        assert_eq!(hit.face_id(), Some(4));
        assert_relative_eq!(
            hit.intersection_point(),
            Point3::new(0.25, 0.25, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_barycentric_weights_reproduce_point() {
        let tri = [
            Point3::new(1.0, 0.0, 2.0),
            Point3::new(3.0, 1.0, 2.5),
            Point3::new(0.5, 4.0, 1.0),
        ];
        let target = Point3::from(0.2 * tri[0].coords + 0.5 * tri[1].coords + 0.3 * tri[2].coords);
        let ray = Ray::through(Point3::new(-2.0, -1.0, 9.0), target);

        let mut hit = Hit::new();
        assert!(intersect_triangle(&ray, &tri, 0, &mut hit));

        let w = hit.bary_coords();
        assert_relative_eq!(w.sum(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(w, Vec3::new(0.2, 0.5, 0.3), epsilon = 1e-9);
        assert_relative_eq!(hit.t(), 1.0, epsilon = 1e-9);

        let p = Point3::from(w.x * tri[0].coords + w.y * tri[1].coords + w.z * tri[2].coords);
        assert_relative_eq!(p, hit.intersection_point(), epsilon = 1e-9);
    }

    #[test]
    fn test_back_face_is_hit() {
        let ray = Ray::new(Point3::new(0.25, 0.25, -1.0), Vec3::new(0.0, 0.0, 1.0));
        let mut hit = Hit::new();
        assert!(intersect_triangle(&ray, &xy_triangle(), 0, &mut hit));
        assert_relative_eq!(hit.t(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_miss_outside() {
        let ray = Ray::new(Point3::new(0.8, 0.8, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let mut hit = Hit::new();
        assert!(!intersect_triangle(&ray, &xy_triangle(), 0, &mut hit));
        assert!(!hit.is_hit());
    }

    #[test]
    fn test_behind_origin() {
        let ray = Ray::new(Point3::new(0.25, 0.25, 1.0), Vec3::new(0.0, 0.0, 1.0));
        let mut hit = Hit::new();
        assert!(!intersect_triangle(&ray, &xy_triangle(), 0, &mut hit));
    }

    #[test]
    fn test_farther_hit_leaves_record() {
        let ray = Ray::new(Point3::new(0.25, 0.25, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let mut hit = Hit::with_max_distance(3.0);
        assert!(!intersect_triangle(&ray, &xy_triangle(), 0, &mut hit));
        assert_eq!(hit.t(), 3.0);

        let near = [
            Point3::new(0.0, 0.0, 4.0),
            Point3::new(1.0, 0.0, 4.0),
            Point3::new(0.0, 1.0, 4.0),
        ];
        let mut hit = Hit::new();
        assert!(intersect_triangle(&ray, &near, 1, &mut hit));
        assert!(!intersect_triangle(&ray, &xy_triangle(), 0, &mut hit));
        assert_eq!(hit.face_id(), Some(1));
        assert_relative_eq!(hit.t(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parallel_ray_misses() {
        let ray = Ray::new(Point3::new(-1.0, 0.25, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let mut hit = Hit::new();
        assert!(!intersect_triangle(&ray, &xy_triangle(), 0, &mut hit));
    }

    #[test]
    fn test_degenerate_triangle_misses() {
        let tri = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let ray = Ray::new(Point3::new(0.5, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let mut hit = Hit::new();
        assert!(!intersect_triangle(&ray, &tri, 0, &mut hit));
        assert!(!hit.is_hit());
    }

    #[test]
    fn test_edge_is_inclusive() {
        let ray = Ray::new(Point3::new(0.5, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let mut hit = Hit::new();
        assert!(intersect_triangle(&ray, &xy_triangle(), 0, &mut hit));
    }
}
