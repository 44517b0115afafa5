//! Closest-hit accumulator.

use meshpick_math::{Point3, Vec3};

/// The best intersection found so far along a ray.
///
/// A `Hit` starts empty with `t = +inf` (or a caller-chosen maximum
/// distance) and is threaded by `&mut` through every intersection routine.
/// Each routine overwrites it only with a strictly closer intersection, so
/// after the outermost call it holds the closest one, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    t: f64,
    face_id: Option<usize>,
    bary_coords: Vec3,
    point: Point3,
}

impl Hit {
    /// An empty hit that accepts intersections at any distance.
    pub fn new() -> Self {
        Self::with_max_distance(f64::INFINITY)
    }

    /// An empty hit that only accepts intersections with `t < t_max`.
    pub fn with_max_distance(t_max: f64) -> Self {
        Self {
            t: t_max,
            face_id: None,
            bary_coords: Vec3::zeros(),
            point: Point3::origin(),
        }
    }

    /// True once an intersection has been recorded.
    pub fn is_hit(&self) -> bool {
        self.face_id.is_some()
    }

    /// Ray parameter of the recorded intersection, or the initial bound.
    pub fn t(&self) -> f64 {
        self.t
    }

    /// Id of the face that was hit.
    pub fn face_id(&self) -> Option<usize> {
        self.face_id
    }

    /// Barycentric weights `(w0, w1, w2)` of the hit point with respect to
    /// the face's three corners, in face order. They sum to one.
    pub fn bary_coords(&self) -> Vec3 {
        self.bary_coords
    }

    /// World-space intersection point.
    pub fn intersection_point(&self) -> Point3 {
        self.point
    }

    /// Overwrite with a new intersection.
    pub(crate) fn record(&mut self, t: f64, face_id: usize, bary_coords: Vec3, point: Point3) {
        self.t = t;
        self.face_id = Some(face_id);
        self.bary_coords = bary_coords;
        self.point = point;
    }
}

impl Default for Hit {
    fn default() -> Self {
        Self::new()
    }
}
