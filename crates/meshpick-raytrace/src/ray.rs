//! Ray representation.

use meshpick_math::{Point3, Vec3};

/// A ray `origin + t * direction`.
///
/// The direction is kept as given: it need not be unit length, and `t`
/// values reported for the ray are measured in multiples of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Point3,
    direction: Vec3,
    /// Reciprocal of the direction components, for slab tests.
    inv_direction: Vec3,
    /// Per axis: 1 if the direction component is negative, else 0.
    sign: [usize; 3],
}

impl Ray {
    /// Create a ray from an origin and a direction.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        let inv_direction = Vec3::new(1.0 / direction.x, 1.0 / direction.y, 1.0 / direction.z);
        let sign = [
            usize::from(inv_direction.x < 0.0),
            usize::from(inv_direction.y < 0.0),
            usize::from(inv_direction.z < 0.0),
        ];
        Self {
            origin,
            direction,
            inv_direction,
            sign,
        }
    }

    /// Ray from `from` through `to`; `to` sits at `t = 1`.
    pub fn through(from: Point3, to: Point3) -> Self {
        Self::new(from, to - from)
    }

    /// Origin point.
    #[inline]
    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Direction vector.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    pub(crate) fn inv_direction(&self) -> &Vec3 {
        &self.inv_direction
    }

    #[inline]
    pub(crate) fn sign(&self) -> &[usize; 3] {
        &self.sign
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction
    }
}
