//! Axis-aligned bounding boxes.

use meshpick_math::{Point3, Vec3};

/// Axis-aligned bounding box in 3D.
///
/// A freshly created box is *null*: it contains nothing and its corners are
/// inverted (`min = +inf`, `max = -inf`), so the first [`Aabb3::extend`]
/// collapses it onto that point. Once non-null, `min <= max` holds on every
/// axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an AABB from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// The null box.
    pub fn null() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Tightest box around a set of points (null if the set is empty).
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Self {
        let mut aabb = Self::null();
        for p in points {
            aabb.extend(p);
        }
        aabb
    }

    /// True if the box has not been extended by any point.
    pub fn is_null(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grow the box so it contains `p`.
    pub fn extend(&mut self, p: &Point3) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// Grow the box so it contains `other`. Merging a null box is a no-op.
    pub fn merge(&mut self, other: &Aabb3) {
        if other.is_null() {
            return;
        }
        self.extend(&other.min);
        self.extend(&other.max);
    }

    /// Union of two boxes.
    pub fn union(&self, other: &Aabb3) -> Aabb3 {
        let mut out = *self;
        out.merge(other);
        out
    }

    /// Center point.
    pub fn center(&self) -> Point3 {
        Point3::from((self.min.coords + self.max.coords) * 0.5)
    }

    /// `max - min`. Zero for a single point, negative for the null box.
    pub fn diagonal(&self) -> Vec3 {
        self.max - self.min
    }

    /// Index (0, 1, 2) of the axis along which the box is widest.
    ///
    /// Ties resolve to the lowest axis index.
    pub fn longest_axis(&self) -> usize {
        let d = self.diagonal();
        if d.x >= d.y && d.x >= d.z {
            0
        } else if d.y >= d.z {
            1
        } else {
            2
        }
    }

    /// True if `p` lies inside or on the boundary.
    pub fn contains_point(&self, p: &Point3) -> bool {
        (0..3).all(|i| self.min[i] <= p[i] && p[i] <= self.max[i])
    }

    /// True if `other` lies entirely inside this box. A null box is contained
    /// by anything.
    pub fn contains(&self, other: &Aabb3) -> bool {
        other.is_null() || (self.contains_point(&other.min) && self.contains_point(&other.max))
    }
}

impl Default for Aabb3 {
    fn default() -> Self {
        Self::null()
    }
}
