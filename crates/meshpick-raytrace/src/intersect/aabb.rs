//! Ray-box slab test.

use meshpick_math::Vec3;
use meshpick_mesh::Aabb3;

use crate::Ray;

/// Where a ray crosses an axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxHit {
    /// Entry parameter. Negative when the origin is inside the box.
    pub t_min: f64,
    /// Exit parameter.
    pub t_max: f64,
    /// Outward unit normal of the entry face, zero if no slab bounded the entry.
    pub normal: Vec3,
}

/// Intersect a ray with an axis-aligned box using the slab method.
///
/// Each axis narrows `[t_min, t_max]` to the parameter interval between its
/// two planes. The ray misses when the interval becomes empty or lies
/// entirely behind the origin. Axes where the ray is parallel to the slab
/// yield infinite bounds (or NaN when the origin lies exactly on a plane),
/// and NaN bounds are ignored by the comparisons.
#[inline]
pub fn intersect_box(ray: &Ray, aabb: &Aabb3) -> Option<BoxHit> {
    let bounds = [aabb.min, aabb.max];
    let origin = ray.origin();
    let inv = ray.inv_direction();
    let sign = ray.sign();

    let mut t_min = f64::NEG_INFINITY;
    let mut t_max = f64::INFINITY;
    let mut entry_axis = None;

    for axis in 0..3 {
        let near = (bounds[sign[axis]][axis] - origin[axis]) * inv[axis];
        let far = (bounds[1 - sign[axis]][axis] - origin[axis]) * inv[axis];

        if near > t_min {
            t_min = near;
            entry_axis = Some(axis);
        }
        if far < t_max {
            t_max = far;
        }
        if t_min > t_max {
            return None;
        }
    }

    if t_max < 0.0 {
        return None;
    }

    let mut normal = Vec3::zeros();
    if let Some(axis) = entry_axis {
        normal[axis] = if sign[axis] == 0 { -1.0 } else { 1.0 };
    }

    Some(BoxHit {
        t_min,
        t_max,
        normal,
    })
}
