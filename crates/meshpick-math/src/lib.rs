#![warn(missing_docs)]

//! Math types for meshpick.
//!
//! Thin aliases over nalgebra for the quantities the mesh and ray
//! code passes around (positions, directions, colors, texture
//! coordinates), an affine [`Transform`] for editing geometry, and
//! the [`Tolerance`] used by degeneracy checks.

use nalgebra::{Matrix3, Matrix4, Unit, Vector2, Vector3, Vector4};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A 2D vector, used for texture coordinates.
pub type Vec2 = Vector2<f64>;

/// A 4-component vector, used for RGBA colors.
pub type Vec4 = Vector4<f64>;

/// A 3x3 matrix.
pub type Mat3 = Matrix3<f64>;

/// A 4x4 homogeneous matrix.
pub type Mat4 = Matrix4<f64>;

/// An affine transform stored as a homogeneous 4x4 matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Mat4,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Mat4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            matrix: Mat4::new_translation(&Vec3::new(dx, dy, dz)),
        }
    }

    /// Non-uniform scale by `(sx, sy, sz)`.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            matrix: Mat4::new_nonuniform_scaling(&Vec3::new(sx, sy, sz)),
        }
    }

    /// Rotation about an axis through the origin by `angle` radians.
    pub fn rotation(axis: &Dir3, angle: f64) -> Self {
        Self {
            matrix: Mat4::from_axis_angle(axis, angle),
        }
    }

    /// `self` applied after `other` (matrix product `self * other`).
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        self.matrix.transform_point(p)
    }

    /// Transform a direction (translation is ignored).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        self.matrix.transform_vector(v)
    }

    /// Transform a surface normal with the inverse transpose of the linear part.
    ///
    /// The result is not re-normalized.
    pub fn apply_normal(&self, n: &Vec3) -> Vec3 {
        let linear: Mat3 = self.matrix.fixed_view::<3, 3>(0, 0).into_owned();
        match linear.try_inverse() {
            Some(inv) => inv.transpose() * n,
            None => *n,
        }
    }

    /// Inverse of this transform, if it exists.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Tolerances for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Area tolerance below which a triangle counts as degenerate.
    pub area: f64,
}

impl Tolerance {
    /// Default tolerance (1e-12 area).
    pub const DEFAULT: Self = Self { area: 1e-12 };

    /// Check if the triangle `(a, b, c)` has (almost) no area.
    pub fn is_degenerate_triangle(&self, a: &Point3, b: &Point3, c: &Point3) -> bool {
        0.5 * (b - a).cross(&(c - a)).norm() < self.area
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
