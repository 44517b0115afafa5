//! Perspective camera and screen-space picking.

use meshpick_math::{Mat3, Mat4, Point3, Vec3};
use meshpick_raytrace::{Hit, Ray};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::Mesh;

/// Camera placement, lens and viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Eye position.
    pub eye: Point3,
    /// Point the camera looks at.
    pub target: Point3,
    /// Up direction.
    pub up: Vec3,
    /// Vertical field of view (radians).
    pub fovy: f64,
    /// Near clipping distance.
    pub near: f64,
    /// Far clipping distance.
    pub far: f64,
    /// Viewport width (pixels).
    pub width: u32,
    /// Viewport height (pixels).
    pub height: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            eye: Point3::new(0.0, -6.0, 8.0),
            target: Point3::origin(),
            up: Vec3::new(0.0, 0.0, 1.0),
            fovy: std::f64::consts::FRAC_PI_3,
            near: 0.3,
            far: 20000.0,
            width: 800,
            height: 600,
        }
    }
}

impl CameraSettings {
    /// Check that the lens describes a usable perspective projection.
    pub fn validate(&self) -> Result<()> {
        if !(self.fovy.is_finite() && self.fovy > 0.0 && self.fovy < std::f64::consts::PI) {
            return Err(Error::InvalidCamera(format!(
                "fovy must lie in (0, pi), got {}",
                self.fovy
            )));
        }
        if !(self.near.is_finite() && self.near > 0.0) {
            return Err(Error::InvalidCamera(format!(
                "near must be positive, got {}",
                self.near
            )));
        }
        if !(self.far.is_finite() && self.far - self.near > f64::EPSILON * self.far) {
            return Err(Error::InvalidCamera(format!(
                "far ({}) must be greater than near ({})",
                self.far, self.near
            )));
        }
        Ok(())
    }
}

/// A perspective camera with cached view and projection matrices.
#[derive(Debug, Clone)]
pub struct Camera {
    settings: CameraSettings,
    view: Mat4,
    projection: Mat4,
}

impl Camera {
    /// Create a camera from its settings.
    ///
    /// # Panics
    ///
    /// Panics if `near` and `far` are equal. Settings that pass
    /// [`CameraSettings::validate`] never panic.
    pub fn new(settings: CameraSettings) -> Self {
        let view = Mat4::look_at_rh(&settings.eye, &settings.target, &settings.up);
        let projection = Mat4::new_perspective(
            settings.width.max(1) as f64 / settings.height.max(1) as f64,
            settings.fovy,
            settings.near,
            settings.far,
        );
        Self {
            settings,
            view,
            projection,
        }
    }

    /// Current settings.
    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// World-to-camera matrix.
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view
    }

    /// Camera-to-clip matrix.
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection
    }

    /// Eye position.
    pub fn position(&self) -> Point3 {
        self.settings.eye
    }

    /// Move the camera.
    pub fn look_at(&mut self, eye: Point3, target: Point3, up: Vec3) {
        self.settings.eye = eye;
        self.settings.target = target;
        self.settings.up = up;
        *self = Self::new(self.settings.clone());
    }

    /// Change the viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.settings.width = width;
        self.settings.height = height;
        *self = Self::new(self.settings.clone());
    }

    /// World-space ray through the center of pixel `(px, py)`, with `y`
    /// growing downwards from the top-left corner.
    ///
    /// The ray starts at the eye. Its direction is not normalized: it
    /// reaches the `z = -1` plane of camera space at `t = 1`. Returns `None`
    /// when the matrices are singular.
    pub fn pick_ray(&self, px: f64, py: f64) -> Option<Ray> {
        let p = &self.projection;
        #[rustfmt::skip]
        let proj3 = Mat3::new(
            p[(0, 0)], p[(0, 1)], p[(0, 2)],
            p[(1, 0)], p[(1, 1)], p[(1, 2)],
            p[(3, 0)], p[(3, 1)], p[(3, 2)],
        );
        let camera_to_world = self.view.try_inverse()?;

        let w = self.settings.width.max(1) as f64;
        let h = self.settings.height.max(1) as f64;
        let q = Vec3::new(
            2.0 * (px + 0.5) / w - 1.0,
            -(2.0 * (py + 0.5) / h - 1.0),
            1.0,
        );

        let direction = camera_to_world.fixed_view::<3, 3>(0, 0) * (proj3.try_inverse()? * q);
        if !direction.iter().all(|c| c.is_finite()) {
            return None;
        }
        let origin = Point3::new(
            camera_to_world[(0, 3)],
            camera_to_world[(1, 3)],
            camera_to_world[(2, 3)],
        );
        Some(Ray::new(origin, direction))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraSettings::default())
    }
}

/// Closest hit under pixel `(px, py)`.
pub fn pick(mesh: &Mesh, camera: &Camera, px: f64, py: f64) -> Option<Hit> {
    let ray = camera.pick_ray(px, py)?;
    mesh.cast(&ray)
}
