//! Error type for the meshpick facade.

use meshpick_mesh::MeshError;
use meshpick_raytrace::RaytraceError;
use thiserror::Error;

/// Errors returned while loading meshes, building their acceleration
/// structure or checking camera settings.
#[derive(Error, Debug)]
pub enum Error {
    /// Loading or validating the geometry failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),
    /// Building the BVH failed.
    #[error(transparent)]
    Raytrace(#[from] RaytraceError),
    /// Camera settings that cannot form a projection.
    #[error("invalid camera settings: {0}")]
    InvalidCamera(String),
}

/// Result type for meshpick operations.
pub type Result<T> = std::result::Result<T, Error>;
