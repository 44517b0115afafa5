//! Error types for ray casting.

use thiserror::Error;

/// Errors that can occur while preparing ray queries.
#[derive(Error, Debug)]
pub enum RaytraceError {
    /// Invalid BVH build settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Result type for ray casting operations.
pub type Result<T> = std::result::Result<T, RaytraceError>;
