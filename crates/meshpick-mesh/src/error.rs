//! Error types for mesh loading and validation.

use thiserror::Error;

/// Errors that can occur while loading or validating a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file extension does not name a supported format.
    #[error("extension '{0}' not supported")]
    UnsupportedExtension(String),

    /// Malformed file contents (bad header, truncated data, bad number).
    #[error("format error at line {line}: {message}")]
    Format {
        /// Line number (1-indexed) where the problem was detected.
        line: usize,
        /// Error message.
        message: String,
    },

    /// OBJ parser failure.
    #[error("OBJ load failed: {0}")]
    Obj(#[from] tobj::LoadError),

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        /// Face id.
        face: usize,
        /// Offending vertex index.
        index: u32,
        /// Number of vertices in the store.
        vertex_count: usize,
    },

    /// A face that should be a triangle has a different number of corners.
    #[error("face {face} has {arity} corners, only triangles are supported")]
    NonTriangularFace {
        /// Face id.
        face: usize,
        /// Number of corners found.
        arity: usize,
    },
}

impl MeshError {
    /// Create a format error.
    pub fn format(line: usize, message: impl Into<String>) -> Self {
        Self::Format {
            line,
            message: message.into(),
        }
    }

    /// True for errors about the file itself (unreadable, unsupported or malformed).
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::UnsupportedExtension(_) | Self::Format { .. } | Self::Obj(_)
        )
    }

    /// True for errors about inconsistent geometry in an otherwise readable file.
    pub fn is_geometry_error(&self) -> bool {
        matches!(
            self,
            Self::FaceIndexOutOfRange { .. } | Self::NonTriangularFace { .. }
        )
    }
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;
