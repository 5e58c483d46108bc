//! Error types for session setup.
//!
//! Only caller contract violations are errors. Misses and other degenerate
//! geometric outcomes are ordinary data inside the trace loop.

use thiserror::Error;

/// Reasons a render session cannot be started.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Trace depth must allow at least one bounce
    #[error("trace depth must be at least 1")]
    ZeroTraceDepth,

    /// Camera resolution has no pixels
    #[error("image resolution {width}x{height} has no pixels")]
    EmptyImage { width: u32, height: u32 },

    /// Resolution overflows the pixel index type
    #[error("image resolution {width}x{height} is too large")]
    ImageTooLarge { width: u32, height: u32 },

    /// Geometry exists but nothing can shade it
    #[error("scene has geometry but no materials")]
    NoMaterials,

    /// A primitive refers past the material table
    #[error("{kind} {index} uses material {material_id}, but only {count} materials exist")]
    MissingMaterial {
        kind: &'static str,
        index: usize,
        material_id: usize,
        count: usize,
    },

    /// A bounding volume refers past the triangle table
    #[error("bounding volume {node} covers triangles {start}..{end}, but only {count} exist")]
    TriangleRangeOutOfBounds {
        node: usize,
        start: usize,
        end: usize,
        count: usize,
    },

    /// A primitive transform cannot be inverted
    #[error("{kind} {index} has a degenerate transform")]
    DegenerateTransform { kind: &'static str, index: usize },

    /// Material parameters out of physical range
    #[error("material {material_id} is invalid: {reason}")]
    InvalidMaterial { material_id: usize, reason: String },

    /// Camera basis or footprint unusable
    #[error("invalid camera: {0}")]
    InvalidCamera(String),

    /// Lens parameters unusable while depth of field is on
    #[error("invalid lens: {0}")]
    InvalidLens(String),
}

/// Result type alias for session setup.
pub type Result<T> = std::result::Result<T, RenderError>;
