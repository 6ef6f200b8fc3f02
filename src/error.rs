//! Crate-wide error type

use thiserror::Error;

/// Everything that can go wrong outside the per-pixel hot path.
///
/// Degenerate geometry is not an error: back faces, slivers and triangles
/// behind the camera are dropped silently and show up in `FrameStats`.
#[derive(Error, Debug)]
pub enum Error {
    /// A triangle was submitted before `clear()` opened a frame.
    #[error("draw call outside a frame: call clear() first")]
    FrameNotStarted,

    /// A triangle was submitted before `set_matrices()` in this frame.
    #[error("no transform set for this frame: call set_matrices() first")]
    MatricesNotSet,

    /// Wrapping uses a bitmask, so both dimensions must be powers of two.
    #[error("texture size {width}x{height} is not a power of two")]
    NonPowerOfTwo { width: usize, height: usize },

    #[error("texture expects {expected} pixels, got {actual}")]
    TextureSize { expected: usize, actual: usize },

    /// A mesh face names a vertex that does not exist.
    #[error("face {face} uses vertex {index}, mesh has {vertex_count}")]
    FaceIndex { face: usize, index: usize, vertex_count: usize },

    #[error("invalid render config: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("serialize error: {0}")]
    Serialize(#[from] ron::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
