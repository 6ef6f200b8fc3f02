//! Dithered software rasterizer
//!
//! Features:
//! - Scanline DDA with a top-left style fill rule (shared edges tile exactly)
//! - Perspective-correct texturing, true divide every N pixels
//! - Near-plane clipping in clip space
//! - Strict less-than Z-buffer
//! - 4x4 Bayer stipple for brightness and fog (no blending)

mod clip;
mod dither;
mod framebuffer;
mod math;
mod mesh;
mod render;
mod scanline;
mod types;

pub use clip::*;
pub use dither::*;
pub use framebuffer::*;
pub use math::*;
pub use mesh::*;
pub use render::*;
pub use scanline::*;
pub use types::*;

/// Default framebuffer dimensions
pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 240;
