//! Stipple: dithered scanline software rasterizer
//!
//! Renders textured triangles into an RGBA framebuffer on the CPU:
//! - Perspective-correct texturing with a configurable divide interval
//! - Near-plane clipping, strict Z-buffer, configurable back-face culling
//! - Ordered 4x4 Bayer dithering for brightness and fog instead of blending
//!
//! Typical frame:
//!
//! ```no_run
//! use stipple::config::RenderConfig;
//! use stipple::rasterizer::*;
//!
//! # fn main() -> stipple::Result<()> {
//! let mut renderer = SoftwareRenderer::new(RenderConfig::default())?;
//! let texture = Texture::checkerboard(16, 8, Color::WHITE, Color::RED)?;
//! let cube = Mesh::unit_cube();
//! let proj = perspective(60f32.to_radians(), 4.0 / 3.0, 0.1, 100.0);
//! let eye = Vec3::new(0.0, 0.0, 3.0);
//! let view = look_at(eye, Vec3::ZERO, Vec3::UP);
//!
//! renderer.clear();
//! renderer.draw_mesh(&cube, &mat4_identity(), &mat_mul(&proj, &view), eye, &texture, &DrawParams::default())?;
//! renderer.present(|_rgba, _width, _height| {
//!     // hand the RGBA bytes to the display
//! });
//! # Ok(())
//! # }
//! ```

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod error;
pub mod palette;
pub mod rasterizer;

pub use error::{Error, Result};
