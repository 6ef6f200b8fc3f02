//! Frame orchestration
//!
//! The rest of the program never touches the pixel buffer directly. It opens
//! a frame with [`Renderer::clear`], sets the transform, submits triangles
//! and hands the finished buffer to the display with [`Renderer::present`].
//!
//! [`SoftwareRenderer`] is the scanline implementation.

use std::time::{Duration, Instant};
use smallvec::smallvec;

use super::clip::{classify, clip_near_plane, ClipTriangle, ClipVertex, Clipped};
use super::dither::fog_factor;
use super::framebuffer::Framebuffer;
use super::math::{mat_mul, transform_point, Mat4, Vec3};
use super::mesh::{Mesh, Triangle};
use super::scanline::{rasterize_triangle, Fog, Raster, ScanSettings, ScreenVertex, Shading};
use super::types::Texture;
use crate::config::RenderConfig;
use crate::error::{Error, Result};

/// Per-draw-call shading inputs
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DrawParams {
    /// Uniform brightness, stippled below 1.0
    pub brightness: Option<f32>,
    /// Uniform fog factor 0..1, ignored unless fog is configured
    pub fog_factor: Option<f32>,
}

/// Per-frame counters for the profiling overlay
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Triangles passed to `draw_triangle`
    pub submitted: u32,
    /// Triangles that reached the scanline loop
    pub drawn: u32,
    /// Back-facing or zero-area triangles
    pub culled: u32,
    /// Triangles with at least one vertex behind the near plane
    pub clipped: u32,
    /// Clipped triangles with nothing left in front of the near plane
    pub near_rejected: u32,
    /// Color writes
    pub pixels_written: u64,
    pub transform_time: Duration,
    pub raster_time: Duration,
}

/// A rendering back-end
pub trait Renderer {
    /// Open a frame: reset color, depth, stats and the active transform.
    /// Calling it again before `present` does nothing.
    fn clear(&mut self);

    /// Transform used by every following `draw_triangle` in this frame
    fn set_matrices(&mut self, mvp: &Mat4, camera_pos: Vec3);

    /// Transform, clip and rasterize one model-space triangle
    fn draw_triangle(&mut self, tri: &Triangle, texture: &Texture, params: &DrawParams) -> Result<()>;

    /// Finish the frame and **loan** the RGBA buffer to `submit`.
    fn present<F>(&mut self, submit: F)
    where
        F: FnOnce(&[u8], usize, usize);

    fn stats(&self) -> &FrameStats;
}

/// Convenience helpers on top of any [`Renderer`]
pub trait RendererExt: Renderer {
    /// Draw every triangle of `mesh` placed by `model`. A mesh with
    /// dangling face indices is refused before anything is drawn.
    fn draw_mesh(
        &mut self,
        mesh: &Mesh,
        model: &Mat4,
        view_proj: &Mat4,
        camera_pos: Vec3,
        texture: &Texture,
        params: &DrawParams,
    ) -> Result<()> {
        mesh.validate()?;
        self.set_matrices(&mat_mul(view_proj, model), camera_pos);
        for tri in mesh.triangles() {
            self.draw_triangle(&tri, texture, params)?;
        }
        Ok(())
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

/// Scanline software renderer
pub struct SoftwareRenderer {
    fb: Framebuffer,
    config: RenderConfig,
    settings: ScanSettings,
    mvp: Option<Mat4>,
    camera_pos: Vec3,
    frame_open: bool,
    frame_index: u64,
    stats: FrameStats,
}

impl SoftwareRenderer {
    pub fn new(config: RenderConfig) -> Result<Self> {
        config.validate()?;
        log::debug!(
            "software renderer {}x{}, perspective span {}, near w {}",
            config.width,
            config.height,
            config.perspective_span,
            config.near_w
        );
        Ok(Self {
            fb: Framebuffer::new(config.width, config.height),
            settings: config.scan_settings(),
            config,
            mvp: None,
            camera_pos: Vec3::ZERO,
            frame_open: false,
            frame_index: 0,
            stats: FrameStats::default(),
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Color and depth buffers, for presentation and debugging
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    pub fn camera_position(&self) -> Vec3 {
        self.camera_pos
    }

    /// Change the output size. Only allowed between frames.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        if self.frame_open {
            return Err(Error::InvalidConfig("cannot resize inside a frame".into()));
        }
        let mut config = self.config.clone();
        config.width = width;
        config.height = height;
        config.validate()?;
        self.config = config;
        self.fb.resize(width, height);
        Ok(())
    }

    /// Fog factor for a world-space point seen from `eye`, `None` when fog
    /// is not configured
    pub fn distance_fog(&self, eye: Vec3, point: Vec3) -> Option<f32> {
        self.config
            .fog
            .map(|fog| fog_factor((point - eye).len(), fog.start, fog.end))
    }

    fn shading(&self, params: &DrawParams) -> Shading {
        let fog = match (self.config.fog, params.fog_factor) {
            (Some(settings), Some(factor)) => Some(Fog {
                factor,
                color: settings.color,
            }),
            _ => None,
        };
        Shading {
            brightness: params.brightness,
            fog,
        }
    }
}

impl Renderer for SoftwareRenderer {
    fn clear(&mut self) {
        if self.frame_open {
            log::warn!("clear() called twice in frame {}, ignoring", self.frame_index);
            return;
        }
        self.fb.clear(self.config.clear_color);
        self.stats = FrameStats::default();
        self.mvp = None;
        self.frame_open = true;
    }

    fn set_matrices(&mut self, mvp: &Mat4, camera_pos: Vec3) {
        self.mvp = Some(*mvp);
        self.camera_pos = camera_pos;
    }

    fn draw_triangle(&mut self, tri: &Triangle, texture: &Texture, params: &DrawParams) -> Result<()> {
        if !self.frame_open {
            return Err(Error::FrameNotStarted);
        }
        let mvp = self.mvp.ok_or(Error::MatricesNotSet)?;
        self.stats.submitted += 1;

        // === TRANSFORM + CLIP ===
        let transform_start = Instant::now();

        let clip: ClipTriangle = tri
            .vertices
            .map(|v| ClipVertex::new(transform_point(&mvp, v.pos), v.uv));

        let near_w = self.config.near_w;
        let behind = classify(&clip, near_w);
        let pieces: Clipped = if behind.contains(&true) {
            self.stats.clipped += 1;
            let pieces = clip_near_plane(&clip, behind, near_w);
            log::trace!("near clip {:?} -> {} triangle(s)", behind, pieces.len());
            pieces
        } else {
            smallvec![clip]
        };

        self.stats.transform_time += transform_start.elapsed();

        if pieces.is_empty() {
            self.stats.near_rejected += 1;
            return Ok(());
        }

        // === RASTERIZE ===
        let raster_start = Instant::now();
        let shading = self.shading(params);
        let (width, height) = (self.fb.width, self.fb.height);
        let mut drawn = false;

        for piece in pieces {
            let verts = piece.map(|v| ScreenVertex::from_clip(&v, width, height, texture));
            if let Raster::Drawn { pixels } =
                rasterize_triangle(&mut self.fb, &verts, texture, &shading, &self.settings)
            {
                drawn = true;
                self.stats.pixels_written += pixels as u64;
            }
        }

        // Both halves of a split share one plane, so they cull together
        if drawn {
            self.stats.drawn += 1;
        } else {
            self.stats.culled += 1;
        }

        self.stats.raster_time += raster_start.elapsed();
        Ok(())
    }

    fn present<F>(&mut self, submit: F)
    where
        F: FnOnce(&[u8], usize, usize),
    {
        log::debug!(
            "frame {}: {} submitted, {} drawn, {} culled, {} clipped ({} rejected), {} px, transform {:?}, raster {:?}",
            self.frame_index,
            self.stats.submitted,
            self.stats.drawn,
            self.stats.culled,
            self.stats.clipped,
            self.stats.near_rejected,
            self.stats.pixels_written,
            self.stats.transform_time,
            self.stats.raster_time,
        );
        submit(&self.fb.pixels, self.fb.width, self.fb.height);
        self.frame_open = false;
        self.mvp = None;
        self.frame_index += 1;
    }

    fn stats(&self) -> &FrameStats {
        &self.stats
    }
}
