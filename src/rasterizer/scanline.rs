//! Scanline triangle rasterizer
//!
//! Edge-walking DDA over a Y-sorted triangle, split into an upper and a
//! lower trapezoid at the middle vertex. Every accumulator is pre-stepped
//! to the first integer row / column it lands on, so shared edges tile
//! exactly and vertices don't swim with sub-pixel motion.
//!
//! Fill rule: rows `ceil(top) .. ceil(bottom)` and columns
//! `ceil(left) .. ceil(right)`, both half-open. The bottom row and right
//! column of a triangle belong to its neighbour.
//!
//! Texture coordinates are recovered with a true divide every
//! `perspective_span` pixels and stepped linearly in between.

use std::ops::{Add, Mul, Sub};
use super::clip::ClipVertex;
use super::dither;
use super::framebuffer::Framebuffer;
use super::types::{Color, FrontFace, Texture};

/// Edges shorter than this (in rows) get no step
pub const EDGE_EPSILON: f32 = 1.0 / 256.0;
/// Spans narrower than this (in pixels) are skipped
pub const SPAN_EPSILON: f32 = 1.0 / 2048.0;

/// Vertex after perspective divide and viewport mapping.
///
/// Everything that must be perspective-correct is stored pre-divided by `w`
/// so it can be interpolated linearly in screen space. `u`/`v` are in
/// texel units. `z_w` is NDC depth and goes straight into the depth buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenVertex {
    pub x: f32,
    pub y: f32,
    pub inv_w: f32,
    pub u_w: f32,
    pub v_w: f32,
    pub z_w: f32,
}

impl ScreenVertex {
    /// Screen position plus raw `w`, `z` and texel-space `u`, `v`
    pub fn new(x: f32, y: f32, w: f32, z: f32, u: f32, v: f32) -> Self {
        let inv_w = 1.0 / w;
        Self {
            x,
            y,
            inv_w,
            u_w: u * inv_w,
            v_w: v * inv_w,
            z_w: z * inv_w,
        }
    }

    /// Perspective divide and viewport transform. `w` must be positive
    /// (run the near-plane clipper first).
    pub fn from_clip(v: &ClipVertex, width: usize, height: usize, texture: &Texture) -> Self {
        let inv_w = 1.0 / v.pos.w;
        let ndc_x = v.pos.x * inv_w;
        let ndc_y = v.pos.y * inv_w;

        Self {
            x: (ndc_x * 0.5 + 0.5) * width as f32,
            y: (0.5 - ndc_y * 0.5) * height as f32,
            inv_w,
            u_w: v.uv.x * texture.width as f32 * inv_w,
            v_w: v.uv.y * texture.height as f32 * inv_w,
            z_w: v.pos.z * inv_w,
        }
    }

    #[inline]
    fn varyings(&self) -> Varyings {
        Varyings {
            inv_w: self.inv_w,
            u_w: self.u_w,
            v_w: self.v_w,
            z_w: self.z_w,
        }
    }
}

/// Signed area of the screen triangle, positive when it runs clockwise on
/// the display (Y down).
#[inline]
pub fn signed_area(a: &ScreenVertex, b: &ScreenVertex, c: &ScreenVertex) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)
}

/// The screen-affine attribute set
#[derive(Debug, Clone, Copy, Default)]
struct Varyings {
    inv_w: f32,
    u_w: f32,
    v_w: f32,
    z_w: f32,
}

impl Varyings {
    /// Perspective-correct texel coordinates
    #[inline]
    fn uv(&self) -> (f32, f32) {
        let w = 1.0 / self.inv_w;
        (self.u_w * w, self.v_w * w)
    }
}

impl Add for Varyings {
    type Output = Varyings;
    #[inline]
    fn add(self, o: Varyings) -> Varyings {
        Varyings {
            inv_w: self.inv_w + o.inv_w,
            u_w: self.u_w + o.u_w,
            v_w: self.v_w + o.v_w,
            z_w: self.z_w + o.z_w,
        }
    }
}

impl Sub for Varyings {
    type Output = Varyings;
    #[inline]
    fn sub(self, o: Varyings) -> Varyings {
        Varyings {
            inv_w: self.inv_w - o.inv_w,
            u_w: self.u_w - o.u_w,
            v_w: self.v_w - o.v_w,
            z_w: self.z_w - o.z_w,
        }
    }
}

impl Mul<f32> for Varyings {
    type Output = Varyings;
    #[inline]
    fn mul(self, s: f32) -> Varyings {
        Varyings {
            inv_w: self.inv_w * s,
            u_w: self.u_w * s,
            v_w: self.v_w * s,
            z_w: self.z_w * s,
        }
    }
}

/// One walking edge: current X and attributes, plus their per-row steps
struct Edge {
    x: f32,
    var: Varyings,
    step_x: f32,
    step: Varyings,
}

impl Edge {
    /// Edge from `top` to `bottom`, pre-stepped to `first_row`
    fn new(top: &ScreenVertex, bottom: &ScreenVertex, first_row: i32) -> Self {
        let dy = bottom.y - top.y;
        if dy < EDGE_EPSILON {
            // At most one row crosses it: sample that row's point on the
            // edge instead of stepping
            let t = if dy > 0.0 {
                ((first_row as f32 - top.y) / dy).clamp(0.0, 1.0)
            } else {
                0.0
            };
            return Self {
                x: top.x + (bottom.x - top.x) * t,
                var: top.varyings() + (bottom.varyings() - top.varyings()) * t,
                step_x: 0.0,
                step: Varyings::default(),
            };
        }

        let inv_dy = 1.0 / dy;
        let step_x = (bottom.x - top.x) * inv_dy;
        let step = (bottom.varyings() - top.varyings()) * inv_dy;
        let prestep = first_row as f32 - top.y;

        Self {
            x: top.x + step_x * prestep,
            var: top.varyings() + step * prestep,
            step_x,
            step,
        }
    }

    #[inline]
    fn advance(&mut self) {
        self.x += self.step_x;
        self.var = self.var + self.step;
    }
}

/// Uniform per-triangle shading inputs
#[derive(Debug, Clone, Copy, Default)]
pub struct Shading {
    /// Stippled darkening, only applied below 1.0
    pub brightness: Option<f32>,
    pub fog: Option<Fog>,
}

#[derive(Debug, Clone, Copy)]
pub struct Fog {
    /// 0 = clear, 1 = fully fogged
    pub factor: f32,
    pub color: Color,
}

/// Rasterizer knobs that stay fixed across a frame
#[derive(Debug, Clone, Copy)]
pub struct ScanSettings {
    /// Pixels between true perspective divides (>= 1)
    pub perspective_span: usize,
    pub backface_cull: bool,
    pub front_face: FrontFace,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            perspective_span: 8,
            backface_cull: true,
            front_face: FrontFace::CounterClockwise,
        }
    }
}

/// What happened to a triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Raster {
    /// Back-facing or zero area, nothing touched
    Culled,
    /// Scanned; `pixels` color writes (may be 0 when off-screen or occluded)
    Drawn { pixels: usize },
}

/// Rasterize one near-plane-safe triangle into `fb`.
pub fn rasterize_triangle(
    fb: &mut Framebuffer,
    verts: &[ScreenVertex; 3],
    texture: &Texture,
    shading: &Shading,
    settings: &ScanSettings,
) -> Raster {
    // Winding is judged on submission order, before sorting
    let area = signed_area(&verts[0], &verts[1], &verts[2]);
    if area == 0.0 || !area.is_finite() {
        return Raster::Culled;
    }
    let facing = match settings.front_face {
        FrontFace::Clockwise => area,
        FrontFace::CounterClockwise => -area,
    };
    if settings.backface_cull && facing <= 0.0 {
        return Raster::Culled;
    }

    let mut sorted = [&verts[0], &verts[1], &verts[2]];
    sorted.sort_by(|p, q| p.y.total_cmp(&q.y));
    let [a, b, c] = sorted;

    // Row window in f32 so far off-screen vertices can't overflow the casts
    let first = a.y.ceil().max(0.0);
    let last = (c.y.ceil() - 1.0).min(fb.height as f32 - 1.0);
    if first > last {
        return Raster::Drawn { pixels: 0 };
    }
    let (y_first, y_last) = (first as i32, last as i32);
    let knee = b.y.ceil().clamp(first, last + 1.0) as i32;

    let span = SpanContext {
        texture,
        shading,
        perspective_span: settings.perspective_span.max(1) as i32,
    };
    let mut pixels = 0;

    let mut major = Edge::new(a, c, y_first);

    // Upper trapezoid: A -> C against A -> B
    let mut minor = Edge::new(a, b, y_first);
    for y in y_first..knee {
        pixels += span.draw(fb, y, &major, &minor);
        major.advance();
        minor.advance();
    }

    // Lower trapezoid: A -> C against B -> C
    let mut minor = Edge::new(b, c, knee);
    for y in knee..=y_last {
        pixels += span.draw(fb, y, &major, &minor);
        major.advance();
        minor.advance();
    }

    Raster::Drawn { pixels }
}

struct SpanContext<'a> {
    texture: &'a Texture,
    shading: &'a Shading,
    perspective_span: i32,
}

impl SpanContext<'_> {
    /// Fill row `y` between the two edges, returns color writes.
    fn draw(&self, fb: &mut Framebuffer, y: i32, e0: &Edge, e1: &Edge) -> usize {
        let (left, right) = if e0.x <= e1.x { (e0, e1) } else { (e1, e0) };

        let dx = right.x - left.x;
        if dx < SPAN_EPSILON {
            return 0;
        }

        let step = (right.var - left.var) * (1.0 / dx);
        let x_first = (left.x.ceil() as i32).max(0);
        let x_end = (right.x.ceil() as i32).min(fb.width as i32);
        if x_first >= x_end {
            return 0;
        }

        let row = y as usize;
        let row_base = row * fb.width;
        let mut written = 0;

        let mut anchor = left.var + step * (x_first as f32 - left.x);
        let (mut u, mut v) = anchor.uv();
        let mut x = x_first;

        while x < x_end {
            let n = self.perspective_span.min(x_end - x);
            let next = anchor + step * n as f32;
            let (u_next, v_next) = next.uv();
            let inv_n = 1.0 / n as f32;
            let du = (u_next - u) * inv_n;
            let dv = (v_next - v) * inv_n;
            let mut z = anchor.z_w;

            for _ in 0..n {
                let idx = row_base + x as usize;
                // Depth is committed before the color is known
                if fb.test_and_set_depth(idx, z) {
                    if let Some(color) = self.shade(u, v, x as usize, row) {
                        fb.put_color(idx, color);
                        written += 1;
                    }
                }
                z += step.z_w;
                u += du;
                v += dv;
                x += 1;
            }

            anchor = next;
            u = u_next;
            v = v_next;
        }

        written
    }

    /// Texel fetch plus the dithered effects. `None` discards the pixel.
    #[inline]
    fn shade(&self, u: f32, v: f32, x: usize, y: usize) -> Option<Color> {
        let texel = self
            .texture
            .texel_wrapped(u.floor() as i32, v.floor() as i32);
        if texel.is_key() {
            return None;
        }

        if let Some(brightness) = self.shading.brightness {
            if brightness < 1.0 && !dither::brightness_keeps(brightness, x, y) {
                return None;
            }
        }

        if let Some(fog) = self.shading.fog {
            if dither::fog_replaces(fog.factor, x, y) {
                return Some(fog.color);
            }
        }

        Some(texel)
    }
}
