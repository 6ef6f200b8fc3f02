//! Near-plane clipping in homogeneous clip space
//!
//! Only the near plane is clipped. Side planes are handled by integer
//! scissoring in the rasterizer and the far plane by the depth test.

use smallvec::{smallvec, SmallVec};
use super::math::{Vec2, Vec4};

/// Default `w` threshold. A vertex with `w <= NEAR_W` is behind the near plane.
pub const NEAR_W: f32 = 0.01;

/// Below this `|Δw|` an edge is treated as parallel to the near plane.
const MIN_W_DELTA: f32 = 1e-6;

/// Clip-space vertex with its texture coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClipVertex {
    pub pos: Vec4,
    pub uv: Vec2,
}

impl ClipVertex {
    pub fn new(pos: Vec4, uv: Vec2) -> Self {
        Self { pos, uv }
    }
}

pub type ClipTriangle = [ClipVertex; 3];

/// Up to two triangles, no heap allocation
pub type Clipped = SmallVec<[ClipTriangle; 2]>;

/// Behind-the-near-plane flag per vertex
pub fn classify(tri: &ClipTriangle, near_w: f32) -> [bool; 3] {
    [
        tri[0].pos.w <= near_w,
        tri[1].pos.w <= near_w,
        tri[2].pos.w <= near_w,
    ]
}

/// Point where the edge `inside -> outside` crosses `w = near_w`.
/// Position and UV share the same parameter.
fn intersect(inside: &ClipVertex, outside: &ClipVertex, near_w: f32) -> ClipVertex {
    let dw = outside.pos.w - inside.pos.w;
    let t = if dw.abs() < MIN_W_DELTA {
        0.0
    } else {
        ((near_w - inside.pos.w) / dw).clamp(0.0, 1.0)
    };

    let mut pos = inside.pos.lerp(outside.pos, t);
    pos.w = near_w;
    ClipVertex {
        pos,
        uv: inside.uv.lerp(outside.uv, t),
    }
}

/// Clip a triangle against the near plane.
///
/// Returns 0, 1 or 2 triangles. Every output vertex has `w >= near_w` and
/// the input winding is preserved.
pub fn clip_near_plane(tri: &ClipTriangle, behind: [bool; 3], near_w: f32) -> Clipped {
    let count = behind.iter().filter(|&&b| b).count();

    match count {
        0 => smallvec![*tri],
        3 => SmallVec::new(),
        1 => {
            // p is behind, walk on in the original order p -> a -> b
            let i = behind.iter().position(|&b| b).unwrap_or(0);
            let p = &tri[i];
            let a = tri[(i + 1) % 3];
            let b = tri[(i + 2) % 3];

            let pa = intersect(&a, p, near_w);
            let pb = intersect(&b, p, near_w);

            // quad pa, a, b, pb
            smallvec![[pa, a, b], [pa, b, pb]]
        }
        _ => {
            let i = behind.iter().position(|&b| !b).unwrap_or(0);
            let f = tri[i];
            let a = &tri[(i + 1) % 3];
            let b = &tri[(i + 2) % 3];

            smallvec![[f, intersect(&f, a, near_w), intersect(&f, b, near_w)]]
        }
    }
}
