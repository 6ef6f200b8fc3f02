//! Ordered (Bayer) dithering for brightness, fog and fades
//!
//! Nothing here blends. Every effect is a per-pixel keep/discard or
//! keep/replace decision against the 4x4 threshold pattern, which gives the
//! stippled look instead of smooth gradients.

/// 4x4 Bayer index matrix, `[row][col]`
const BAYER_4X4: [[u8; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

/// Threshold in `[0, 15/16]` for screen pixel `(x, y)`
#[inline]
pub fn threshold(x: usize, y: usize) -> f32 {
    BAYER_4X4[y & 3][x & 3] as f32 * (1.0 / 16.0)
}

/// Brightness stipple: the pixel is discarded only where `brightness` is
/// below the threshold, so `b` keeps `floor(16 b) + 1` of every 16 pixels
/// (0 still keeps one). Callers skip this entirely for brightness >= 1.
#[inline]
pub fn brightness_keeps(brightness: f32, x: usize, y: usize) -> bool {
    brightness >= threshold(x, y)
}

/// Fog stipple: the pixel is replaced by the fog color when `factor` is
/// above the threshold.
#[inline]
pub fn fog_replaces(factor: f32, x: usize, y: usize) -> bool {
    factor > threshold(x, y)
}

/// Linear depth cue: 0 up to `start`, 1 from `end` on.
pub fn fog_factor(distance: f32, start: f32, end: f32) -> f32 {
    if distance <= start {
        0.0
    } else if end <= start {
        1.0
    } else {
        ((distance - start) / (end - start)).min(1.0)
    }
}
