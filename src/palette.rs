//! 32-colour palette with a baked shadow ramp
//!
//! Shading in a palette world is a table lookup: each colour has eight
//! darker steps, each step itself a palette entry. [`shadow_lut`] bakes the
//! table into a texture (column = colour, row = shadow level) so a textured
//! draw can pick shaded colours with plain UVs.

use crate::error::Result;
use crate::rasterizer::{Color, Texture};

pub const PALETTE_SIZE: usize = 32;
pub const SHADOW_LEVELS: usize = 8;

const fn rgb(hex: u32) -> Color {
    Color::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

pub const PALETTE: [Color; PALETTE_SIZE] = [
    rgb(0x000000), rgb(0x1d2b53), rgb(0x7e2553), rgb(0x008751),
    rgb(0xab5236), rgb(0x5f574f), rgb(0xc2c3c7), rgb(0xfff1e8),
    rgb(0xff004d), rgb(0xffa300), rgb(0xffec27), rgb(0x00e436),
    rgb(0x29adff), rgb(0x83769c), rgb(0xff77a8), rgb(0xffccaa),
    rgb(0x1c5eac), rgb(0x00a5a1), rgb(0x754e97), rgb(0x125359),
    rgb(0x742f29), rgb(0x492d38), rgb(0xa28879), rgb(0xffacc5),
    rgb(0xc3004c), rgb(0xeb6b00), rgb(0x90ec42), rgb(0x00b251),
    rgb(0x64dff6), rgb(0xbd9adf), rgb(0xe40dab), rgb(0xff856d),
];

/// `SHADOW_TABLE[colour][level]`, level 0 is the colour itself
const SHADOW_TABLE: [[u8; SHADOW_LEVELS]; PALETTE_SIZE] = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [1, 1, 1, 0, 0, 0, 0, 0],
    [2, 2, 21, 21, 1, 0, 0, 0],
    [3, 3, 19, 19, 1, 1, 0, 0],
    [4, 4, 20, 20, 21, 1, 0, 0],
    [5, 5, 21, 21, 1, 0, 0, 0],
    [6, 13, 13, 5, 5, 21, 1, 0],
    [7, 6, 6, 13, 5, 5, 1, 0],
    [8, 8, 24, 24, 2, 21, 1, 0],
    [9, 9, 25, 25, 4, 20, 21, 0],
    [10, 10, 9, 25, 4, 20, 1, 0],
    [11, 11, 27, 27, 3, 19, 1, 0],
    [12, 12, 16, 16, 1, 1, 0, 0],
    [13, 13, 5, 5, 21, 1, 0, 0],
    [14, 14, 8, 8, 24, 2, 1, 0],
    [15, 15, 4, 4, 20, 21, 1, 0],
    [16, 16, 1, 1, 0, 0, 0, 0],
    [17, 17, 19, 19, 1, 1, 0, 0],
    [18, 18, 2, 2, 21, 1, 0, 0],
    [19, 19, 1, 1, 0, 0, 0, 0],
    [20, 20, 21, 21, 1, 0, 0, 0],
    [21, 21, 1, 0, 0, 0, 0, 0],
    [22, 22, 5, 5, 21, 1, 0, 0],
    [23, 23, 14, 14, 8, 24, 2, 0],
    [24, 24, 2, 2, 21, 1, 0, 0],
    [25, 25, 4, 4, 20, 21, 1, 0],
    [26, 26, 11, 11, 27, 3, 19, 0],
    [27, 27, 3, 3, 19, 1, 0, 0],
    [28, 28, 12, 12, 16, 1, 0, 0],
    [29, 29, 13, 13, 5, 21, 1, 0],
    [30, 30, 24, 24, 2, 21, 1, 0],
    [31, 31, 8, 8, 24, 2, 1, 0],
];

/// Palette index of `index` darkened by `level` steps. Out of range
/// levels clamp to the darkest step.
pub fn shade_index(index: usize, level: usize) -> usize {
    let row = &SHADOW_TABLE[index % PALETTE_SIZE];
    row[level.min(SHADOW_LEVELS - 1)] as usize
}

/// Palette colour for `index` at `brightness` (1.0 = unshaded, 0.0 = darkest)
pub fn shaded(index: usize, brightness: f32) -> Color {
    let darkness = 1.0 - brightness.clamp(0.0, 1.0);
    let level = (darkness * (SHADOW_LEVELS - 1) as f32).round() as usize;
    PALETTE[shade_index(index, level)]
}

/// Bake the shadow table into a 32x8 texture
pub fn shadow_lut() -> Result<Texture> {
    let pixels = (0..SHADOW_LEVELS)
        .flat_map(|level| (0..PALETTE_SIZE).map(move |index| PALETTE[shade_index(index, level)]))
        .collect();
    let lut = Texture::from_pixels(PALETTE_SIZE, SHADOW_LEVELS, pixels, "shadow_lut".to_string())?;
    log::debug!("baked {}x{} shadow lut", lut.width, lut.height);
    Ok(lut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_zero_is_identity() {
        for i in 0..PALETTE_SIZE {
            assert_eq!(shade_index(i, 0), i);
        }
    }

    #[test]
    fn every_colour_ends_in_black() {
        for i in 0..PALETTE_SIZE {
            assert_eq!(shade_index(i, SHADOW_LEVELS - 1), 0);
            assert_eq!(shade_index(i, 100), 0);
        }
    }

    #[test]
    fn shaded_endpoints() {
        assert_eq!(shaded(8, 1.0), PALETTE[8]);
        assert_eq!(shaded(8, 0.0), Color::BLACK);
    }

    #[test]
    fn lut_layout() {
        let lut = shadow_lut().unwrap();
        assert_eq!((lut.width, lut.height), (32, 8));
        assert_eq!(lut.get_pixel(12, 0), PALETTE[12]);
        assert_eq!(lut.get_pixel(12, 2), PALETTE[16]);
        assert_eq!(lut.get_pixel(7, 7), Color::BLACK);
    }
}
