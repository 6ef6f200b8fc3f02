//! Core types for the rasterizer

use serde::{Serialize, Deserialize};
use crate::error::{Error, Result};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Pure black is the transparency key; alpha is ignored.
    #[inline]
    pub fn is_key(self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_bytes(b: [u8; 4]) -> Self {
        Self { r: b[0], g: b[1], b: b[2], a: b[3] }
    }
}

/// Which screen-space winding counts as a front face.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrontFace {
    /// Counter-clockwise as seen on the display (Y down). This is what a
    /// counter-clockwise mesh face facing the camera projects to.
    #[default]
    CounterClockwise,
    /// Clockwise as seen on the display.
    Clockwise,
}

/// Texture with power-of-two dimensions, sampled nearest-neighbour with
/// bitmask wrapping.
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
    pub name: String,
    mask_x: i32,
    mask_y: i32,
}

impl Texture {
    /// Solid white texture
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::from_pixels(width, height, vec![Color::WHITE; width * height], String::new())
    }

    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Color>, name: String) -> Result<Self> {
        if !width.is_power_of_two() || !height.is_power_of_two() {
            return Err(Error::NonPowerOfTwo { width, height });
        }
        if pixels.len() != width * height {
            return Err(Error::TextureSize {
                expected: width * height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            name,
            mask_x: width as i32 - 1,
            mask_y: height as i32 - 1,
        })
    }

    /// Load texture from an image file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let tex = Self::from_image(img, name)?;
        log::info!("Loaded texture: {} ({}x{})", tex.name, tex.width, tex.height);
        Ok(tex)
    }

    /// Load texture from encoded image bytes
    pub fn from_bytes(bytes: &[u8], name: String) -> Result<Self> {
        let img = image::load_from_memory(bytes)?;
        Self::from_image(img, name)
    }

    fn from_image(img: image::DynamicImage, name: String) -> Result<Self> {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let pixels: Vec<Color> = rgba
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
            .collect();

        Self::from_pixels(width as usize, height as usize, pixels, name)
    }

    /// Checkerboard with square cells of `cell` texels
    pub fn checkerboard(size: usize, cell: usize, color1: Color, color2: Color) -> Result<Self> {
        let cell = cell.max(1);
        let mut pixels = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                let checker = ((x / cell) + (y / cell)) % 2 == 0;
                pixels.push(if checker { color1 } else { color2 });
            }
        }
        Self::from_pixels(size, size, pixels, "checkerboard".to_string())
    }

    /// Texel lookup in texel units, wrapped by bitmask. Negative
    /// coordinates wrap too (two's complement).
    #[inline]
    pub fn texel_wrapped(&self, tx: i32, ty: i32) -> Color {
        let x = (tx & self.mask_x) as usize;
        let y = (ty & self.mask_y) as usize;
        self.pixels[y * self.width + x]
    }

    /// Get pixel at x,y coordinates
    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            Color::BLACK
        }
    }
}
