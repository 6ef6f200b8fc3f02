//! Color and depth buffers

use std::path::Path;
use super::types::Color;
use crate::error::Result;

/// Depth value of an untouched pixel
pub const DEPTH_CLEAR: f32 = f32::INFINITY;

/// Framebuffer for software rendering
///
/// Both buffers are row-major with the origin at the top-left corner.
/// Depth holds `z / w` (NDC depth), smaller is nearer.
pub struct Framebuffer {
    pub pixels: Vec<u8>,    // RGBA, 4 bytes per pixel
    pub zbuffer: Vec<f32>,  // Depth buffer
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            zbuffer: vec![DEPTH_CLEAR; width * height],
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.pixels.resize(width * height * 4, 0);
            self.zbuffer.resize(width * height, DEPTH_CLEAR);
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
        self.zbuffer.fill(DEPTH_CLEAR);
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    /// Early depth test. Writes `z` and returns true when it is strictly
    /// nearer than what is stored.
    #[inline]
    pub fn test_and_set_depth(&mut self, idx: usize, z: f32) -> bool {
        if z < self.zbuffer[idx] {
            self.zbuffer[idx] = z;
            true
        } else {
            false
        }
    }

    /// Color write. Alpha is always stored opaque.
    #[inline]
    pub fn put_color(&mut self, idx: usize, color: Color) {
        let pixel_idx = idx * 4;
        self.pixels[pixel_idx] = color.r;
        self.pixels[pixel_idx + 1] = color.g;
        self.pixels[pixel_idx + 2] = color.b;
        self.pixels[pixel_idx + 3] = 255;
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color {
        let i = self.index(x, y) * 4;
        Color::from_bytes([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]])
    }

    pub fn depth(&self, x: usize, y: usize) -> f32 {
        self.zbuffer[self.index(x, y)]
    }

    /// Grayscale view of the depth buffer for debugging.
    /// Depth `-1..1` maps to white..black, untouched pixels are black.
    pub fn depth_image(&self) -> image::GrayImage {
        image::GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let z = self.zbuffer[y as usize * self.width + x as usize];
            let v = if z.is_finite() {
                ((1.0 - (z.clamp(-1.0, 1.0) + 1.0) * 0.5) * 255.0) as u8
            } else {
                0
            };
            image::Luma([v])
        })
    }

    /// Write the color buffer to an image file (format from the extension)
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        image::save_buffer(
            path,
            &self.pixels,
            self.width as u32,
            self.height as u32,
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_resets_both_buffers() {
        let mut fb = Framebuffer::new(4, 3);
        let idx = fb.index(2, 1);
        assert!(fb.test_and_set_depth(idx, 0.5));
        fb.put_color(idx, Color::RED);

        fb.clear(Color::new(1, 2, 3));
        assert_eq!(fb.pixel(2, 1), Color::new(1, 2, 3));
        assert_eq!(fb.depth(2, 1), DEPTH_CLEAR);
    }

    #[test]
    fn depth_test_is_strict() {
        let mut fb = Framebuffer::new(2, 2);
        let idx = fb.index(1, 1);
        assert!(fb.test_and_set_depth(idx, 0.25));
        assert!(!fb.test_and_set_depth(idx, 0.25));
        assert!(!fb.test_and_set_depth(idx, 0.5));
        assert!(fb.test_and_set_depth(idx, -0.5));
        assert_eq!(fb.depth(1, 1), -0.5);
    }

    #[test]
    fn color_write_forces_opaque() {
        let mut fb = Framebuffer::new(1, 1);
        fb.put_color(0, Color::with_alpha(9, 8, 7, 0));
        assert_eq!(fb.pixel(0, 0), Color::new(9, 8, 7));
    }

    #[test]
    fn depth_image_maps_near_to_white() {
        let mut fb = Framebuffer::new(2, 1);
        fb.test_and_set_depth(0, -1.0);
        let img = fb.depth_image();
        assert_eq!(img.get_pixel(0, 0).0[0], 255);
        assert_eq!(img.get_pixel(1, 0).0[0], 0);
    }
}
