//! Renderer configuration
//!
//! Uses RON (Rusty Object Notation) so configs stay human-editable.
//! Every field has a default, so a config file only needs the overrides:
//!
//! ```ron
//! (width: 640, height: 480, perspective_span: 16)
//! ```

use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::rasterizer::{Color, FrontFace, ScanSettings, HEIGHT, NEAR_W, WIDTH};

/// Stippled distance fog
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FogSettings {
    pub color: Color,
    /// Camera distance where fog begins
    pub start: f32,
    /// Camera distance where fog is total
    pub end: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    pub clear_color: Color,
    /// Clip-space `w` at or below which a vertex counts as behind the camera
    pub near_w: f32,
    /// Pixels between true perspective divides
    pub perspective_span: usize,
    pub backface_cull: bool,
    pub front_face: FrontFace,
    /// `None` disables fog entirely, even if draw calls pass a factor
    pub fog: Option<FogSettings>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            clear_color: Color::new(30, 30, 40),
            near_w: NEAR_W,
            perspective_span: 8,
            backface_cull: true,
            front_face: FrontFace::CounterClockwise,
            fog: None,
        }
    }
}

impl RenderConfig {
    /// Load a config from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Parse and validate a config from a RON string
    pub fn from_ron_str(s: &str) -> Result<Self> {
        let config: RenderConfig = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Save the config to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "framebuffer size {}x{} is empty",
                self.width, self.height
            )));
        }
        if self.perspective_span == 0 {
            return Err(Error::InvalidConfig("perspective_span must be at least 1".into()));
        }
        if !(self.near_w > 0.0 && self.near_w.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "near_w must be a small positive number, got {}",
                self.near_w
            )));
        }
        if let Some(fog) = &self.fog {
            if fog.end <= fog.start {
                return Err(Error::InvalidConfig(format!(
                    "fog end ({}) must be beyond fog start ({})",
                    fog.end, fog.start
                )));
            }
        }
        Ok(())
    }

    pub fn scan_settings(&self) -> ScanSettings {
        ScanSettings {
            perspective_span: self.perspective_span,
            backface_cull: self.backface_cull,
            front_face: self.front_face,
        }
    }
}
