//! Render a test scene to PNG without opening a window.
//!
//! ```text
//! snapshot --out cube.png --yaw 45 --pitch 35.26
//! snapshot --config low.ron --out cube.png --depth cube-depth.png
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use stipple::config::RenderConfig;
use stipple::rasterizer::*;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// RON render config; defaults are used when omitted
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output PNG
    #[arg(long, value_name = "FILE", default_value = "snapshot.png")]
    out: PathBuf,

    /// Also write the depth buffer as a grayscale PNG
    #[arg(long, value_name = "FILE")]
    depth: Option<PathBuf>,

    /// Cube rotation about Y, degrees
    #[arg(long, default_value_t = 45.0)]
    yaw: f32,

    /// Cube rotation about X, degrees
    #[arg(long, default_value_t = 35.26)]
    pitch: f32,

    /// Uniform brightness (stippled below 1.0)
    #[arg(long)]
    brightness: Option<f32>,

    /// Texture image (power-of-two sides); a checkerboard when omitted
    #[arg(long, value_name = "FILE")]
    texture: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let opts = Opts::parse();

    let config = match &opts.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RenderConfig::default(),
    };
    let (width, height) = (config.width, config.height);
    let mut renderer = SoftwareRenderer::new(config)?;

    let texture = match &opts.texture {
        Some(path) => Texture::from_file(path)
            .with_context(|| format!("loading texture {}", path.display()))?,
        None => Texture::checkerboard(64, 8, Color::WHITE, Color::new(200, 40, 40))?,
    };

    let eye = Vec3::new(0.0, 0.0, 2.5);
    let proj = perspective(60f32.to_radians(), width as f32 / height as f32, 0.1, 100.0);
    let view = look_at(eye, Vec3::ZERO, Vec3::UP);
    let model = mat_mul(
        &rotation_x(opts.pitch.to_radians()),
        &rotation_y(opts.yaw.to_radians()),
    );
    let params = DrawParams {
        brightness: opts.brightness,
        fog_factor: renderer.distance_fog(eye, Vec3::ZERO),
    };

    renderer.clear();
    renderer.draw_mesh(&Mesh::unit_cube(), &model, &mat_mul(&proj, &view), eye, &texture, &params)?;

    let stats = *renderer.stats();
    renderer.present(|_, w, h| log::debug!("presented {}x{}", w, h));
    renderer
        .framebuffer()
        .save_png(&opts.out)
        .with_context(|| format!("writing {}", opts.out.display()))?;

    if let Some(path) = &opts.depth {
        renderer
            .framebuffer()
            .depth_image()
            .save(path)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    log::info!(
        "{}: {} drawn, {} culled, {} px",
        opts.out.display(),
        stats.drawn,
        stats.culled,
        stats.pixels_written
    );
    Ok(())
}
