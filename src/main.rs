//! Stipple viewer: spinning textured cubes through the software rasterizer
//!
//! Usage: `stipple-viewer [config.ron]`
//!
//! Controls:
//! - Right drag / arrow keys: orbit
//! - Mouse wheel: zoom
//! - `B`: cycle brightness stipple
//! - `F`: toggle distance fog
//! - `[` / `]`: halve / double the perspective span
//! - `Space`: pause rotation

use macroquad::prelude::*;
use stipple::config::{FogSettings, RenderConfig};
use stipple::rasterizer::{self as rast, DrawParams, Mesh, Renderer, RendererExt, SoftwareRenderer};
use stipple::VERSION;

const BRIGHTNESS_STEPS: [Option<f32>; 4] = [None, Some(0.75), Some(0.5), Some(0.25)];

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Stipple v{}", VERSION),
        window_width: rast::WIDTH as i32 * 3,
        window_height: rast::HEIGHT as i32 * 3,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn load_config() -> RenderConfig {
    let Some(path) = std::env::args().nth(1) else {
        return RenderConfig::default();
    };
    match RenderConfig::load(&path) {
        Ok(config) => {
            log::info!("loaded config from {}", path);
            config
        }
        Err(e) => {
            log::error!("failed to load {}: {}, using defaults", path, e);
            RenderConfig::default()
        }
    }
}

/// Orbit camera around the origin
struct Orbit {
    azimuth: f32,
    elevation: f32,
    distance: f32,
}

impl Orbit {
    fn eye(&self) -> rast::Vec3 {
        rast::Vec3::new(
            self.distance * self.elevation.cos() * self.azimuth.sin(),
            self.distance * self.elevation.sin(),
            self.distance * self.elevation.cos() * self.azimuth.cos(),
        )
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    let mut config = load_config();
    let mut renderer = match SoftwareRenderer::new(config.clone()) {
        Ok(r) => r,
        Err(e) => {
            log::error!("invalid config: {}, using defaults", e);
            config = RenderConfig::default();
            match SoftwareRenderer::new(config.clone()) {
                Ok(r) => r,
                Err(e) => {
                    log::error!("default config rejected: {}", e);
                    return;
                }
            }
        }
    };

    let checker = rast::Texture::checkerboard(64, 8, rast::Color::new(230, 220, 200), rast::Color::new(120, 60, 60));
    let lut = stipple::palette::shadow_lut();
    let (checker, lut) = match (checker, lut) {
        (Ok(c), Ok(l)) => (c, l),
        (Err(e), _) | (_, Err(e)) => {
            log::error!("failed to build textures: {}", e);
            return;
        }
    };

    let cube = Mesh::unit_cube();
    let floor = Mesh::quad([
        rast::Vec3::new(-4.0, -1.0, 4.0),
        rast::Vec3::new(4.0, -1.0, 4.0),
        rast::Vec3::new(4.0, -1.0, -4.0),
        rast::Vec3::new(-4.0, -1.0, -4.0),
    ]);

    let mut orbit = Orbit { azimuth: 0.6, elevation: 0.4, distance: 4.0 };
    let mut spin = 0.0f32;
    let mut paused = false;
    let mut brightness_step = 0;
    let mut last_mouse = mouse_position();

    log::info!("stipple viewer {}x{}", config.width, config.height);

    loop {
        let dt = get_frame_time();

        // === INPUT ===
        let mouse = mouse_position();
        if is_mouse_button_down(MouseButton::Right) {
            orbit.azimuth -= (mouse.0 - last_mouse.0) * 0.005;
            orbit.elevation = (orbit.elevation + (mouse.1 - last_mouse.1) * 0.005).clamp(-1.4, 1.4);
        }
        last_mouse = mouse;
        if is_key_down(KeyCode::Left) {
            orbit.azimuth -= dt * 1.5;
        }
        if is_key_down(KeyCode::Right) {
            orbit.azimuth += dt * 1.5;
        }
        if is_key_down(KeyCode::Up) {
            orbit.elevation = (orbit.elevation + dt).min(1.4);
        }
        if is_key_down(KeyCode::Down) {
            orbit.elevation = (orbit.elevation - dt).max(-1.4);
        }
        let wheel = mouse_wheel().1;
        if wheel != 0.0 {
            let zoom = if wheel > 0.0 { 0.9 } else { 1.1 };
            orbit.distance = (orbit.distance * zoom).clamp(0.5, 30.0);
        }
        if is_key_pressed(KeyCode::Space) {
            paused = !paused;
        }
        if is_key_pressed(KeyCode::B) {
            brightness_step = (brightness_step + 1) % BRIGHTNESS_STEPS.len();
        }

        let mut rebuild = false;
        if is_key_pressed(KeyCode::F) {
            config.fog = match config.fog {
                Some(_) => None,
                None => Some(FogSettings { color: config.clear_color, start: 2.0, end: 8.0 }),
            };
            rebuild = true;
        }
        if is_key_pressed(KeyCode::LeftBracket) && config.perspective_span > 1 {
            config.perspective_span /= 2;
            rebuild = true;
        }
        if is_key_pressed(KeyCode::RightBracket) && config.perspective_span < 64 {
            config.perspective_span *= 2;
            rebuild = true;
        }
        if rebuild {
            match SoftwareRenderer::new(config.clone()) {
                Ok(r) => renderer = r,
                Err(e) => log::warn!("config change rejected: {}", e),
            }
        }

        if !paused {
            spin += dt;
        }

        // === RENDER ===
        let eye = orbit.eye();
        let aspect = config.width as f32 / config.height as f32;
        let proj = rast::perspective(60f32.to_radians(), aspect, 0.1, 100.0);
        let view = rast::look_at(eye, rast::Vec3::ZERO, rast::Vec3::UP);
        let view_proj = rast::mat_mul(&proj, &view);

        renderer.clear();

        let params = DrawParams {
            brightness: BRIGHTNESS_STEPS[brightness_step],
            fog_factor: None,
        };
        let floor_params = DrawParams {
            fog_factor: renderer.distance_fog(eye, rast::Vec3::ZERO),
            ..params
        };
        let spun = rast::mat_mul(&rast::rotation_y(spin), &rast::rotation_x(spin * 0.7));
        let left = rast::mat_mul(&rast::translation(rast::Vec3::new(-0.9, 0.0, 0.0)), &spun);
        let right = rast::mat_mul(
            &rast::translation(rast::Vec3::new(0.9, 0.0, 0.0)),
            &rast::rotation_y(-spin),
        );

        let result = renderer
            .draw_mesh(&floor, &rast::mat4_identity(), &view_proj, eye, &checker, &floor_params)
            .and_then(|_| {
                let fog_factor = renderer.distance_fog(eye, rast::Vec3::new(-0.9, 0.0, 0.0));
                renderer.draw_mesh(&cube, &left, &view_proj, eye, &checker, &DrawParams { fog_factor, ..params })
            })
            .and_then(|_| {
                let fog_factor = renderer.distance_fog(eye, rast::Vec3::new(0.9, 0.0, 0.0));
                renderer.draw_mesh(&cube, &right, &view_proj, eye, &lut, &DrawParams { fog_factor, ..params })
            });
        if let Err(e) = result {
            log::error!("draw failed: {}", e);
        }

        clear_background(Color::from_rgba(20, 20, 24, 255));

        // Fit the framebuffer into the window, keeping aspect
        let scale = (screen_width() / config.width as f32).min(screen_height() / config.height as f32);
        let draw_w = config.width as f32 * scale;
        let draw_h = config.height as f32 * scale;
        let draw_x = (screen_width() - draw_w) * 0.5;
        let draw_y = (screen_height() - draw_h) * 0.5;

        renderer.present(|pixels, width, height| {
            let texture = Texture2D::from_rgba8(width as u16, height as u16, pixels);
            texture.set_filter(FilterMode::Nearest);

            draw_texture_ex(
                &texture,
                draw_x,
                draw_y,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(Vec2::new(draw_w, draw_h)),
                    ..Default::default()
                },
            );
        });

        // Stats overlay
        let stats = renderer.stats();
        draw_text(
            &format!(
                "{} fps | tris {} drawn {} culled {} clipped {} | px {} | xform {:.2}ms raster {:.2}ms",
                get_fps(),
                stats.submitted,
                stats.drawn,
                stats.culled,
                stats.clipped,
                stats.pixels_written,
                stats.transform_time.as_secs_f64() * 1000.0,
                stats.raster_time.as_secs_f64() * 1000.0,
            ),
            8.0,
            18.0,
            16.0,
            Color::from_rgba(200, 200, 200, 255),
        );
        draw_text(
            &format!(
                "span {} | brightness {} | fog {}",
                config.perspective_span,
                BRIGHTNESS_STEPS[brightness_step].map_or("1.0".to_string(), |b| b.to_string()),
                if config.fog.is_some() { "on" } else { "off" },
            ),
            8.0,
            36.0,
            16.0,
            Color::from_rgba(200, 200, 200, 255),
        );

        next_frame().await
    }
}
