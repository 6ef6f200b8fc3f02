//! End-to-end frames through `SoftwareRenderer`

use stipple::config::{FogSettings, RenderConfig};
use stipple::rasterizer::*;
use stipple::Error;

const BG: Color = Color::new(0, 0, 64);

fn renderer(width: usize, height: usize) -> SoftwareRenderer {
    SoftwareRenderer::new(RenderConfig {
        width,
        height,
        clear_color: BG,
        ..RenderConfig::default()
    })
    .unwrap()
}

fn camera(eye: Vec3, aspect: f32) -> Mat4 {
    let proj = perspective(90f32.to_radians(), aspect, 0.1, 100.0);
    let view = look_at(eye, Vec3::new(eye.x, eye.y, eye.z - 1.0), Vec3::UP);
    mat_mul(&proj, &view)
}

fn covered(fb: &Framebuffer) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for y in 0..fb.height {
        for x in 0..fb.width {
            if fb.pixel(x, y) != BG {
                out.push((x, y));
            }
        }
    }
    out
}

fn to_screen(mvp: &Mat4, p: Vec3, width: usize, height: usize) -> (f32, f32) {
    let c = transform_point(mvp, p);
    (
        (c.x / c.w * 0.5 + 0.5) * width as f32,
        (0.5 - c.y / c.w * 0.5) * height as f32,
    )
}

#[test]
fn rotated_cube_draws_three_faces() {
    let (w, h) = (128, 128);
    let mut r = renderer(w, h);
    let texture = Texture::checkerboard(16, 4, Color::WHITE, Color::RED).unwrap();
    let cube = Mesh::unit_cube();
    let eye = Vec3::new(0.0, 0.0, 2.5);
    let view_proj = camera(eye, 1.0);
    let model = mat_mul(&rotation_x(35.26f32.to_radians()), &rotation_y(45f32.to_radians()));

    r.clear();
    r.draw_mesh(&cube, &model, &view_proj, eye, &texture, &DrawParams::default())
        .unwrap();

    let stats = *r.stats();
    assert_eq!(stats.submitted, 12);
    assert_eq!(stats.drawn, 6);
    assert_eq!(stats.culled, 6);
    assert_eq!(stats.clipped, 0);

    let fb = r.framebuffer();
    let pixels = covered(fb);
    assert_eq!(pixels.len() as u64, stats.pixels_written);

    // Nothing outside the projected corners
    let mvp = mat_mul(&view_proj, &model);
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (f32::MAX, f32::MAX, f32::MIN, f32::MIN);
    for &x in &[-0.5, 0.5] {
        for &y in &[-0.5, 0.5] {
            for &z in &[-0.5, 0.5] {
                let (sx, sy) = to_screen(&mvp, Vec3::new(x, y, z), w, h);
                min_x = min_x.min(sx);
                min_y = min_y.min(sy);
                max_x = max_x.max(sx);
                max_y = max_y.max(sy);
            }
        }
    }
    for &(x, y) in &pixels {
        let (x, y) = (x as f32, y as f32);
        assert!(x >= min_x.floor() && x <= max_x.ceil(), "stray column {}", x);
        assert!(y >= min_y.floor() && y <= max_y.ceil(), "stray row {}", y);
    }

    // Silhouette is convex: covered rows form one run
    let mut rows: Vec<usize> = pixels.iter().map(|&(_, y)| y).collect();
    rows.dedup();
    assert!(rows.len() > 10);
    assert_eq!(rows.last().unwrap() - rows[0] + 1, rows.len());
}

#[test]
fn cube_seen_straight_on_draws_front_face_only() {
    let mut r = renderer(64, 64);
    let texture = Texture::new(4, 4).unwrap();
    let eye = Vec3::new(0.0, 0.0, 2.5);

    r.clear();
    r.draw_mesh(&Mesh::unit_cube(), &mat4_identity(), &camera(eye, 1.0), eye, &texture, &DrawParams::default())
        .unwrap();

    let stats = r.stats();
    assert_eq!(stats.drawn, 2);
    assert_eq!(stats.culled, 10);
}

#[test]
fn distant_quad_keeps_sharp_texel_quadrants() {
    let mut r = renderer(64, 64);
    let texture = Texture::checkerboard(2, 1, Color::WHITE, Color::RED).unwrap();
    let quad = Mesh::quad([
        Vec3::new(-5.0, -5.0, -10.0),
        Vec3::new(5.0, -5.0, -10.0),
        Vec3::new(5.0, 5.0, -10.0),
        Vec3::new(-5.0, 5.0, -10.0),
    ]);

    r.clear();
    r.draw_mesh(&quad, &mat4_identity(), &camera(Vec3::ZERO, 1.0), Vec3::ZERO, &texture, &DrawParams::default())
        .unwrap();
    let fb = r.framebuffer();

    // Quad covers 16..48 on both axes; v grows upwards in the world
    assert_eq!(fb.pixel(20, 44), texture.get_pixel(0, 0));
    assert_eq!(fb.pixel(44, 44), texture.get_pixel(1, 0));
    assert_eq!(fb.pixel(20, 20), texture.get_pixel(0, 1));
    assert_eq!(fb.pixel(44, 20), texture.get_pixel(1, 1));
    assert_eq!(fb.pixel(8, 8), BG);

    // Nearest sampling, no blended colors, one clean switch per row
    for y in 18..=45 {
        let row: Vec<Color> = (18..=45).map(|x| fb.pixel(x, y)).collect();
        assert!(row.iter().all(|&c| c == Color::WHITE || c == Color::RED));
        let switches = row.windows(2).filter(|p| p[0] != p[1]).count();
        assert_eq!(switches, 1, "row {}", y);
    }
}

#[test]
fn triangle_behind_camera_writes_nothing() {
    let mut r = renderer(32, 32);
    let texture = Texture::new(4, 4).unwrap();
    let tri = Triangle::new(
        Vertex::from_pos(-1.0, -1.0, 1.0),
        Vertex::from_pos(1.0, -1.0, 1.0),
        Vertex::from_pos(0.0, 1.0, 2.0),
    );

    r.clear();
    r.set_matrices(&camera(Vec3::ZERO, 1.0), Vec3::ZERO);
    r.draw_triangle(&tri, &texture, &DrawParams::default()).unwrap();

    let stats = r.stats();
    assert_eq!(stats.clipped, 1);
    assert_eq!(stats.near_rejected, 1);
    assert_eq!(stats.drawn + stats.culled, 0);
    assert_eq!(stats.pixels_written, 0);
    assert!(covered(r.framebuffer()).is_empty());
}

#[test]
fn misuse_is_reported_without_touching_pixels() {
    let mut r = renderer(16, 16);
    let texture = Texture::new(4, 4).unwrap();
    let tri = Triangle::new(
        Vertex::from_pos(-1.0, -1.0, -2.0),
        Vertex::from_pos(1.0, -1.0, -2.0),
        Vertex::from_pos(0.0, 1.0, -2.0),
    );

    assert!(matches!(
        r.draw_triangle(&tri, &texture, &DrawParams::default()),
        Err(Error::FrameNotStarted)
    ));

    r.clear();
    assert!(matches!(
        r.draw_triangle(&tri, &texture, &DrawParams::default()),
        Err(Error::MatricesNotSet)
    ));
    assert!(covered(r.framebuffer()).is_empty());

    r.set_matrices(&camera(Vec3::ZERO, 1.0), Vec3::ZERO);
    r.draw_triangle(&tri, &texture, &DrawParams::default()).unwrap();
    assert!(!covered(r.framebuffer()).is_empty());
}

#[test]
fn one_vertex_behind_splits_into_two() {
    let tri: ClipTriangle = [
        ClipVertex::new(Vec4::new(-1.0, 0.0, 0.0, 2.0), Vec2::new(0.0, 0.0)),
        ClipVertex::new(Vec4::new(1.0, 0.0, 0.0, 2.0), Vec2::new(1.0, 0.0)),
        ClipVertex::new(Vec4::new(0.0, 1.0, 0.0, -1.0), Vec2::new(0.5, 1.0)),
    ];
    let behind = classify(&tri, NEAR_W);
    assert_eq!(behind, [false, false, true]);

    let pieces = clip_near_plane(&tri, behind, NEAR_W);
    assert_eq!(pieces.len(), 2);
    for piece in &pieces {
        for v in piece {
            assert!(v.pos.w >= NEAR_W);
        }
    }
}

#[test]
fn nearer_surface_wins_in_either_order() {
    let red = Texture::from_pixels(1, 1, vec![Color::RED], "red".into()).unwrap();
    let white = Texture::new(1, 1).unwrap();
    let square = |z: f32| {
        Mesh::quad([
            Vec3::new(-1.0, -1.0, z),
            Vec3::new(1.0, -1.0, z),
            Vec3::new(1.0, 1.0, z),
            Vec3::new(-1.0, 1.0, z),
        ])
    };
    let (near, far) = (square(-5.0), square(-10.0));
    let view_proj = camera(Vec3::ZERO, 1.0);
    let id = mat4_identity();
    let params = DrawParams::default();

    let mut r = renderer(32, 32);
    r.clear();
    r.draw_mesh(&far, &id, &view_proj, Vec3::ZERO, &red, &params).unwrap();
    r.draw_mesh(&near, &id, &view_proj, Vec3::ZERO, &white, &params).unwrap();
    let far_first = r.framebuffer().pixel(16, 16);
    let depth_near = r.framebuffer().depth(16, 16);
    r.present(|_, _, _| {});

    r.clear();
    r.draw_mesh(&near, &id, &view_proj, Vec3::ZERO, &white, &params).unwrap();
    let depth_after_near = r.framebuffer().depth(16, 16);
    r.draw_mesh(&far, &id, &view_proj, Vec3::ZERO, &red, &params).unwrap();

    assert_eq!(far_first, Color::WHITE);
    assert_eq!(r.framebuffer().pixel(16, 16), Color::WHITE);
    assert_eq!(r.framebuffer().depth(16, 16), depth_after_near);
    assert_eq!(depth_near, depth_after_near);

    // Far quad alone reads deeper
    r.present(|_, _, _| {});
    r.clear();
    r.draw_mesh(&far, &id, &view_proj, Vec3::ZERO, &red, &params).unwrap();
    assert!(r.framebuffer().depth(16, 16) > depth_near);
}

#[test]
fn receding_floor_is_perspective_correct() {
    // Horizontal stripes: 4 texel rows each
    let stripes: Vec<Color> = (0..64)
        .flat_map(|y| {
            let c = if (y / 4) % 2 == 0 { Color::WHITE } else { Color::RED };
            [c, c]
        })
        .collect();
    let texture = Texture::from_pixels(2, 64, stripes, "stripes".into()).unwrap();
    let floor = Mesh::quad([
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(1.0, -1.0, -100.0),
        Vec3::new(-1.0, -1.0, -100.0),
    ]);

    for span in [1, 8, 16] {
        let mut r = SoftwareRenderer::new(RenderConfig {
            width: 128,
            height: 128,
            clear_color: BG,
            perspective_span: span,
            ..RenderConfig::default()
        })
        .unwrap();
        r.clear();
        r.draw_mesh(&floor, &mat4_identity(), &camera(Vec3::ZERO, 1.0), Vec3::ZERO, &texture, &DrawParams::default())
            .unwrap();
        let fb = r.framebuffer();

        // A floor row is one depth, so one stripe. Affine mapping would
        // shear stripes across the diagonal.
        let mut row_colors = Vec::new();
        let mut mixed = 0;
        for y in 0..fb.height {
            let mut colors: Vec<Color> = (0..fb.width).map(|x| fb.pixel(x, y)).filter(|&c| c != BG).collect();
            colors.dedup();
            match colors.len() {
                0 => {}
                1 => row_colors.push(colors[0]),
                _ => mixed += 1,
            }
        }
        assert!(mixed <= 2, "span {}: {} mixed rows", span, mixed);

        // Stripes shrink towards the horizon: the nearest stripe is far
        // taller on screen than the average
        let mut runs = Vec::new();
        let mut run = 0;
        for pair in row_colors.windows(2) {
            run += 1;
            if pair[0] != pair[1] {
                runs.push(run);
                run = 0;
            }
        }
        runs.push(run + 1);
        let nearest = *runs.last().unwrap();
        assert!(runs.len() >= 4, "span {}", span);
        assert!(nearest > 20, "span {}: nearest stripe {} rows", span, nearest);
        assert!(runs[0] <= 2, "span {}: farthest stripe {} rows", span, runs[0]);
    }
}

#[test]
fn dithered_brightness_thins_coverage() {
    let texture = Texture::new(4, 4).unwrap();
    // Overhangs the screen on every side
    let quad = Mesh::quad([
        Vec3::new(-1.5, -1.5, -1.0),
        Vec3::new(1.5, -1.5, -1.0),
        Vec3::new(1.5, 1.5, -1.0),
        Vec3::new(-1.5, 1.5, -1.0),
    ]);
    let view_proj = camera(Vec3::ZERO, 1.0);

    let mut r = renderer(32, 32);
    r.clear();
    r.draw_mesh(&quad, &mat4_identity(), &view_proj, Vec3::ZERO, &texture, &DrawParams::default())
        .unwrap();
    let full = r.stats().pixels_written;
    r.present(|_, _, _| {});

    r.clear();
    let dim = DrawParams { brightness: Some(0.5), fog_factor: None };
    r.draw_mesh(&quad, &mat4_identity(), &view_proj, Vec3::ZERO, &texture, &dim)
        .unwrap();
    assert_eq!(full, 32 * 32);
    // 9 of every 16 thresholds are at or below 0.5
    assert_eq!(r.stats().pixels_written, full / 16 * 9);
    r.present(|_, _, _| {});

    // zero brightness still keeps the zero threshold
    r.clear();
    let black = DrawParams { brightness: Some(0.0), fog_factor: None };
    r.draw_mesh(&quad, &mat4_identity(), &view_proj, Vec3::ZERO, &texture, &black)
        .unwrap();
    assert_eq!(r.stats().pixels_written, full / 16);
}

#[test]
fn cube_past_fog_end_is_fully_fogged() {
    let fog_color = Color::new(0, 255, 0);
    let mut r = SoftwareRenderer::new(RenderConfig {
        width: 64,
        height: 64,
        clear_color: BG,
        fog: Some(FogSettings { color: fog_color, start: 0.5, end: 2.5 }),
        ..RenderConfig::default()
    })
    .unwrap();
    let texture = Texture::checkerboard(16, 4, Color::WHITE, Color::RED).unwrap();
    let eye = Vec3::new(0.0, 0.0, 2.5);
    let model = mat_mul(&rotation_x(35.26f32.to_radians()), &rotation_y(45f32.to_radians()));

    // factor is taken before the frame's matrices exist
    let params = DrawParams { brightness: None, fog_factor: r.distance_fog(eye, Vec3::ZERO) };
    assert_eq!(params.fog_factor, Some(1.0));

    r.clear();
    r.draw_mesh(&Mesh::unit_cube(), &model, &camera(eye, 1.0), eye, &texture, &params)
        .unwrap();

    let fb = r.framebuffer();
    let pixels = covered(fb);
    assert!(!pixels.is_empty());
    assert!(pixels.iter().all(|&(x, y)| fb.pixel(x, y) == fog_color));
}
