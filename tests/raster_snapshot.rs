//! Headless rendering through the CPU rasterizer.

use glam::Vec3;
use plexus::{AnimatorConfig, GradientStop, ParticleFieldAnimator, Preset, RasterSurface};

fn close(a: [u8; 4], b: [u8; 4], tolerance: u8) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= tolerance)
}

fn to_rgba(color: Vec3) -> [u8; 4] {
    let c = (color * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8, 255]
}

#[test]
fn test_crimson_gradient_runs_corner_to_corner() {
    // Invisible network, so only the background reaches the pixels.
    let config = AnimatorConfig::from(Preset::Crimson)
        .with_particles(Vec3::ONE, 0.0)
        .with_connections(Vec3::ONE, 0.0)
        .with_seed(1);
    let stops = config.background.clone();

    let mut animator = ParticleFieldAnimator::start(RasterSurface::new(160, 90), config).unwrap();
    animator.frame().unwrap();
    let image = animator.context().unwrap().image();

    let top_left = image.get_pixel(0, 0).0;
    let bottom_right = image.get_pixel(159, 89).0;
    assert!(close(top_left, to_rgba(stops[0].color), 3), "{top_left:?}");
    assert!(close(bottom_right, to_rgba(stops[1].color), 3), "{bottom_right:?}");
    assert!(image.pixels().all(|p| p.0[3] == 255));
}

#[test]
fn test_transparent_background_shows_only_network() {
    let config = AnimatorConfig::new()
        .with_particle_count(1)
        .with_max_speed(0.0)
        .with_background(0.0, Vec::new())
        .with_particles(Vec3::ONE, 1.0)
        .with_particle_radius(2.0)
        .with_seed(4);

    let mut animator = ParticleFieldAnimator::start(RasterSurface::new(64, 64), config).unwrap();
    animator.frame().unwrap();
    let center = animator.particles()[0].position;
    let image = animator.context().unwrap().image();

    let px = image.get_pixel(center.x as u32, center.y as u32).0;
    assert!(px[3] > 0, "{px:?}");

    let lit = image.pixels().filter(|p| p.0[3] > 0).count();
    assert!(lit > 0 && lit <= 36, "{lit} pixels lit");
}

#[test]
fn test_stopped_animator_leaves_last_frame() {
    let mut animator = ParticleFieldAnimator::start(
        RasterSurface::new(32, 32),
        AnimatorConfig::new().with_particle_count(5).with_seed(2),
    )
    .unwrap();
    animator.frame().unwrap();
    assert!(animator.context().is_some());

    animator.stop();
    assert!(animator.context().is_none());
}

#[test]
fn test_snapshot_png_round_trips_dimensions() {
    let config = AnimatorConfig::from(Preset::Midnight)
        .with_background(
            90.0,
            vec![
                GradientStop::new(0.0, Vec3::ZERO),
                GradientStop::new(1.0, Vec3::ONE),
            ],
        )
        .with_seed(12);
    let mut animator = ParticleFieldAnimator::start(RasterSurface::new(48, 24), config).unwrap();
    for _ in 0..3 {
        animator.frame().unwrap();
    }

    let path = std::env::temp_dir().join(format!("plexus-snapshot-{}.png", std::process::id()));
    animator.context().unwrap().save_png(&path).unwrap();

    let decoded = image::open(&path).unwrap().to_rgba8();
    std::fs::remove_file(&path).ok();
    assert_eq!(decoded.dimensions(), (48, 24));
    assert_eq!(decoded, *animator.context().unwrap().image());
}
