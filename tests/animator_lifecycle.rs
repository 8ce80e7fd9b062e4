//! Integration tests driving the animator through the recording surface.
//!
//! The recording surface logs every draw call, so these tests can check what
//! a host would see on screen without a window or GPU.

use std::thread;

use glam::Vec3;
use plexus::connections::pair_count;
use plexus::{
    connection_opacity, AnimatorConfig, AnimatorError, ConfigError, DrawCall, FrameStatus,
    ParticleFieldAnimator, Preset, RecordingSurface, SurfaceSize,
};

// ============================================================================
// Helpers
// ============================================================================

/// Two motionless particles on a 100×100 surface.
fn still_pair(threshold: f32) -> AnimatorConfig {
    AnimatorConfig::new()
        .with_particle_count(2)
        .with_max_speed(0.0)
        .with_connection_distance(threshold)
        .with_seed(3)
}

fn pair_distance(threshold: f32) -> f32 {
    let animator =
        ParticleFieldAnimator::start(RecordingSurface::new(100.0, 100.0), still_pair(threshold)).unwrap();
    let p = animator.particles();
    p[0].position.distance(p[1].position)
}

// ============================================================================
// Connections
// ============================================================================

#[test]
fn test_pair_just_inside_threshold_is_faint() {
    let d = pair_distance(1000.0);
    assert!(d > 0.0);

    let threshold = d + 1.0;
    let config = still_pair(threshold);
    let max = config.max_connection_opacity;
    let surface = RecordingSurface::new(100.0, 100.0);
    let log = surface.log();
    let mut animator = ParticleFieldAnimator::start(surface, config).unwrap();
    animator.frame().unwrap();

    let opacities: Vec<f32> = log
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            DrawCall::Line { color, .. } => Some(color.w),
            _ => None,
        })
        .collect();
    assert_eq!(opacities.len(), 1);
    assert_eq!(Some(opacities[0]), connection_opacity(d, threshold, max));
    assert!((opacities[0] - max / threshold).abs() < 1e-5);
}

#[test]
fn test_pair_at_threshold_is_not_linked() {
    let d = pair_distance(1000.0);

    let surface = RecordingSurface::new(100.0, 100.0);
    let log = surface.log();
    let mut animator = ParticleFieldAnimator::start(surface, still_pair(d)).unwrap();
    animator.frame().unwrap();

    assert_eq!(log.lines(), 0);
    assert_eq!(log.discs(), 2);
}

#[test]
fn test_zero_threshold_links_nothing() {
    let config = AnimatorConfig::new()
        .with_particle_count(30)
        .with_connection_distance(0.0)
        .with_seed(11);
    let surface = RecordingSurface::new(200.0, 200.0);
    let log = surface.log();
    let mut animator = ParticleFieldAnimator::start(surface, config).unwrap();

    for _ in 0..5 {
        animator.frame().unwrap();
    }
    assert_eq!(log.lines(), 0);
    assert_eq!(log.discs(), 150);
}

#[test]
fn test_lines_bounded_by_pair_count() {
    // Every pair fits inside a huge threshold.
    let config = AnimatorConfig::new()
        .with_particle_count(12)
        .with_connection_distance(1.0e6)
        .with_seed(5);
    let surface = RecordingSurface::new(300.0, 200.0);
    let log = surface.log();
    let mut animator = ParticleFieldAnimator::start(surface, config).unwrap();
    animator.frame().unwrap();

    assert_eq!(log.lines(), pair_count(12));
    assert_eq!(animator.pairs_checked(), pair_count(12));
}

// ============================================================================
// Frames
// ============================================================================

#[test]
fn test_every_frame_draws_whole_pool_last() {
    let count = 25;
    let surface = RecordingSurface::new(640.0, 480.0);
    let log = surface.log();
    let mut animator = ParticleFieldAnimator::start(
        surface,
        AnimatorConfig::from(Preset::Crimson)
            .with_particle_count(count)
            .with_seed(1),
    )
    .unwrap();

    for frame in 1..=4 {
        log.clear();
        assert_eq!(animator.frame().unwrap(), FrameStatus::Scheduled);

        let calls = log.calls();
        assert_eq!(calls.first(), Some(&DrawCall::Clear));
        assert!(matches!(calls[1], DrawCall::Gradient { stops: 2, .. }));
        assert_eq!(calls.last(), Some(&DrawCall::Present));
        assert_eq!(log.discs(), count, "frame {frame}");

        // Discs after every line.
        let first_disc = calls
            .iter()
            .position(|c| matches!(c, DrawCall::Disc { .. }))
            .unwrap();
        assert!(calls[first_disc..]
            .iter()
            .all(|c| matches!(c, DrawCall::Disc { .. } | DrawCall::Present)));
    }
    assert_eq!(animator.frames_rendered(), 4);
}

#[test]
fn test_every_preset_runs() {
    for preset in Preset::ALL {
        let config = AnimatorConfig::from(preset).with_seed(9);
        let count = config.particle_count;
        let surface = RecordingSurface::new(1280.0, 720.0);
        let log = surface.log();
        let mut animator = ParticleFieldAnimator::start(surface, config).unwrap();

        for _ in 0..3 {
            assert_eq!(animator.frame().unwrap(), FrameStatus::Scheduled);
        }
        assert_eq!(log.frames(), 3, "{preset}");
        assert_eq!(log.discs(), 3 * count, "{preset}");
    }
}

#[test]
fn test_seeded_runs_repeat() {
    let run = || {
        let surface = RecordingSurface::new(400.0, 300.0);
        let log = surface.log();
        let mut animator =
            ParticleFieldAnimator::start(surface, AnimatorConfig::new().with_seed(77)).unwrap();
        for _ in 0..10 {
            animator.frame().unwrap();
        }
        log.calls()
    };
    assert_eq!(run(), run());
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_empty_pool_is_invalid_configuration() {
    let surface = RecordingSurface::new(100.0, 100.0);
    let log = surface.log();
    let result = ParticleFieldAnimator::start(surface, AnimatorConfig::new().with_particle_count(0));

    assert!(matches!(
        result,
        Err(AnimatorError::InvalidConfiguration(ConfigError::EmptyPool))
    ));
    assert!(log.is_empty());
}

#[test]
fn test_surface_without_context_is_unavailable() {
    let surface = RecordingSurface::new(100.0, 100.0).without_context();
    let result = ParticleFieldAnimator::start(surface, AnimatorConfig::new());
    assert!(matches!(result, Err(AnimatorError::SurfaceUnavailable(_))));
}

#[test]
fn test_stop_before_first_frame_draws_nothing() {
    let surface = RecordingSurface::new(100.0, 100.0);
    let log = surface.log();
    let mut animator = ParticleFieldAnimator::start(surface, AnimatorConfig::new()).unwrap();

    animator.stop();
    assert_eq!(animator.frame().unwrap(), FrameStatus::Stopped);
    assert!(log.is_empty());
    assert!(log.is_released());
    assert!(!animator.is_running());
}

#[test]
fn test_stop_after_frames_ends_drawing() {
    let surface = RecordingSurface::new(100.0, 100.0);
    let log = surface.log();
    let mut animator = ParticleFieldAnimator::start(surface, AnimatorConfig::new()).unwrap();

    animator.frame().unwrap();
    animator.frame().unwrap();
    let drawn = log.len();

    animator.stop();
    animator.stop();
    for _ in 0..3 {
        assert_eq!(animator.frame().unwrap(), FrameStatus::Stopped);
    }
    assert_eq!(log.len(), drawn);
}

#[test]
fn test_handle_stop_from_another_thread() {
    let surface = RecordingSurface::new(100.0, 100.0);
    let log = surface.log();
    let mut animator = ParticleFieldAnimator::start(surface, AnimatorConfig::new()).unwrap();
    animator.frame().unwrap();
    let drawn = log.len();

    let handle = animator.handle();
    thread::spawn(move || handle.stop()).join().unwrap();

    assert!(!animator.is_running());
    assert!(!log.is_released());
    assert_eq!(animator.frame().unwrap(), FrameStatus::Stopped);
    assert_eq!(log.len(), drawn);
    assert!(log.is_released());
}

#[test]
fn test_resize_applies_at_next_frame() {
    let surface = RecordingSurface::new(400.0, 400.0);
    let log = surface.log();
    let mut animator =
        ParticleFieldAnimator::start(surface, AnimatorConfig::new().with_seed(21)).unwrap();
    animator.frame().unwrap();

    let before = animator.particles().to_vec();
    animator.handle().on_resize(50.0, 40.0);
    assert_eq!(animator.particles(), &before[..]);
    assert_eq!(animator.surface_state(), SurfaceSize::new(50.0, 40.0));

    log.clear();
    animator.frame().unwrap();
    let calls = log.calls();
    assert_eq!(calls[0], DrawCall::Resize(SurfaceSize::new(50.0, 40.0)));
    assert_eq!(calls[1], DrawCall::Clear);

    for p in animator.particles() {
        assert!((0.0..=50.0).contains(&p.position.x));
        assert!((0.0..=40.0).contains(&p.position.y));
    }

    log.clear();
    animator.frame().unwrap();
    assert_eq!(log.count(|c| matches!(c, DrawCall::Resize(_))), 0);
}

#[test]
fn test_resize_keeps_velocity_magnitudes() {
    let surface = RecordingSurface::new(400.0, 400.0);
    let mut animator =
        ParticleFieldAnimator::start(surface, AnimatorConfig::new().with_seed(8)).unwrap();
    let before: Vec<_> = animator.particles().iter().map(|p| p.velocity.abs()).collect();

    animator.on_resize(10.0, 10.0);
    animator.frame().unwrap();

    let after: Vec<_> = animator.particles().iter().map(|p| p.velocity.abs()).collect();
    assert_eq!(before, after);
}

#[test]
fn test_render_failure_surfaces_once() {
    let surface = RecordingSurface::new(100.0, 100.0);
    let log = surface.log();
    let mut animator = ParticleFieldAnimator::start(surface, AnimatorConfig::new()).unwrap();
    animator.frame().unwrap();

    log.detach();
    assert!(matches!(animator.frame(), Err(AnimatorError::Render(_))));
    assert!(log.is_released());
    assert_eq!(animator.frame().unwrap(), FrameStatus::Stopped);
}

#[test]
fn test_particle_style_is_fixed() {
    let color = Vec3::new(0.2, 0.4, 0.6);
    let config = AnimatorConfig::new()
        .with_particle_count(5)
        .with_particles(color, 0.75)
        .with_particle_radius(3.0);
    let surface = RecordingSurface::new(100.0, 100.0);
    let log = surface.log();
    let mut animator = ParticleFieldAnimator::start(surface, config).unwrap();
    animator.frame().unwrap();

    for call in log.calls() {
        if let DrawCall::Disc { radius, color: c, .. } = call {
            assert_eq!(radius, 3.0);
            assert_eq!(c, color.extend(0.75));
        }
    }
}
