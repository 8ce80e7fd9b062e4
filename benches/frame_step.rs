//! Benchmarks for the per-frame CPU work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use plexus::{
    AnimatorConfig, Connections, ParticleFieldAnimator, RasterSurface, RecordingSurface,
    SpawnContext, SurfaceSize,
};

fn bench_connections(c: &mut Criterion) {
    let mut group = c.benchmark_group("connections");
    let size = SurfaceSize::new(1280.0, 720.0);

    for count in [50, 100, 200, 400] {
        let particles = SpawnContext::new(Some(7)).spawn_pool(count, size, 0.5);
        group.bench_with_input(BenchmarkId::from_parameter(count), &particles, |b, particles| {
            b.iter(|| black_box(Connections::new(particles, 150.0, 0.2).count()))
        });
    }

    group.finish();
}

fn bench_frame_recording(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_recording");

    for count in [50, 100, 200] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let config = AnimatorConfig::new().with_particle_count(count).with_seed(7);
            let surface = RecordingSurface::new(1280.0, 720.0);
            let log = surface.log();
            let mut animator = ParticleFieldAnimator::start(surface, config).unwrap();
            b.iter(|| {
                log.clear();
                black_box(animator.frame().unwrap())
            })
        });
    }

    group.finish();
}

fn bench_frame_raster(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_raster");
    group.sample_size(20);

    for (width, height) in [(640, 360), (1280, 720)] {
        let id = format!("{width}x{height}");
        group.bench_function(id, |b| {
            let config = AnimatorConfig::new().with_particle_count(60).with_seed(7);
            let mut animator =
                ParticleFieldAnimator::start(RasterSurface::new(width, height), config).unwrap();
            b.iter(|| black_box(animator.frame().unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_connections, bench_frame_recording, bench_frame_raster);
criterion_main!(benches);
