//! Spawn context for particle initialization.
//!
//! Owns the random source used to seed the pool. Pass a seed for
//! reproducible placement; without one the RNG is seeded from entropy.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::particle::Particle;
use crate::surface::SurfaceSize;

/// Random source and helpers for seeding a particle pool.
///
/// ```ignore
/// let mut ctx = SpawnContext::new(Some(42));
/// let particles = ctx.spawn_pool(60, SurfaceSize::new(800.0, 600.0), 0.5);
/// ```
pub struct SpawnContext {
    rng: SmallRng,
    seed: Option<u64>,
}

impl SpawnContext {
    /// Create a spawn context, seeded if `seed` is given.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self { rng, seed }
    }

    /// The seed this context was created with, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    // ========== Random primitives ==========

    /// Random f32 in `[0, 1)`.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[-magnitude, magnitude]`.
    #[inline]
    pub fn random_signed(&mut self, magnitude: f32) -> f32 {
        (self.rng.gen::<f32>() * 2.0 - 1.0) * magnitude
    }

    // ========== Particle helpers ==========

    /// Uniform point in `[0, width) × [0, height)`.
    pub fn random_in_rect(&mut self, size: SurfaceSize) -> Vec2 {
        Vec2::new(self.random() * size.width, self.random() * size.height)
    }

    /// Velocity with each axis uniform in `[-max_speed, max_speed]`.
    pub fn random_velocity(&mut self, max_speed: f32) -> Vec2 {
        Vec2::new(self.random_signed(max_speed), self.random_signed(max_speed))
    }

    /// Allocate a pool of `count` particles spread over `size`.
    pub fn spawn_pool(&mut self, count: usize, size: SurfaceSize, max_speed: f32) -> Vec<Particle> {
        (0..count)
            .map(|_| Particle::new(self.random_in_rect(size), self.random_velocity(max_speed)))
            .collect()
    }
}
