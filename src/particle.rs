//! The particle: a point with a velocity, bounced and clamped inside the surface.

use glam::Vec2;

use crate::surface::SurfaceSize;

/// A single animated point.
///
/// Positions are in surface-space pixels (y down), velocities in pixels per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Current position.
    pub position: Vec2,
    /// Displacement applied every frame.
    pub velocity: Vec2,
}

impl Particle {
    /// Create a particle.
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self { position, velocity }
    }

    /// Advance one frame inside `bounds`.
    ///
    /// Moves by the velocity, flips any velocity component whose axis left
    /// `[0, extent]`, then clamps the position back onto the surface. The
    /// overshoot is not reflected: a particle that crossed an edge sits on it.
    pub fn step(&mut self, bounds: SurfaceSize) {
        self.position += self.velocity;

        if self.position.x < 0.0 || self.position.x > bounds.width {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y < 0.0 || self.position.y > bounds.height {
            self.velocity.y = -self.velocity.y;
        }

        self.position.x = self.position.x.max(0.0).min(bounds.width);
        self.position.y = self.position.y.max(0.0).min(bounds.height);
    }
}
