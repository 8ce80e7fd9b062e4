//! Frame timing for hosts.
//!
//! The simulation itself advances a fixed step per frame; the clock only
//! measures how often frames actually arrive, so a host can report FPS.
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//!
//! // In your refresh callback:
//! if let Some(fps) = clock.tick() {
//!     tracing::debug!(fps, "frame rate");
//! }
//! ```

use std::time::{Duration, Instant};

/// Counts frames and periodically recomputes the frame rate.
#[derive(Debug)]
pub struct FrameClock {
    created: Instant,
    previous: Instant,
    delta: Duration,
    frames: u64,
    fps: f32,
    // Window over which `fps` is averaged.
    window_start: Instant,
    window_frames: u64,
    interval: Duration,
}

impl FrameClock {
    /// A clock reporting every two seconds.
    pub fn new() -> Self {
        Self::with_interval(Duration::from_secs(2))
    }

    /// A clock recomputing FPS every `interval`.
    pub fn with_interval(interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            created: now,
            previous: now,
            delta: Duration::ZERO,
            frames: 0,
            fps: 0.0,
            window_start: now,
            window_frames: 0,
            interval,
        }
    }

    /// Record a frame. Returns the new FPS when the update interval elapsed.
    pub fn tick(&mut self) -> Option<f32> {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> Option<f32> {
        self.delta = now.saturating_duration_since(self.previous);
        self.previous = now;
        self.frames += 1;

        let window = now.saturating_duration_since(self.window_start);
        if window < self.interval || window.is_zero() {
            return None;
        }
        self.fps = (self.frames - self.window_frames) as f32 / window.as_secs_f32();
        self.window_frames = self.frames;
        self.window_start = now;
        Some(self.fps)
    }

    /// Total frames recorded.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frames
    }

    /// Last computed frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Time between the last two frames.
    #[inline]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Time since the clock was created.
    pub fn elapsed(&self) -> Duration {
        self.created.elapsed()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
