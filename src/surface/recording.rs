//! A spy surface that records every draw call.
//!
//! Useful for testing hosts and the animator itself: the [`DrawLog`] stays
//! readable after the animator has released the context.
//!
//! ```ignore
//! let surface = RecordingSurface::new(800.0, 600.0);
//! let log = surface.log();
//! let mut animator = ParticleFieldAnimator::start(surface, config)?;
//! animator.frame()?;
//! assert_eq!(log.discs(), config.particle_count);
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use glam::{Vec2, Vec4};

use super::{DrawContext, Surface, SurfaceSize};
use crate::config::GradientStop;
use crate::error::{RenderError, SurfaceError};

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    /// Buffer resized.
    Resize(SurfaceSize),
    /// Buffer cleared.
    Clear,
    /// Gradient fill with the given number of stops.
    Gradient {
        /// Gradient angle in degrees.
        angle: f32,
        /// Number of stops.
        stops: usize,
    },
    /// Line stroke.
    Line {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
        /// Stroke width.
        width: f32,
        /// Stroke color (alpha = opacity).
        color: Vec4,
    },
    /// Disc fill.
    Disc {
        /// Disc center.
        center: Vec2,
        /// Disc radius.
        radius: f32,
        /// Fill color (alpha = opacity).
        color: Vec4,
    },
    /// Frame presented.
    Present,
}

#[derive(Debug, Default)]
struct LogState {
    calls: Vec<DrawCall>,
    detached: bool,
    released: bool,
    fail_after: Option<usize>,
}

/// Shared view of the calls made on a [`RecordingContext`].
#[derive(Debug, Clone, Default)]
pub struct DrawLog {
    inner: Arc<Mutex<LogState>>,
}

impl DrawLog {
    fn state(&self) -> MutexGuard<'_, LogState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of every recorded call.
    pub fn calls(&self) -> Vec<DrawCall> {
        self.state().calls.clone()
    }

    /// Number of recorded calls.
    pub fn len(&self) -> usize {
        self.state().calls.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget recorded calls.
    pub fn clear(&self) {
        self.state().calls.clear();
    }

    /// Number of frames begun (clear calls).
    pub fn frames(&self) -> usize {
        self.count(|c| matches!(c, DrawCall::Clear))
    }

    /// Number of line strokes.
    pub fn lines(&self) -> usize {
        self.count(|c| matches!(c, DrawCall::Line { .. }))
    }

    /// Number of disc fills.
    pub fn discs(&self) -> usize {
        self.count(|c| matches!(c, DrawCall::Disc { .. }))
    }

    /// Number of calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&DrawCall) -> bool) -> usize {
        self.state().calls.iter().filter(|c| pred(c)).count()
    }

    /// Simulate the surface being destroyed: every later call fails.
    pub fn detach(&self) {
        self.state().detached = true;
    }

    /// Fail every call after `n` more successful ones.
    pub fn fail_after(&self, n: usize) {
        let mut state = self.state();
        state.fail_after = Some(state.calls.len() + n);
    }

    /// Whether the context has been dropped.
    pub fn is_released(&self) -> bool {
        self.state().released
    }

    fn record(&self, call: DrawCall) -> Result<(), RenderError> {
        let mut state = self.state();
        if state.detached || state.fail_after.is_some_and(|limit| state.calls.len() >= limit) {
            return Err(RenderError::Detached);
        }
        state.calls.push(call);
        Ok(())
    }
}

/// A surface whose context records instead of drawing.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: SurfaceSize,
    log: DrawLog,
    available: bool,
}

impl RecordingSurface {
    /// A spy surface of the given size.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: SurfaceSize::new(width, height),
            log: DrawLog::default(),
            available: true,
        }
    }

    /// Make [`Surface::context_2d`] fail.
    pub fn without_context(mut self) -> Self {
        self.available = false;
        self
    }

    /// Handle to the call log.
    pub fn log(&self) -> DrawLog {
        self.log.clone()
    }
}

impl Surface for RecordingSurface {
    type Context = RecordingContext;

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn context_2d(self) -> Result<RecordingContext, SurfaceError> {
        if !self.available {
            return Err(SurfaceError::NoContext("recording surface has no context".into()));
        }
        Ok(RecordingContext {
            size: self.size,
            log: self.log,
        })
    }
}

/// Context produced by [`RecordingSurface`].
#[derive(Debug)]
pub struct RecordingContext {
    size: SurfaceSize,
    log: DrawLog,
}

impl DrawContext for RecordingContext {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) -> Result<(), RenderError> {
        self.log.record(DrawCall::Resize(size))?;
        self.size = size;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        self.log.record(DrawCall::Clear)
    }

    fn fill_gradient(&mut self, angle: f32, stops: &[GradientStop]) -> Result<(), RenderError> {
        self.log.record(DrawCall::Gradient {
            angle,
            stops: stops.len(),
        })
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec4) -> Result<(), RenderError> {
        self.log.record(DrawCall::Line { from, to, width, color })
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Vec4) -> Result<(), RenderError> {
        self.log.record(DrawCall::Disc { center, radius, color })
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.log.record(DrawCall::Present)
    }
}

impl Drop for RecordingContext {
    fn drop(&mut self) {
        self.log.state().released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_calls_in_order() {
        let surface = RecordingSurface::new(10.0, 10.0);
        let log = surface.log();
        let mut ctx = surface.context_2d().unwrap();
        ctx.clear().unwrap();
        ctx.fill_disc(Vec2::ONE, 2.0, Vec4::ONE).unwrap();
        ctx.present().unwrap();

        let calls = log.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], DrawCall::Clear);
        assert!(matches!(calls[1], DrawCall::Disc { radius, .. } if radius == 2.0));
        assert_eq!(calls[2], DrawCall::Present);
    }

    #[test]
    fn test_without_context_refuses() {
        let surface = RecordingSurface::new(10.0, 10.0).without_context();
        assert!(matches!(surface.context_2d(), Err(SurfaceError::NoContext(_))));
    }

    #[test]
    fn test_detach_fails_later_calls() {
        let surface = RecordingSurface::new(10.0, 10.0);
        let log = surface.log();
        let mut ctx = surface.context_2d().unwrap();
        log.detach();
        assert!(matches!(ctx.clear(), Err(RenderError::Detached)));
        assert!(log.is_empty());
    }

    #[test]
    fn test_fail_after_counts_from_now() {
        let surface = RecordingSurface::new(10.0, 10.0);
        let log = surface.log();
        let mut ctx = surface.context_2d().unwrap();
        ctx.clear().unwrap();
        log.fail_after(1);
        ctx.clear().unwrap();
        assert!(ctx.clear().is_err());
        assert_eq!(log.frames(), 2);
    }

    #[test]
    fn test_drop_marks_released() {
        let surface = RecordingSurface::new(10.0, 10.0);
        let log = surface.log();
        let ctx = surface.context_2d().unwrap();
        assert!(!log.is_released());
        drop(ctx);
        assert!(log.is_released());
    }
}
