//! The particle field animator.
//!
//! One [`ParticleFieldAnimator`] per mounted region: the host starts it on
//! mount, calls [`frame`](ParticleFieldAnimator::frame) from its
//! display-refresh callback for as long as it returns
//! [`FrameStatus::Scheduled`], forwards viewport changes to
//! [`on_resize`](ParticleFieldAnimator::on_resize) and calls
//! [`stop`](ParticleFieldAnimator::stop) on unmount.
//!
//! ```ignore
//! let mut animator = ParticleFieldAnimator::start(surface, Preset::Crimson.into())?;
//! let handle = animator.handle();
//!
//! // display refresh
//! if animator.frame()? == FrameStatus::Scheduled {
//!     window.request_redraw();
//! }
//!
//! // viewport change, from anywhere
//! handle.on_resize(1024.0, 768.0);
//! ```

use std::sync::{Arc, Mutex};

use tracing::{debug, error, info};

use crate::config::AnimatorConfig;
use crate::connections::Connections;
use crate::error::{AnimatorError, RenderError};
use crate::particle::Particle;
use crate::schedule::{CancellationToken, FrameStatus, FrameTask};
use crate::spawn::SpawnContext;
use crate::surface::{DrawContext, Surface, SurfaceSize};

/// Latest known viewport bounds, shared between the animator and its handles.
#[derive(Debug, Clone, Default)]
pub struct SurfaceState {
    size: Arc<Mutex<SurfaceSize>>,
}

impl SurfaceState {
    fn new(size: SurfaceSize) -> Self {
        Self {
            size: Arc::new(Mutex::new(size)),
        }
    }

    /// Current bounds.
    pub fn get(&self) -> SurfaceSize {
        *self.size.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set(&self, size: SurfaceSize) {
        *self.size.lock().unwrap_or_else(|e| e.into_inner()) = size;
    }
}

/// Cloneable control over a running animator.
///
/// Handles only flip the cancellation token and record viewport bounds;
/// they never draw.
#[derive(Debug, Clone)]
pub struct AnimatorHandle {
    token: CancellationToken,
    state: SurfaceState,
}

impl AnimatorHandle {
    /// Stop the animator. Pending frames will not run; the surface is
    /// released at the next frame callback or when the animator is dropped.
    pub fn stop(&self) {
        if self.token.cancel() {
            info!("particle field stopped by handle");
        }
    }

    /// Record new viewport bounds. Takes effect at the next frame.
    pub fn on_resize(&self, width: f32, height: f32) {
        let size = SurfaceSize::new(width, height);
        debug!(width = size.width, height = size.height, "viewport resized");
        self.state.set(size);
    }

    /// Whether the run has ended.
    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Latest recorded bounds.
    pub fn surface_state(&self) -> SurfaceSize {
        self.state.get()
    }
}

/// Runs the particle simulation and draws it onto an owned surface.
pub struct ParticleFieldAnimator<S: Surface> {
    config: AnimatorConfig,
    particles: Vec<Particle>,
    context: Option<S::Context>,
    state: SurfaceState,
    task: FrameTask,
    frames: u64,
    pairs_checked: usize,
}

impl<S: Surface> ParticleFieldAnimator<S> {
    /// Validate `config`, take the surface's drawing context, seed the pool
    /// and schedule the first frame.
    ///
    /// Nothing is allocated when the config is invalid or the surface has no
    /// 2-D context.
    pub fn start(surface: S, config: AnimatorConfig) -> Result<Self, AnimatorError> {
        config.validate()?;

        let size = surface.size();
        let context = surface.context_2d()?;

        let particles =
            SpawnContext::new(config.seed).spawn_pool(config.particle_count, size, config.max_speed);

        let mut task = FrameTask::new(CancellationToken::new());
        task.schedule();

        info!(
            particles = particles.len(),
            width = size.width,
            height = size.height,
            seed = ?config.seed,
            "particle field started"
        );

        Ok(Self {
            config,
            particles,
            context: Some(context),
            state: SurfaceState::new(size),
            task,
            frames: 0,
            pairs_checked: 0,
        })
    }

    /// A handle for collaborators that cannot borrow the animator.
    pub fn handle(&self) -> AnimatorHandle {
        AnimatorHandle {
            token: self.task.token().clone(),
            state: self.state.clone(),
        }
    }

    /// Run the scheduled frame.
    ///
    /// Returns [`FrameStatus::Stopped`] without touching particles or the
    /// surface when no live frame is pending. A render failure stops the
    /// animator and is returned; later calls return `Stopped`.
    pub fn frame(&mut self) -> Result<FrameStatus, AnimatorError> {
        if !self.task.take() {
            if self.context.is_some() && self.task.token().is_cancelled() {
                debug!("frame callback after stop ignored");
                self.release();
            }
            return Ok(FrameStatus::Stopped);
        }

        match self.render() {
            Ok(()) => {
                self.frames += 1;
                Ok(self.task.schedule())
            }
            Err(e) => {
                error!(error = %e, frame = self.frames, "render failed, stopping particle field");
                self.task.cancel();
                self.release();
                Err(e.into())
            }
        }
    }

    fn render(&mut self) -> Result<(), RenderError> {
        let Self {
            config,
            particles,
            context,
            state,
            pairs_checked,
            ..
        } = self;
        let ctx = context.as_mut().ok_or(RenderError::Detached)?;

        let size = state.get();
        if ctx.size() != size {
            debug!(width = size.width, height = size.height, "resizing drawing surface");
            ctx.resize(size)?;
        }

        ctx.clear()?;
        if !config.background.is_empty() {
            ctx.fill_gradient(config.gradient_angle, &config.background)?;
        }

        for p in particles.iter_mut() {
            p.step(size);
        }

        let mut connections = Connections::new(
            particles,
            config.connection_distance,
            config.max_connection_opacity,
        );
        for c in connections.by_ref() {
            let color = config.connection_color.extend(c.opacity);
            ctx.stroke_line(c.from, c.to, config.connection_width, color)?;
        }
        *pairs_checked = connections.pairs_checked();

        let disc = config.particle_color.extend(config.particle_opacity);
        for p in particles.iter() {
            ctx.fill_disc(p.position, config.particle_radius, disc)?;
        }

        ctx.present()
    }

    /// Record new viewport bounds. Particles are left untouched; the drawing
    /// surface is resized at the next frame.
    pub fn on_resize(&self, width: f32, height: f32) {
        let size = SurfaceSize::new(width, height);
        debug!(width = size.width, height = size.height, "viewport resized");
        self.state.set(size);
    }

    /// Cancel the scheduled frame and release the surface. Idempotent.
    pub fn stop(&mut self) {
        if self.task.cancel() {
            info!(frames = self.frames, "particle field stopped");
        }
        self.release();
    }

    fn release(&mut self) {
        if self.context.take().is_some() {
            debug!("drawing surface released");
        }
    }

    /// Whether frames are still being scheduled.
    pub fn is_running(&self) -> bool {
        !self.task.token().is_cancelled()
    }

    /// The particle pool.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// The config this run was started with.
    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    /// Latest recorded viewport bounds.
    pub fn surface_state(&self) -> SurfaceSize {
        self.state.get()
    }

    /// Frames rendered so far.
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Pairs evaluated by the last frame's connection pass.
    pub fn pairs_checked(&self) -> usize {
        self.pairs_checked
    }

    /// The drawing context, while the animator holds one.
    pub fn context(&self) -> Option<&S::Context> {
        self.context.as_ref()
    }
}

impl<S: Surface> Drop for ParticleFieldAnimator<S> {
    fn drop(&mut self) {
        self.task.cancel();
    }
}
