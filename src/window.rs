use std::sync::Arc;

use plexus::{
    AnimatorConfig, AnimatorError, AnimatorHandle, FrameClock, FrameStatus, GpuSurface,
    ParticleFieldAnimator,
};
use tracing::{debug, error};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

/// Hosts one animator in a window: mounts it on resume, forwards resizes,
/// drives frames from redraw requests and unmounts it on close.
pub struct App {
    config: AnimatorConfig,
    window: Option<Arc<Window>>,
    animator: Option<ParticleFieldAnimator<GpuSurface>>,
    handle: Option<AnimatorHandle>,
    clock: FrameClock,
    error: Option<AnimatorError>,
}

impl App {
    pub fn new(config: AnimatorConfig) -> Self {
        Self {
            config,
            window: None,
            animator: None,
            handle: None,
            clock: FrameClock::new(),
            error: None,
        }
    }

    /// The error that ended the run, if any.
    pub fn take_error(&mut self) -> Option<AnimatorError> {
        self.error.take()
    }

    fn fail(&mut self, err: AnimatorError, event_loop: &ActiveEventLoop) {
        error!(error = %err, "particle field failed");
        if let Some(animator) = &mut self.animator {
            animator.stop();
        }
        self.error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("Plexus")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!(error = %e, "failed to create window");
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        match ParticleFieldAnimator::start(GpuSurface::new(window.clone()), self.config.clone()) {
            Ok(animator) => {
                self.handle = Some(animator.handle());
                self.animator = Some(animator);
                window.request_redraw();
            }
            Err(e) => self.fail(e, event_loop),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(animator) = &mut self.animator {
                    animator.stop();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(handle) = &self.handle {
                    handle.on_resize(size.width as f32, size.height as f32);
                    // Redraw requests coalesce, so this only restarts a loop
                    // that stalled while the window was minimized.
                    if !handle.is_stopped() {
                        if let Some(window) = &self.window {
                            window.request_redraw();
                        }
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(animator) = &mut self.animator else {
                    return;
                };
                match animator.frame() {
                    Ok(FrameStatus::Scheduled) => {
                        if let Some(fps) = self.clock.tick() {
                            debug!(fps, frames = self.clock.frame(), "frame rate");
                        }
                        if let Some(window) = &self.window {
                            window.request_redraw();
                        }
                    }
                    Ok(FrameStatus::Stopped) => {}
                    Err(e) => self.fail(e, event_loop),
                }
            }
            _ => {}
        }
    }
}
