//! # Plexus - animated neural-network backgrounds
//!
//! A small particle simulation drawn as a "network": points drift across a
//! surface, bounce off its edges, and nearby points are linked by lines that
//! fade out with distance.
//!
//! ## Quick Start
//!
//! ```ignore
//! use plexus::prelude::*;
//!
//! let config = AnimatorConfig::from(Preset::Crimson).with_seed(42);
//! let mut animator = ParticleFieldAnimator::start(RasterSurface::new(800, 600), config)?;
//!
//! while animator.frame()? == FrameStatus::Scheduled {
//!     // hand control back to the display-refresh loop
//! #   break;
//! }
//! animator.stop();
//! ```
//!
//! ## Core Concepts
//!
//! ### Surfaces
//!
//! The animator draws through a [`DrawContext`] obtained from a [`Surface`].
//! Three are provided:
//!
//! | Surface | Draws into |
//! |---------|------------|
//! | [`RasterSurface`] | an `image::RgbaImage` (headless, snapshots) |
//! | [`RecordingSurface`] | a call log (tests) |
//! | `GpuSurface` | a winit window through wgpu (feature `gpu`) |
//!
//! ### Frames
//!
//! Each frame clears the surface, paints the background gradient, moves
//! every particle, strokes the connections and finally fills the particles.
//! The host decides *when* frames run: call
//! [`ParticleFieldAnimator::frame`] from the display-refresh callback while it
//! returns [`FrameStatus::Scheduled`].
//!
//! ### Lifecycle
//!
//! [`ParticleFieldAnimator::start`] on mount, [`ParticleFieldAnimator::stop`]
//! (or [`AnimatorHandle::stop`]) on unmount. After stopping, no further
//! drawing happens, even from frame callbacks that were already queued.

mod animator;
pub mod clock;
pub mod config;
pub mod connections;
pub mod error;
#[cfg(feature = "gpu")]
pub mod gpu;
pub mod particle;
pub mod raster;
pub mod schedule;
pub mod spawn;
pub mod surface;

pub use animator::{AnimatorHandle, ParticleFieldAnimator, SurfaceState};
pub use clock::FrameClock;
pub use config::{AnimatorConfig, GradientStop, Preset};
pub use connections::{connection_opacity, Connection, Connections};
pub use error::{AnimatorError, ConfigError, RenderError, SurfaceError};
pub use glam::{Vec2, Vec3, Vec4};
pub use particle::Particle;
pub use raster::{RasterContext, RasterSurface};
pub use schedule::{CancellationToken, FrameStatus};
pub use spawn::SpawnContext;
pub use surface::recording::{DrawCall, DrawLog, RecordingSurface};
pub use surface::{DrawContext, Surface, SurfaceSize};

#[cfg(feature = "gpu")]
pub use gpu::{GpuContext, GpuSurface};

/// Prelude module for convenient imports.
///
/// ```ignore
/// use plexus::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        AnimatorConfig, AnimatorError, AnimatorHandle, FrameStatus, GradientStop,
        ParticleFieldAnimator, Preset, RasterSurface, Surface, SurfaceSize, Vec2, Vec3, Vec4,
    };

    #[cfg(feature = "gpu")]
    pub use crate::GpuSurface;
}
