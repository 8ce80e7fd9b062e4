//! Error types for Plexus.
//!
//! This module provides error types for configuration validation, surface
//! acquisition and per-frame rendering.

use thiserror::Error;

/// Errors raised while validating or loading an [`AnimatorConfig`](crate::AnimatorConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The particle pool must hold at least one particle.
    #[error("particle count must be greater than zero")]
    EmptyPool,
    /// A numeric parameter is negative, NaN or infinite.
    #[error("`{field}` must be finite and non-negative, got {value}")]
    Negative {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// An opacity or gradient offset lies outside `[0, 1]`.
    #[error("`{field}` must lie within [0, 1], got {value}")]
    OutOfUnitRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// Failed to parse a JSON config.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// Failed to read or write a config file.
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised when a surface cannot produce a 2-D drawing context.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The surface refused to hand out a context.
    #[error("surface has no 2-D drawing context: {0}")]
    NoContext(String),
    /// No compatible GPU adapter found.
    #[cfg(feature = "gpu")]
    #[error("no compatible GPU adapter found: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),
    /// Failed to create a GPU surface for the window.
    #[cfg(feature = "gpu")]
    #[error("failed to create GPU surface: {0}")]
    Creation(#[from] wgpu::CreateSurfaceError),
    /// Failed to create the GPU device.
    #[cfg(feature = "gpu")]
    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

/// Errors raised while drawing a frame.
///
/// A render error is fatal to the running animator: it stops scheduling
/// frames and hands the error to the host.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The surface was detached or destroyed while the animator was running.
    #[error("drawing surface detached")]
    Detached,
    /// The GPU surface could not provide a frame.
    #[cfg(feature = "gpu")]
    #[error("GPU surface error: {0}")]
    Gpu(#[from] wgpu::SurfaceError),
    /// Failed to encode or write an image.
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

/// Errors surfaced by [`ParticleFieldAnimator`](crate::ParticleFieldAnimator).
#[derive(Debug, Error)]
pub enum AnimatorError {
    /// The config was rejected; nothing was allocated.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    /// The surface could not produce a drawing context; the animator did not start.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(#[from] SurfaceError),
    /// A frame failed to render; the animator has stopped.
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
}
