//! Animator configuration and the built-in presets.
//!
//! An [`AnimatorConfig`] is fixed for the lifetime of one animation run. Use
//! method chaining to tune it, or start from a [`Preset`]:
//!
//! ```ignore
//! use plexus::{AnimatorConfig, Preset};
//!
//! let config = AnimatorConfig::from(Preset::Crimson)
//!     .with_particle_count(80)
//!     .with_connection_distance(140.0)
//!     .with_seed(7);
//! ```
//!
//! Configs serialize to JSON, so a page can ship its tuning as a file.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A color stop of the background gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position along the gradient axis (0.0 = start, 1.0 = end).
    pub offset: f32,
    /// Stop color (RGB, 0.0-1.0).
    pub color: Vec3,
    /// Stop opacity (0.0-1.0).
    #[serde(default = "one")]
    pub alpha: f32,
}

fn one() -> f32 {
    1.0
}

impl GradientStop {
    /// Opaque stop at `offset`.
    pub fn new(offset: f32, color: Vec3) -> Self {
        Self {
            offset,
            color,
            alpha: 1.0,
        }
    }
}

/// Tuning for one run of the particle field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorConfig {
    /// Number of particles in the pool.
    pub particle_count: usize,
    /// Velocity components are drawn from `[-max_speed, max_speed]` (pixels/frame).
    pub max_speed: f32,
    /// Particles closer than this (pixels) are linked.
    pub connection_distance: f32,
    /// Connection line color (RGB, 0.0-1.0).
    pub connection_color: Vec3,
    /// Opacity of a connection between two coincident particles.
    pub max_connection_opacity: f32,
    /// Connection stroke width in pixels.
    pub connection_width: f32,
    /// Particle color (RGB, 0.0-1.0).
    pub particle_color: Vec3,
    /// Fixed particle opacity.
    pub particle_opacity: f32,
    /// Particle disc radius in pixels.
    pub particle_radius: f32,
    /// Background gradient stops, drawn after each clear. Empty = transparent.
    pub background: Vec<GradientStop>,
    /// Gradient direction in degrees (0 = to top, 90 = to right, 180 = to bottom).
    pub gradient_angle: f32,
    /// RNG seed for particle placement. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Preset::Crimson.config()
    }
}

impl AnimatorConfig {
    /// Create a config with the default preset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the symmetric velocity range.
    pub fn with_max_speed(mut self, speed: f32) -> Self {
        self.max_speed = speed;
        self
    }

    /// Set the connection distance threshold.
    pub fn with_connection_distance(mut self, distance: f32) -> Self {
        self.connection_distance = distance;
        self
    }

    /// Set connection color and maximum opacity.
    pub fn with_connections(mut self, color: Vec3, max_opacity: f32) -> Self {
        self.connection_color = color;
        self.max_connection_opacity = max_opacity;
        self
    }

    /// Set connection stroke width.
    pub fn with_connection_width(mut self, width: f32) -> Self {
        self.connection_width = width;
        self
    }

    /// Set particle color and opacity.
    pub fn with_particles(mut self, color: Vec3, opacity: f32) -> Self {
        self.particle_color = color;
        self.particle_opacity = opacity;
        self
    }

    /// Set particle disc radius.
    pub fn with_particle_radius(mut self, radius: f32) -> Self {
        self.particle_radius = radius;
        self
    }

    /// Set the background gradient.
    pub fn with_background(mut self, angle: f32, stops: Vec<GradientStop>) -> Self {
        self.gradient_angle = angle;
        self.background = stops;
        self
    }

    /// Fix the RNG seed so particle placement is reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every parameter, returning the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count == 0 {
            return Err(ConfigError::EmptyPool);
        }

        non_negative("max_speed", self.max_speed)?;
        non_negative("connection_distance", self.connection_distance)?;
        non_negative("connection_width", self.connection_width)?;
        non_negative("particle_radius", self.particle_radius)?;
        unit("max_connection_opacity", self.max_connection_opacity)?;
        unit("particle_opacity", self.particle_opacity)?;

        if !self.gradient_angle.is_finite() {
            return Err(ConfigError::Negative {
                field: "gradient_angle",
                value: self.gradient_angle,
            });
        }
        for stop in &self.background {
            unit("background.offset", stop.offset)?;
            unit("background.alpha", stop.alpha)?;
        }

        Ok(())
    }

    /// Parse a config from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write the config to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { field, value })
    }
}

/// Built-in tunings for the site's hero sections.
///
/// They differ only in particle count, palette and connection distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// White network over a red diagonal gradient (landing page).
    #[default]
    Crimson,
    /// Slate network over a pale background (services pages).
    Slate,
    /// Cyan network over a deep blue gradient (technology pages).
    Midnight,
}

impl Preset {
    /// All presets, in declaration order.
    pub const ALL: [Preset; 3] = [Preset::Crimson, Preset::Slate, Preset::Midnight];

    /// Lowercase preset name.
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Crimson => "crimson",
            Preset::Slate => "slate",
            Preset::Midnight => "midnight",
        }
    }

    /// The config for this preset.
    pub fn config(&self) -> AnimatorConfig {
        let base = AnimatorConfig {
            particle_count: 60,
            max_speed: 0.5,
            connection_distance: 150.0,
            connection_color: Vec3::ONE,
            max_connection_opacity: 0.2,
            connection_width: 1.0,
            particle_color: Vec3::ONE,
            particle_opacity: 0.5,
            particle_radius: 2.0,
            background: Vec::new(),
            gradient_angle: 135.0,
            seed: None,
        };

        match self {
            Preset::Crimson => AnimatorConfig {
                background: vec![
                    GradientStop::new(0.0, Vec3::new(0.863, 0.149, 0.149)),
                    GradientStop::new(1.0, Vec3::new(0.973, 0.443, 0.443)),
                ],
                ..base
            },
            Preset::Slate => AnimatorConfig {
                particle_count: 50,
                connection_distance: 120.0,
                connection_color: Vec3::new(0.118, 0.161, 0.231),
                max_connection_opacity: 0.15,
                particle_color: Vec3::new(0.118, 0.161, 0.231),
                particle_opacity: 0.4,
                background: vec![
                    GradientStop::new(0.0, Vec3::new(0.973, 0.980, 0.988)),
                    GradientStop::new(1.0, Vec3::new(0.886, 0.910, 0.941)),
                ],
                gradient_angle: 180.0,
                ..base
            },
            Preset::Midnight => AnimatorConfig {
                particle_count: 55,
                connection_distance: 130.0,
                connection_color: Vec3::new(0.404, 0.910, 0.976),
                max_connection_opacity: 0.3,
                particle_color: Vec3::new(0.404, 0.910, 0.976),
                particle_opacity: 0.6,
                background: vec![
                    GradientStop::new(0.0, Vec3::new(0.059, 0.090, 0.165)),
                    GradientStop::new(0.6, Vec3::new(0.118, 0.227, 0.541)),
                    GradientStop::new(1.0, Vec3::new(0.192, 0.180, 0.506)),
                ],
                ..base
            },
        }
    }
}

impl From<Preset> for AnimatorConfig {
    fn from(preset: Preset) -> Self {
        preset.config()
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a preset name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown preset `{0}` (expected crimson, slate or midnight)")]
pub struct UnknownPreset(pub String);

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}
