//! Drawing surfaces.
//!
//! A [`Surface`] is whatever the host hands the animator to draw on: a window,
//! an off-screen image, a test spy. Starting an animator consumes the surface
//! and asks it for a [`DrawContext`], which the animator then owns exclusively
//! until it stops.
//!
//! All coordinates are surface-space pixels with the origin at the top-left
//! corner and y pointing down. Colors are straight (non-premultiplied) RGBA
//! in `0.0..=1.0`.

pub mod recording;

use glam::{Vec2, Vec4};

use crate::config::GradientStop;
use crate::error::{RenderError, SurfaceError};

/// Width and height of a drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceSize {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl SurfaceSize {
    /// Create a size. Negative or NaN extents collapse to zero.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    /// Size of a pixel buffer.
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    /// The far corner of the surface.
    #[inline]
    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Pixel dimensions, rounded to the nearest whole pixel.
    pub fn to_pixels(&self) -> (u32, u32) {
        (self.width.round() as u32, self.height.round() as u32)
    }

    /// Whether the surface covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

fn sanitize(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

/// A drawing target that can produce a 2-D drawing context.
pub trait Surface {
    /// The context the animator draws through.
    type Context: DrawContext;

    /// Current bounds of the surface.
    fn size(&self) -> SurfaceSize;

    /// Consume the surface and produce its 2-D drawing context.
    fn context_2d(self) -> Result<Self::Context, SurfaceError>;
}

/// 2-D drawing operations used by the animator.
///
/// Every call may fail with a [`RenderError`]; the animator treats any
/// failure as fatal to the run.
pub trait DrawContext {
    /// Current size of the drawing buffer.
    fn size(&self) -> SurfaceSize;

    /// Resize the drawing buffer. Contents after a resize are unspecified.
    fn resize(&mut self, size: SurfaceSize) -> Result<(), RenderError>;

    /// Clear the whole buffer to transparent.
    fn clear(&mut self) -> Result<(), RenderError>;

    /// Fill the whole buffer with a linear gradient.
    fn fill_gradient(&mut self, angle: f32, stops: &[GradientStop]) -> Result<(), RenderError>;

    /// Stroke a straight line segment.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec4) -> Result<(), RenderError>;

    /// Fill a disc.
    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Vec4) -> Result<(), RenderError>;

    /// Finish the frame. Batching backends submit their work here.
    fn present(&mut self) -> Result<(), RenderError> {
        Ok(())
    }
}

/// A linear gradient resolved against a surface, CSS `linear-gradient` style.
///
/// The angle is measured clockwise from "to top"; the gradient line passes
/// through the center and is long enough that the corners hit the first and
/// last stops.
#[derive(Debug, Clone)]
pub struct Gradient {
    start: Vec2,
    /// Direction divided by the gradient line length.
    axis: Vec2,
    stops: Vec<GradientStop>,
}

impl Gradient {
    /// Resolve `stops` along `angle` (degrees) over `size`.
    ///
    /// Stop offsets are made non-decreasing, as CSS does.
    pub fn new(angle: f32, stops: &[GradientStop], size: SurfaceSize) -> Self {
        let theta = angle.to_radians();
        let dir = Vec2::new(theta.sin(), -theta.cos());
        let length = (size.width * dir.x).abs() + (size.height * dir.y).abs();
        let center = size.extent() * 0.5;
        let start = center - dir * (length * 0.5);
        let axis = if length > 0.0 { dir / length } else { Vec2::ZERO };

        let mut resolved = Vec::with_capacity(stops.len());
        let mut floor = 0.0f32;
        for stop in stops {
            let offset = stop.offset.max(floor);
            floor = offset;
            resolved.push(GradientStop { offset, ..*stop });
        }

        Self {
            start,
            axis,
            stops: resolved,
        }
    }

    /// Start of the gradient line.
    pub fn start(&self) -> Vec2 {
        self.start
    }

    /// Gradient direction scaled by the inverse line length.
    pub fn axis(&self) -> Vec2 {
        self.axis
    }

    /// The resolved stops.
    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Position of `point` along the gradient line (0 at start, 1 at end).
    #[inline]
    pub fn position(&self, point: Vec2) -> f32 {
        (point - self.start).dot(self.axis)
    }

    /// Color at `point`; transparent when there are no stops.
    pub fn sample(&self, point: Vec2) -> Vec4 {
        self.sample_at(self.position(point))
    }

    /// Color at gradient position `t`.
    pub fn sample_at(&self, t: f32) -> Vec4 {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Vec4::ZERO,
        };
        if t <= first.offset {
            return first.color.extend(first.alpha);
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                let f = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
                return a.color.extend(a.alpha).lerp(b.color.extend(b.alpha), f);
            }
        }
        last.color.extend(last.alpha)
    }
}
