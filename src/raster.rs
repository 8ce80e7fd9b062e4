//! CPU rasterizer drawing into an RGBA image.
//!
//! Used for headless snapshots and pixel-level tests. Shapes are
//! anti-aliased by one pixel of coverage falloff and composited with
//! source-over blending on straight alpha, like a canvas 2-D context.
//!
//! ```ignore
//! let mut animator = ParticleFieldAnimator::start(RasterSurface::new(800, 600), config)?;
//! for _ in 0..120 {
//!     animator.frame()?;
//! }
//! if let Some(ctx) = animator.context() {
//!     ctx.save_png("hero.png")?;
//! }
//! ```

use std::path::Path;

use glam::{Vec2, Vec4};
use image::{Rgba, RgbaImage};

use crate::config::GradientStop;
use crate::error::{RenderError, SurfaceError};
use crate::surface::{DrawContext, Gradient, Surface, SurfaceSize};

/// An off-screen surface of a fixed pixel size.
#[derive(Debug, Clone, Copy)]
pub struct RasterSurface {
    width: u32,
    height: u32,
}

impl RasterSurface {
    /// A surface of `width × height` pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Surface for RasterSurface {
    type Context = RasterContext;

    fn size(&self) -> SurfaceSize {
        SurfaceSize::from_pixels(self.width, self.height)
    }

    fn context_2d(self) -> Result<RasterContext, SurfaceError> {
        Ok(RasterContext {
            image: RgbaImage::new(self.width, self.height),
        })
    }
}

/// Drawing context of a [`RasterSurface`].
#[derive(Debug, Clone)]
pub struct RasterContext {
    image: RgbaImage,
}

impl RasterContext {
    /// The rendered pixels.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Take the rendered pixels.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Write the current frame as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(RenderError::from)
    }

    /// Pixel bounding box of a shape, clipped to the image.
    fn clip(&self, min: Vec2, max: Vec2) -> Option<(u32, u32, u32, u32)> {
        let (w, h) = self.image.dimensions();
        if w == 0 || h == 0 {
            return None;
        }
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().max(0.0) as u32).min(w - 1);
        let y1 = (max.y.ceil().max(0.0) as u32).min(h - 1);
        if x0 > x1 || y0 > y1 {
            None
        } else {
            Some((x0, y0, x1, y1))
        }
    }

    /// Blend `color` into every pixel of the clip box, weighted by `coverage`.
    fn cover(&mut self, min: Vec2, max: Vec2, color: Vec4, coverage: impl Fn(Vec2) -> f32) {
        let Some((x0, y0, x1, y1)) = self.clip(min, max) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let c = coverage(center);
                if c > 0.0 {
                    blend(self.image.get_pixel_mut(x, y), color, c);
                }
            }
        }
    }
}

/// Source-over composite of straight-alpha `color` onto `dst`.
fn blend(dst: &mut Rgba<u8>, color: Vec4, coverage: f32) {
    let src_a = (color.w * coverage).clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }
    let [r, g, b, a] = dst.0;
    let dst_rgb = Vec4::new(r as f32, g as f32, b as f32, 0.0) / 255.0;
    let dst_a = a as f32 / 255.0;

    let out_a = src_a + dst_a * (1.0 - src_a);
    let src_rgb = color.truncate().extend(0.0).clamp(Vec4::ZERO, Vec4::ONE);
    let out_rgb = (src_rgb * src_a + dst_rgb * dst_a * (1.0 - src_a)) / out_a;

    dst.0 = [
        to_byte(out_rgb.x),
        to_byte(out_rgb.y),
        to_byte(out_rgb.z),
        to_byte(out_a),
    ];
}

#[inline]
fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let t = if len_sq > 0.0 {
        ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    p.distance(a + ab * t)
}

impl DrawContext for RasterContext {
    fn size(&self) -> SurfaceSize {
        let (w, h) = self.image.dimensions();
        SurfaceSize::from_pixels(w, h)
    }

    fn resize(&mut self, size: SurfaceSize) -> Result<(), RenderError> {
        let (w, h) = size.to_pixels();
        self.image = RgbaImage::new(w, h);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        for px in self.image.pixels_mut() {
            *px = Rgba([0, 0, 0, 0]);
        }
        Ok(())
    }

    fn fill_gradient(&mut self, angle: f32, stops: &[GradientStop]) -> Result<(), RenderError> {
        let gradient = Gradient::new(angle, stops, DrawContext::size(self));
        for (x, y, px) in self.image.enumerate_pixels_mut() {
            let color = gradient.sample(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
            blend(px, color, 1.0);
        }
        Ok(())
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec4) -> Result<(), RenderError> {
        let half = width * 0.5;
        let pad = Vec2::splat(half + 1.0);
        self.cover(from.min(to) - pad, from.max(to) + pad, color, |p| {
            (half + 0.5 - segment_distance(p, from, to)).clamp(0.0, 1.0)
        });
        Ok(())
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Vec4) -> Result<(), RenderError> {
        let pad = Vec2::splat(radius + 1.0);
        self.cover(center - pad, center + pad, color, |p| {
            (radius + 0.5 - p.distance(center)).clamp(0.0, 1.0)
        });
        Ok(())
    }
}
