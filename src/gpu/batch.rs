//! CPU-side geometry for one frame of shapes.
//!
//! Lines and discs become screen-space quads in the order they are drawn, so
//! a single draw call keeps particles above their connections. Each vertex
//! carries its offset from the shape's spine (`local`) and the shape's
//! extent, from which the fragment shader derives one pixel of coverage
//! falloff.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};

/// Extra pixels around every shape for the anti-aliased edge.
const AA_PAD: f32 = 1.0;

/// Shape kind stored in [`ShapeVertex::shape`].
const KIND_LINE: f32 = 0.0;
const KIND_DISC: f32 = 1.0;

/// Vertex of the shape pipeline.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ShapeVertex {
    /// Surface-space position in pixels.
    pub position: [f32; 2],
    /// Straight-alpha RGBA.
    pub color: [f32; 4],
    /// Offset from the line spine or disc center, in pixels.
    pub local: [f32; 2],
    /// `(half width or radius, kind)`.
    pub shape: [f32; 2],
}

impl ShapeVertex {
    pub(crate) const ATTRIBUTES: [wgpu::VertexAttribute; 4] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4, 2 => Float32x2, 3 => Float32x2];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ShapeVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Triangle list of the shapes drawn so far this frame.
#[derive(Debug, Default)]
pub struct ShapeBatch {
    vertices: Vec<ShapeVertex>,
}

impl ShapeBatch {
    /// An empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all shapes.
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// Vertices queued so far.
    pub fn vertices(&self) -> &[ShapeVertex] {
        &self.vertices
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Queue a line of `width` pixels from `from` to `to`.
    pub fn push_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec4) {
        let half = width * 0.5;
        let delta = to - from;
        let dir = delta.try_normalize().unwrap_or(Vec2::X);
        let reach = half + AA_PAD;
        let normal = dir.perp() * reach;

        let corners = [
            (from - normal, Vec2::new(-reach, 0.0)),
            (from + normal, Vec2::new(reach, 0.0)),
            (to - normal, Vec2::new(-reach, 0.0)),
            (to + normal, Vec2::new(reach, 0.0)),
        ];
        self.push_quad(corners, color, [half, KIND_LINE]);
    }

    /// Queue a filled disc.
    pub fn push_disc(&mut self, center: Vec2, radius: f32, color: Vec4) {
        let reach = radius + AA_PAD;
        let corner = |sx: f32, sy: f32| {
            let offset = Vec2::new(sx * reach, sy * reach);
            (center + offset, offset)
        };
        let corners = [
            corner(-1.0, -1.0),
            corner(1.0, -1.0),
            corner(-1.0, 1.0),
            corner(1.0, 1.0),
        ];
        self.push_quad(corners, color, [radius, KIND_DISC]);
    }

    fn push_quad(&mut self, corners: [(Vec2, Vec2); 4], color: Vec4, shape: [f32; 2]) {
        let vertex = |(position, local): (Vec2, Vec2)| ShapeVertex {
            position: position.to_array(),
            color: color.to_array(),
            local: local.to_array(),
            shape,
        };
        for i in [0, 1, 2, 2, 1, 3] {
            self.vertices.push(vertex(corners[i]));
        }
    }
}
