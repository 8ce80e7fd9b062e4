//! wgpu backend drawing into a winit window.
//!
//! Each frame is batched on the CPU: `clear` starts a batch, the gradient and
//! shapes accumulate, and `present` uploads the vertices and submits one
//! render pass. Colors are blended in gamma space on a non-sRGB target so a
//! frame looks the same as on a canvas 2-D context.

mod batch;
mod shaders;

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};
use tracing::{debug, info, warn};
use wgpu::util::DeviceExt;
use winit::window::Window;

pub use batch::{ShapeBatch, ShapeVertex};
pub use shaders::MAX_GRADIENT_STOPS;

use crate::config::GradientStop;
use crate::error::{RenderError, SurfaceError};
use crate::surface::{DrawContext, Gradient, Surface, SurfaceSize};

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ViewportUniform {
    size: [f32; 2],
    _pad: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct GradientUniform {
    line: [f32; 4],
    info: [u32; 4],
    offsets: [[f32; 4]; 2],
    colors: [[f32; 4]; MAX_GRADIENT_STOPS],
}

impl GradientUniform {
    fn new(gradient: &Gradient) -> Self {
        let mut uniform = Self::zeroed();
        let start = gradient.start();
        let axis = gradient.axis();
        uniform.line = [start.x, start.y, axis.x, axis.y];

        let stops = gradient.stops();
        if stops.len() > MAX_GRADIENT_STOPS {
            warn!(
                stops = stops.len(),
                max = MAX_GRADIENT_STOPS,
                "gradient has too many stops, extra stops dropped"
            );
        }
        let stops = &stops[..stops.len().min(MAX_GRADIENT_STOPS)];
        uniform.info[0] = stops.len() as u32;
        for (i, stop) in stops.iter().enumerate() {
            uniform.offsets[i / 4][i % 4] = stop.offset;
            uniform.colors[i] = stop.color.extend(stop.alpha).to_array();
        }
        uniform
    }
}

/// A window the animator can draw on through wgpu.
pub struct GpuSurface {
    window: Arc<Window>,
}

impl GpuSurface {
    /// Wrap a window.
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl Surface for GpuSurface {
    type Context = GpuContext;

    fn size(&self) -> SurfaceSize {
        let size = self.window.inner_size();
        SurfaceSize::from_pixels(size.width, size.height)
    }

    fn context_2d(self) -> Result<GpuContext, SurfaceError> {
        pollster::block_on(GpuContext::new(self.window))
    }
}

/// Drawing context of a [`GpuSurface`].
pub struct GpuContext {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: SurfaceSize,
    shape_pipeline: wgpu::RenderPipeline,
    gradient_pipeline: wgpu::RenderPipeline,
    viewport_buffer: wgpu::Buffer,
    viewport_bind_group: wgpu::BindGroup,
    gradient_buffer: wgpu::Buffer,
    gradient_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    batch: ShapeBatch,
    gradient: bool,
    // Kept last so the surface is dropped before the window.
    _window: Arc<Window>,
}

impl GpuContext {
    async fn new(window: Arc<Window>) -> Result<Self, SurfaceError> {
        let inner = window.inner_size();
        let size = SurfaceSize::from_pixels(inner.width, inner.height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Plexus Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                ..Default::default()
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| SurfaceError::NoContext("surface reports no texture formats".into()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: inner.width.max(1),
            height: inner.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        if !size.is_empty() {
            surface.configure(&device, &config);
        }

        let viewport_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Viewport Buffer"),
            contents: bytemuck::bytes_of(&ViewportUniform {
                size: [size.width.max(1.0), size.height.max(1.0)],
                _pad: [0.0; 2],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let gradient_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Gradient Buffer"),
            size: std::mem::size_of::<GradientUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let (shape_pipeline, viewport_bind_group) =
            create_pipeline(&device, format, &viewport_buffer, PipelineKind::Shapes);
        let (gradient_pipeline, gradient_bind_group) =
            create_pipeline(&device, format, &gradient_buffer, PipelineKind::Gradient);

        let vertex_capacity = 1024;
        let vertex_buffer = create_vertex_buffer(&device, vertex_capacity);

        info!(
            adapter = %adapter.get_info().name,
            format = ?format,
            width = inner.width,
            height = inner.height,
            "GPU surface ready"
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            shape_pipeline,
            gradient_pipeline,
            viewport_buffer,
            viewport_bind_group,
            gradient_buffer,
            gradient_bind_group,
            vertex_buffer,
            vertex_capacity,
            batch: ShapeBatch::new(),
            gradient: false,
            _window: window,
        })
    }

    fn reconfigure(&mut self) {
        if !self.size.is_empty() {
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn upload_vertices(&mut self) {
        let vertices = self.batch.vertices();
        if vertices.len() > self.vertex_capacity {
            self.vertex_capacity = vertices.len().next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.device, self.vertex_capacity);
            debug!(capacity = self.vertex_capacity, "grew vertex buffer");
        }
        self.queue
            .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
    }
}

impl DrawContext for GpuContext {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) -> Result<(), RenderError> {
        let (width, height) = size.to_pixels();
        self.size = size;
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.reconfigure();
        self.queue.write_buffer(
            &self.viewport_buffer,
            0,
            bytemuck::bytes_of(&ViewportUniform {
                size: [size.width.max(1.0), size.height.max(1.0)],
                _pad: [0.0; 2],
            }),
        );
        Ok(())
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        self.batch.clear();
        self.gradient = false;
        Ok(())
    }

    fn fill_gradient(&mut self, angle: f32, stops: &[GradientStop]) -> Result<(), RenderError> {
        if stops.is_empty() {
            return Ok(());
        }
        let gradient = Gradient::new(angle, stops, self.size);
        self.queue.write_buffer(
            &self.gradient_buffer,
            0,
            bytemuck::bytes_of(&GradientUniform::new(&gradient)),
        );
        self.gradient = true;
        Ok(())
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec4) -> Result<(), RenderError> {
        self.batch.push_line(from, to, width, color);
        Ok(())
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Vec4) -> Result<(), RenderError> {
        self.batch.push_disc(center, radius, color);
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        if self.size.is_empty() {
            return Ok(());
        }

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("GPU surface lost or outdated, reconfiguring");
                self.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                debug!("GPU surface timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.upload_vertices();

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if self.gradient {
                render_pass.set_pipeline(&self.gradient_pipeline);
                render_pass.set_bind_group(0, &self.gradient_bind_group, &[]);
                render_pass.draw(0..3, 0..1);
            }

            if !self.batch.is_empty() {
                let count = self.batch.vertices().len() as u32;
                render_pass.set_pipeline(&self.shape_pipeline);
                render_pass.set_bind_group(0, &self.viewport_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.draw(0..count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum PipelineKind {
    Shapes,
    Gradient,
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Shape Vertex Buffer"),
        size: (capacity * std::mem::size_of::<ShapeVertex>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    uniform_buffer: &wgpu::Buffer,
    kind: PipelineKind,
) -> (wgpu::RenderPipeline, wgpu::BindGroup) {
    let (label, source, visibility) = match kind {
        PipelineKind::Shapes => ("Shape", shaders::SHAPE_SHADER, wgpu::ShaderStages::VERTEX),
        PipelineKind::Gradient => ("Gradient", shaders::GRADIENT_SHADER, wgpu::ShaderStages::FRAGMENT),
    };

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: &bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[&bind_group_layout],
        push_constant_ranges: &[],
    });

    let vertex_buffers = [ShapeVertex::layout()];
    let buffers: &[wgpu::VertexBufferLayout] = match kind {
        PipelineKind::Shapes => &vertex_buffers,
        PipelineKind::Gradient => &[],
    };

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    (pipeline, bind_group)
}
