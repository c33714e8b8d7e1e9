//! The trail render pipeline: vertex layout, pipeline state, and draw.

use crate::error::CometError;
use crate::geometry::{self, TrailInstance, TrailVertex, Viewport};
use crate::gpu::dynamic_buffer::GrowableBuffer;
use crate::gpu::shader_composer::ShaderComposer;
use crate::options::RenderOptions;

/// The composed trail shader source (vertex pass-through + fragment
/// coverage).
pub const TRAIL_SHADER: &str = include_str!("../../assets/shaders/raster/trail.wgsl");

/// Largest number of quads a single batch can index with `u16` indices.
pub const MAX_QUADS: usize = (u16::MAX as usize + 1) / 4;

/// The ball-with-trail render pipeline plus its per-frame geometry buffers.
///
/// Alpha-blended, no depth test: composition into the frame is the
/// surrounding renderer's business, and trails are drawn as a single
/// overlay layer.
pub struct TrailPipeline {
    pipeline: wgpu::RenderPipeline,
    vertices: GrowableBuffer<TrailVertex>,
    indices: GrowableBuffer<u16>,
}

impl TrailPipeline {
    /// Build the pipeline for the given color target format.
    ///
    /// # Errors
    ///
    /// [`CometError::ShaderCompose`] if the trail shader fails to compose.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        composer: &mut ShaderComposer,
        options: &RenderOptions,
    ) -> Result<Self, CometError> {
        let shader = composer.compose(device, "Trail Shader", TRAIL_SHADER, "raster/trail.wgsl")?;

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Trail Pipeline Layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Trail Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Self::vertex_layout()],
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
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        log::debug!(
            "trail pipeline created for {:?}, initial capacity {} quads",
            format,
            options.quad_capacity
        );

        Ok(Self {
            pipeline,
            vertices: GrowableBuffer::new(
                device,
                "Trail Vertex Buffer",
                options.quad_capacity * 4,
                wgpu::BufferUsages::VERTEX,
            ),
            indices: GrowableBuffer::new(
                device,
                "Trail Index Buffer",
                options.quad_capacity * 6,
                wgpu::BufferUsages::INDEX,
            ),
        })
    }

    /// Vertex buffer layout matching [`TrailVertex`] and the WGSL
    /// `VertexInput`: slots 0-4 are position, coords, color, trail_length,
    /// total_portion.
    #[must_use]
    pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<TrailVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0, // position
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 8,
                    shader_location: 1, // coords
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 16,
                    shader_location: 2, // color
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32,
                    offset: 28,
                    shader_location: 3, // trail_length
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32,
                    offset: 32,
                    shader_location: 4, // total_portion
                },
            ],
        }
    }

    /// Expand the instances to quads and upload them. Instances beyond
    /// [`MAX_QUADS`] are dropped (u16 index range).
    pub fn write_instances(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        instances: &[TrailInstance],
        viewport: &Viewport,
        options: &RenderOptions,
    ) {
        if instances.len() > MAX_QUADS {
            log::warn!(
                "dropping {} trail instances beyond the u16 index range",
                instances.len() - MAX_QUADS
            );
        }

        let mut vertex_data = Vec::with_capacity(instances.len().min(MAX_QUADS) * 4);
        let mut index_data = Vec::with_capacity(instances.len().min(MAX_QUADS) * 6);
        for (quad, instance) in instances.iter().take(MAX_QUADS).enumerate() {
            let resolved = if options.motion_blur {
                *instance
            } else {
                instance.collapsed()
            };
            vertex_data.extend_from_slice(&geometry::expand_quad(&resolved, viewport));
            let base = (quad * 4) as u16;
            index_data.extend(geometry::QUAD_INDICES.iter().map(|&i| base + i));
        }

        self.vertices.write(device, queue, &vertex_data);
        self.indices.write(device, queue, &index_data);
    }

    /// Issue the draw call for the last written batch.
    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        if self.indices.is_empty() {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(0, self.vertices.buffer().slice(..));
        render_pass.set_index_buffer(self.indices.buffer().slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..self.indices.count() as u32, 0, 0..1);
    }
}
