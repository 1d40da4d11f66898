use wgpu::{BindGroup, Device, RenderPipeline, TextureFormat, TextureView};

use crate::gpu::buffers::SceneBuffers;
use particle_network::Transform;

const PARTICLE_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32];
const LINE_POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![0 => Float32x3];
const LINE_COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![1 => Float32x4];

/// Billboard quad corners, two triangles
const QUAD_VERTICES: u32 = 6;

/// Pipelines for drawing the field: edges as a line list, particles as
/// instanced billboards
pub struct ScenePipelines {
    line_pipeline: RenderPipeline,
    particle_pipeline: RenderPipeline,
    camera_bind_group: BindGroup,
}

impl ScenePipelines {
    /// Create both pipelines, bound to the camera uniform in `buffers`
    pub fn new(device: &Device, format: TextureFormat, buffers: &SceneBuffers) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera-bind-group-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera-bind-group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffers.camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let line_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("line-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/lines.wgsl").into()),
        });

        let particle_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("particle-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/particles.wgsl").into()),
        });

        let float_size = std::mem::size_of::<f32>() as u64;
        let line_layouts = [
            wgpu::VertexBufferLayout {
                array_stride: 3 * float_size,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &LINE_POSITION_ATTRIBUTES,
            },
            wgpu::VertexBufferLayout {
                array_stride: 4 * float_size,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &LINE_COLOR_ATTRIBUTES,
            },
        ];
        let particle_layouts = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Transform>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &PARTICLE_ATTRIBUTES,
        }];

        let line_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &line_shader,
            &line_layouts,
            format,
            wgpu::PrimitiveTopology::LineList,
            "line-pipeline",
        );

        let particle_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &particle_shader,
            &particle_layouts,
            format,
            wgpu::PrimitiveTopology::TriangleList,
            "particle-pipeline",
        );

        Self {
            line_pipeline,
            particle_pipeline,
            camera_bind_group,
        }
    }

    /// Draw edges, then particles on top
    pub fn draw(&self, encoder: &mut wgpu::CommandEncoder, view: &TextureView, buffers: &SceneBuffers) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene-render-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.02, // Deep indigo
                        g: 0.02,
                        b: 0.06,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_bind_group(0, &self.camera_bind_group, &[]);

        if buffers.line_vertex_count() > 0 {
            pass.set_pipeline(&self.line_pipeline);
            pass.set_vertex_buffer(0, buffers.line_position_buffer.slice(..));
            pass.set_vertex_buffer(1, buffers.line_color_buffer.slice(..));
            pass.draw(0..buffers.line_vertex_count(), 0..1);
        }

        if buffers.particle_count() > 0 {
            pass.set_pipeline(&self.particle_pipeline);
            pass.set_vertex_buffer(0, buffers.particle_buffer.slice(..));
            pass.draw(0..QUAD_VERTICES, 0..buffers.particle_count());
        }
    }
}

fn create_pipeline(
    device: &Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    vertex_buffers: &[wgpu::VertexBufferLayout],
    format: TextureFormat,
    topology: wgpu::PrimitiveTopology,
    label: &str,
) -> RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: vertex_buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
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
    })
}
