use glam::{Mat4, Vec3};
use wgpu::{Buffer, BufferUsages, Device, Queue};

use particle_network::config::{
    CAMERA_DISTANCE, CAMERA_FAR, CAMERA_FOV_Y, CAMERA_NEAR, INITIAL_EDGE_VERTEX_CAPACITY,
    PARTICLE_COLOR, PARTICLE_RADIUS,
};
use particle_network::publish::{COLOR_COMPONENTS, VERTEX_COMPONENTS};
use particle_network::{RenderBuffers, Transform};

/// Camera and shading parameters (160 bytes, aligned to 16)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// Ambient field rotation
    pub model: [[f32; 4]; 4],
    pub particle_color: [f32; 4],
    pub particle_radius: f32,
    /// 0 = hard discs, 1 = soft glow
    pub effects_enabled: u32,
    pub _padding: [f32; 2],
}

impl CameraUniform {
    pub fn new(aspect: f32, field_rotation: f32, effects_enabled: bool) -> Self {
        let projection = Mat4::perspective_rh(CAMERA_FOV_Y, aspect, CAMERA_NEAR, CAMERA_FAR);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, CAMERA_DISTANCE), Vec3::ZERO, Vec3::Y);

        Self {
            view_proj: (projection * view).to_cols_array_2d(),
            model: Mat4::from_rotation_y(field_rotation).to_cols_array_2d(),
            particle_color: PARTICLE_COLOR,
            particle_radius: PARTICLE_RADIUS,
            effects_enabled: effects_enabled as u32,
            _padding: [0.0, 0.0],
        }
    }
}

/// GPU copies of the published render buffers
pub struct SceneBuffers {
    /// One `Transform` per particle (instance rate)
    pub particle_buffer: Buffer,
    /// Edge endpoints, Float32x3 per vertex
    pub line_position_buffer: Buffer,
    /// Edge endpoint colours, Float32x4 per vertex
    pub line_color_buffer: Buffer,
    pub camera_buffer: Buffer,
    particle_count: u32,
    line_vertex_count: u32,
    line_vertex_capacity: usize,
}

impl SceneBuffers {
    /// Allocate buffers for a store of `particle_count` particles
    pub fn new(device: &Device, particle_count: usize) -> Self {
        let particle_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("particle-instance-buffer"),
            size: (particle_count.max(1) * std::mem::size_of::<Transform>()) as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let (line_position_buffer, line_color_buffer) =
            create_line_buffers(device, INITIAL_EDGE_VERTEX_CAPACITY);

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("camera-uniform-buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            particle_buffer,
            line_position_buffer,
            line_color_buffer,
            camera_buffer,
            particle_count: 0,
            line_vertex_count: 0,
            line_vertex_capacity: INITIAL_EDGE_VERTEX_CAPACITY,
        }
    }

    /// Copy the latest published buffers to the GPU.
    ///
    /// Line buffers grow to the next power of two when the edge list
    /// outgrows them; they never shrink.
    pub fn upload(&mut self, device: &Device, queue: &Queue, buffers: &RenderBuffers) {
        let vertex_count = buffers.vertex_count();
        if vertex_count > self.line_vertex_capacity {
            let capacity = vertex_count.next_power_of_two();
            log::debug!(
                "Growing edge buffers from {} to {} vertices",
                self.line_vertex_capacity,
                capacity
            );
            let (positions, colors) = create_line_buffers(device, capacity);
            self.line_position_buffer = positions;
            self.line_color_buffer = colors;
            self.line_vertex_capacity = capacity;
        }

        if !buffers.particle_transforms.is_empty() {
            queue.write_buffer(
                &self.particle_buffer,
                0,
                bytemuck::cast_slice(&buffers.particle_transforms),
            );
        }
        if vertex_count > 0 {
            queue.write_buffer(
                &self.line_position_buffer,
                0,
                bytemuck::cast_slice(&buffers.edge_vertices),
            );
            queue.write_buffer(
                &self.line_color_buffer,
                0,
                bytemuck::cast_slice(&buffers.edge_colors),
            );
        }

        self.particle_count = buffers.particle_transforms.len() as u32;
        self.line_vertex_count = vertex_count as u32;
    }

    /// Update camera parameters
    pub fn update_camera(&self, queue: &Queue, camera: &CameraUniform) {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(camera));
    }

    pub fn particle_count(&self) -> u32 {
        self.particle_count
    }

    pub fn line_vertex_count(&self) -> u32 {
        self.line_vertex_count
    }
}

fn create_line_buffers(device: &Device, vertex_capacity: usize) -> (Buffer, Buffer) {
    let float_size = std::mem::size_of::<f32>();

    let positions = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("edge-position-buffer"),
        size: (vertex_capacity * VERTEX_COMPONENTS * float_size) as u64,
        usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let colors = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("edge-color-buffer"),
        size: (vertex_capacity * COLOR_COMPONENTS * float_size) as u64,
        usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    (positions, colors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_uniform_size() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 160);
    }

    #[test]
    fn test_camera_projects_origin_to_center() {
        let camera = CameraUniform::new(16.0 / 9.0, 0.0, true);
        let view_proj = Mat4::from_cols_array_2d(&camera.view_proj);
        let clip = view_proj * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-6);
        assert!((clip.y / clip.w).abs() < 1e-6);
        assert_eq!(camera.effects_enabled, 1);
    }
}
