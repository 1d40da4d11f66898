use crate::config::EDGE_COLOR;
use crate::simulation::{Edge, ParticleStore};

/// Floats per edge endpoint position
pub const VERTEX_COMPONENTS: usize = 3;
/// Floats per edge endpoint colour
pub const COLOR_COMPONENTS: usize = 4;

/// Per-particle instance data, layout-compatible with the particle
/// vertex buffer (16 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Transform {
    pub position: [f32; 3],
    /// Uniform scale
    pub scale: f32,
}

/// Flat buffers handed to the renderer each tick
#[derive(Debug, Default, Clone)]
pub struct RenderBuffers {
    /// Index-aligned with the particle store
    pub particle_transforms: Vec<Transform>,
    /// Line list: every 6 floats are one segment's two endpoints
    pub edge_vertices: Vec<f32>,
    /// RGBA per endpoint, matching `edge_vertices`
    pub edge_colors: Vec<f32>,
    /// Ambient rotation of the whole field about y (radians)
    pub field_rotation: f32,
}

impl RenderBuffers {
    pub fn edge_count(&self) -> usize {
        self.edge_vertices.len() / (2 * VERTEX_COMPONENTS)
    }

    /// Line-list vertices (two per edge)
    pub fn vertex_count(&self) -> usize {
        self.edge_vertices.len() / VERTEX_COMPONENTS
    }
}

/// Owns the output buffers and the renderer's update flag
#[derive(Debug, Default)]
pub struct RenderBufferPublisher {
    buffers: RenderBuffers,
    needs_upload: bool,
}

impl RenderBufferPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild every buffer from the current particle state and edge list.
    ///
    /// Previous contents are discarded (allocations are reused) and the
    /// upload flag is raised.
    pub fn publish(&mut self, store: &ParticleStore, edges: &[Edge], field_rotation: f32) -> &RenderBuffers {
        let buffers = &mut self.buffers;
        buffers.particle_transforms.clear();
        buffers.edge_vertices.clear();
        buffers.edge_colors.clear();

        buffers
            .particle_transforms
            .extend(store.particles().iter().map(|p| Transform {
                position: p.position.to_array(),
                scale: p.size,
            }));

        let particles = store.particles();
        buffers.edge_vertices.reserve(edges.len() * 2 * VERTEX_COMPONENTS);
        buffers.edge_colors.reserve(edges.len() * 2 * COLOR_COMPONENTS);
        let [r, g, b] = EDGE_COLOR;
        for edge in edges {
            // Edges from another store are dropped rather than half-written
            let (Some(pa), Some(pb)) = (particles.get(edge.a as usize), particles.get(edge.b as usize)) else {
                continue;
            };
            for endpoint in [pa, pb] {
                buffers.edge_vertices.extend_from_slice(&endpoint.position.to_array());
                buffers.edge_colors.extend_from_slice(&[r, g, b, edge.weight]);
            }
        }

        buffers.field_rotation = field_rotation;
        self.needs_upload = true;
        log::trace!(
            "Published {} transforms, {} edges",
            buffers.particle_transforms.len(),
            edges.len()
        );
        &self.buffers
    }

    pub fn buffers(&self) -> &RenderBuffers {
        &self.buffers
    }

    /// True once `publish` has produced data the renderer has not consumed
    pub fn needs_upload(&self) -> bool {
        self.needs_upload
    }

    /// Called by the renderer after it has consumed the upload
    pub fn mark_uploaded(&mut self) {
        self.needs_upload = false;
    }
}
