mod buffers;
mod context;
mod render;

pub use buffers::{CameraUniform, SceneBuffers};
pub use context::GpuContext;
pub use render::ScenePipelines;
