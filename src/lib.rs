//! # particle-network
//!
//! Real-time particle field with a proximity graph between nearby
//! particles, republished every frame as flat buffers for a renderer.
//!
//! The core is headless: the host supplies elapsed time, pointer and
//! viewport, and uploads the resulting `RenderBuffers`.

pub mod capability;
pub mod config;
pub mod error;
pub mod publish;
pub mod simulation;

pub use capability::{CapabilityHints, CapabilityProfile};
pub use config::FieldConfig;
pub use error::FieldError;
pub use publish::{RenderBufferPublisher, RenderBuffers, Transform};
pub use simulation::{
    Edge, Particle, ParticleField, ParticleStore, PointerState, ProximityStrategy, SimulationBounds,
};
