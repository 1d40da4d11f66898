mod field;
mod graph;
mod particle;
mod spatial;
mod step;
mod store;

pub use field::{FieldClock, ParticleField};
pub use graph::{build_edges, max_edge_count, Edge, ProximityGraphBuilder, ProximityStrategy};
pub use particle::{Particle, PointerState, SimulationBounds};
pub use spatial::build_edges_uniform_grid;
pub use step::{advance, wrap_coordinate};
pub use store::ParticleStore;
