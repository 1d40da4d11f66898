use std::str::FromStr;

use glam::Vec3;

use crate::config::GRID_STRATEGY_THRESHOLD;
use crate::error::FieldError;
use crate::simulation::spatial::build_edges_uniform_grid;
use crate::simulation::store::ParticleStore;

/// Connection between two particles closer than the distance threshold.
///
/// Always `a < b`. Recomputed every tick, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: u32,
    pub b: u32,
    /// Linear proximity falloff in (0, 1]
    pub weight: f32,
}

/// Edge between `a` and `b` if they are closer than `max_distance`.
///
/// Both strategies go through here so their weights are bit-identical.
#[inline]
pub(crate) fn edge_between(a: usize, b: usize, pa: Vec3, pb: Vec3, max_distance: f32) -> Option<Edge> {
    let distance = pa.distance(pb);
    (distance < max_distance).then(|| Edge {
        a: a as u32,
        b: b as u32,
        weight: 1.0 - distance / max_distance,
    })
}

/// All-pairs proximity scan.
///
/// Emits edges in index-pair order `(0,1), (0,2), ..., (n-2,n-1)`.
/// O(n²) distance evaluations; a non-positive `max_distance` yields nothing.
pub fn build_edges(store: &ParticleStore, max_distance: f32) -> Vec<Edge> {
    let mut edges = Vec::new();
    if !(max_distance > 0.0) {
        return edges;
    }

    let particles = store.particles();
    for (i, p) in particles.iter().enumerate() {
        for (offset, q) in particles[i + 1..].iter().enumerate() {
            if let Some(edge) = edge_between(i, i + 1 + offset, p.position, q.position, max_distance) {
                edges.push(edge);
            }
        }
    }
    edges
}

/// Upper bound on edges for `n` particles
pub fn max_edge_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// How the proximity graph is computed. Every strategy produces the same
/// edge list for the same particle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProximityStrategy {
    /// All-pairs scan
    BruteForce,
    /// Cubic cells of side `max_distance`, 27-cell neighbourhood
    UniformGrid,
    /// Brute force up to `GRID_STRATEGY_THRESHOLD` particles, grid above
    #[default]
    Auto,
}

impl ProximityStrategy {
    /// Concrete strategy for a store of `particle_count` particles
    pub fn resolve(self, particle_count: usize) -> Self {
        match self {
            Self::Auto if particle_count > GRID_STRATEGY_THRESHOLD => Self::UniformGrid,
            Self::Auto => Self::BruteForce,
            other => other,
        }
    }
}

impl FromStr for ProximityStrategy {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brute" | "brute-force" => Ok(Self::BruteForce),
            "grid" | "uniform-grid" => Ok(Self::UniformGrid),
            "auto" => Ok(Self::Auto),
            other => Err(FieldError::InvalidArgument {
                flag: "--strategy",
                value: other.to_string(),
            }),
        }
    }
}

/// Stateless front for the proximity strategies
#[derive(Debug, Clone, Copy, Default)]
pub struct ProximityGraphBuilder {
    strategy: ProximityStrategy,
}

impl ProximityGraphBuilder {
    pub fn new(strategy: ProximityStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> ProximityStrategy {
        self.strategy
    }

    pub fn build_edges(&self, store: &ParticleStore, max_distance: f32) -> Vec<Edge> {
        match self.strategy.resolve(store.len()) {
            ProximityStrategy::UniformGrid => build_edges_uniform_grid(store, max_distance),
            _ => build_edges(store, max_distance),
        }
    }
}
