//! Uniform-grid proximity search.
//!
//! Particles are bucketed into cubic cells at least as wide as the
//! connection distance, so every neighbour of a particle lies in the 27 cells around
//! its own. Output matches `build_edges` exactly: same pairs, same order,
//! bit-identical weights.

use std::collections::HashMap;

use glam::Vec3;

use crate::simulation::graph::{edge_between, Edge};
use crate::simulation::store::ParticleStore;

type CellKey = (i32, i32, i32);

/// Cells are slightly wider than the connection distance so rounding in
/// `position / cell_size` cannot push a true neighbour two cells away
const CELL_PADDING: f32 = 1.001;

struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl SpatialGrid {
    fn new(cell_size: f32, capacity: usize) -> Self {
        Self {
            cell_size,
            cells: HashMap::with_capacity(capacity),
        }
    }

    fn key(&self, position: Vec3) -> CellKey {
        let cell = (position / self.cell_size).floor();
        // `as` saturates, so far-drifting z still lands in an edge cell
        (cell.x as i32, cell.y as i32, cell.z as i32)
    }

    fn insert(&mut self, index: usize, position: Vec3) {
        let key = self.key(position);
        self.cells.entry(key).or_default().push(index);
    }

    /// Indices in the 27 cells around `position`
    fn neighbours(&self, position: Vec3) -> impl Iterator<Item = usize> + '_ {
        let (cx, cy, cz) = self.key(position);
        (-1..=1).flat_map(move |dx| {
            (-1..=1).flat_map(move |dy| {
                (-1..=1).filter_map(move |dz| {
                    self.cells.get(&(
                        cx.saturating_add(dx),
                        cy.saturating_add(dy),
                        cz.saturating_add(dz),
                    ))
                })
            })
        })
        .flatten()
        .copied()
    }
}

/// Proximity graph via a uniform grid.
///
/// Roughly O(n · k) for k neighbours per particle instead of O(n²).
pub fn build_edges_uniform_grid(store: &ParticleStore, max_distance: f32) -> Vec<Edge> {
    let mut edges = Vec::new();
    if !(max_distance > 0.0) {
        return edges;
    }

    let particles = store.particles();
    let mut grid = SpatialGrid::new(max_distance * CELL_PADDING, particles.len());
    for (i, p) in particles.iter().enumerate() {
        grid.insert(i, p.position);
    }

    let mut candidates = Vec::new();
    for (i, p) in particles.iter().enumerate() {
        candidates.clear();
        candidates.extend(grid.neighbours(p.position).filter(|&j| j > i));
        // Saturated keys can alias a cell more than once
        candidates.sort_unstable();
        candidates.dedup();

        for &j in &candidates {
            if let Some(edge) = edge_between(i, j, p.position, particles[j].position, max_distance) {
                edges.push(edge);
            }
        }
    }
    edges
}
