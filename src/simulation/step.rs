use glam::Vec3;

use crate::config::POINTER_ATTRACTION;
use crate::simulation::particle::{PointerState, SimulationBounds};
use crate::simulation::store::ParticleStore;

/// Advance every particle by one tick, in index order.
///
/// Each particle moves by its velocity plus a uniform nudge toward the
/// pointer direction, then x and y are wrapped. z is left unbounded.
/// A missing pointer contributes no nudge.
pub fn advance(store: &mut ParticleStore, pointer: Option<PointerState>, bounds: &SimulationBounds) {
    let attraction = pointer
        .map(|p| Vec3::new(p.normalized_x, p.normalized_y, 0.0) * POINTER_ATTRACTION)
        .unwrap_or(Vec3::ZERO);

    for particle in store.particles_mut() {
        particle.position += particle.velocity;
        particle.position += attraction;

        particle.position.x = wrap_coordinate(particle.position.x, bounds.half_width);
        particle.position.y = wrap_coordinate(particle.position.y, bounds.half_height);
    }
}

/// Teleport a coordinate past either boundary to the opposite boundary
#[inline]
pub fn wrap_coordinate(value: f32, bound: f32) -> f32 {
    if value > bound {
        -bound
    } else if value < -bound {
        bound
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::particle::Particle;
    use proptest::prelude::*;

    fn bounds() -> SimulationBounds {
        SimulationBounds::new(5.0, 4.0, 40.0)
    }

    fn single(particle: Particle) -> ParticleStore {
        ParticleStore::from_particles(vec![particle]).unwrap()
    }

    #[test]
    fn test_velocity_applied() {
        let mut store = single(Particle::new(Vec3::ZERO, Vec3::new(0.1, -0.2, 0.3), 1.0));
        advance(&mut store, None, &bounds());
        let p = store.get(0).unwrap();
        assert_eq!(p.position, Vec3::new(0.1, -0.2, 0.3));
    }

    #[test]
    fn test_pointer_nudge_is_uniform() {
        let near = Particle::at(Vec3::new(0.5, 0.5, 0.0));
        let far = Particle::at(Vec3::new(-3.0, -3.0, 10.0));
        let mut store = ParticleStore::from_particles(vec![near, far]).unwrap();

        advance(&mut store, Some(PointerState::new(1.0, -0.5)), &bounds());

        let expected = Vec3::new(0.02, -0.01, 0.0);
        for (before, after) in [near, far].iter().zip(store.particles()) {
            let moved = after.position - before.position;
            assert!((moved - expected).length() < 1e-6, "moved {:?}", moved);
        }
    }

    #[test]
    fn test_wrap_teleports_to_opposite_edge() {
        let b = bounds();
        let mut store = single(Particle::new(
            Vec3::new(b.half_width, -b.half_height, 0.0),
            Vec3::new(0.001, -0.001, 0.0),
            1.0,
        ));
        advance(&mut store, None, &b);
        let p = store.get(0).unwrap();
        assert_eq!(p.position.x, -b.half_width);
        assert_eq!(p.position.y, b.half_height);
    }

    #[test]
    fn test_exact_boundary_is_not_wrapped() {
        assert_eq!(wrap_coordinate(5.0, 5.0), 5.0);
        assert_eq!(wrap_coordinate(-5.0, 5.0), -5.0);
        assert_eq!(wrap_coordinate(5.0 + f32::EPSILON * 8.0, 5.0), -5.0);
        assert_eq!(wrap_coordinate(-12.0, 5.0), 5.0);
    }

    #[test]
    fn test_z_is_never_wrapped() {
        let mut store = single(Particle::new(Vec3::new(0.0, 0.0, 1000.0), Vec3::new(0.0, 0.0, 1.0), 1.0));
        advance(&mut store, Some(PointerState::new(1.0, 1.0)), &bounds());
        assert_eq!(store.get(0).unwrap().position.z, 1001.0);
    }

    proptest! {
        #[test]
        fn test_bounds_invariant_holds(
            start in prop::collection::vec((-20.0f32..20.0, -20.0f32..20.0, -50.0f32..50.0), 1..32),
            velocity in (-1.0f32..1.0, -1.0f32..1.0, -1.0f32..1.0),
            pointers in prop::collection::vec(prop::option::of((-1.0f32..=1.0, -1.0f32..=1.0)), 1..16),
        ) {
            let b = bounds();
            let particles = start
                .iter()
                .map(|&(x, y, z)| Particle::new(Vec3::new(x, y, z), Vec3::new(velocity.0, velocity.1, velocity.2), 1.0))
                .collect();
            let mut store = ParticleStore::from_particles(particles).unwrap();

            for pointer in pointers {
                let pointer = pointer.map(|(x, y)| PointerState::new(x, y));
                advance(&mut store, pointer, &b);
                for p in store.particles() {
                    prop_assert!(b.contains_xy(p.position), "escaped: {:?}", p.position);
                }
            }
        }
    }
}
