use glam::Vec3;
use rand::Rng;

use crate::config::{MAX_INITIAL_SPEED, MAX_PARTICLE_SIZE, MIN_PARTICLE_SIZE, SPAWN_SPREAD};
use crate::error::FieldError;
use crate::simulation::particle::{Particle, SimulationBounds};

/// Fixed-capacity owner of all particle state
#[derive(Debug, Clone)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    /// Allocate `count` randomized particles
    pub fn initialize(count: u32, bounds: &SimulationBounds) -> Result<Self, FieldError> {
        Self::initialize_with_rng(count, bounds, &mut rand::thread_rng())
    }

    /// Allocate `count` particles drawing from the given generator.
    ///
    /// Positions span `SPAWN_SPREAD` times the x/y bounds and the full
    /// depth on z; the first `advance` wraps anything outside x/y.
    pub fn initialize_with_rng<R: Rng>(
        count: u32,
        bounds: &SimulationBounds,
        rng: &mut R,
    ) -> Result<Self, FieldError> {
        if count == 0 {
            return Err(FieldError::InvalidCapacity { requested: 0 });
        }

        let spread_x = bounds.half_width * SPAWN_SPREAD;
        let spread_y = bounds.half_height * SPAWN_SPREAD;
        let spread_z = bounds.half_depth;

        let particles = (0..count)
            .map(|_| {
                let position = Vec3::new(
                    rng.gen_range(-spread_x..=spread_x),
                    rng.gen_range(-spread_y..=spread_y),
                    rng.gen_range(-spread_z..=spread_z),
                );
                let velocity = Vec3::new(
                    rng.gen_range(-MAX_INITIAL_SPEED..=MAX_INITIAL_SPEED),
                    rng.gen_range(-MAX_INITIAL_SPEED..=MAX_INITIAL_SPEED),
                    rng.gen_range(-MAX_INITIAL_SPEED..=MAX_INITIAL_SPEED),
                );
                let size = rng.gen_range(MIN_PARTICLE_SIZE..=MAX_PARTICLE_SIZE);
                Particle::new(position, velocity, size)
            })
            .collect();

        Ok(Self { particles })
    }

    /// Wrap explicit particle state
    pub fn from_particles(particles: Vec<Particle>) -> Result<Self, FieldError> {
        if particles.is_empty() {
            return Err(FieldError::InvalidCapacity { requested: 0 });
        }
        Ok(Self { particles })
    }

    pub fn get(&self, index: usize) -> Option<Particle> {
        self.particles.get(index).copied()
    }

    pub fn set(&mut self, index: usize, particle: Particle) -> Result<(), FieldError> {
        let len = self.particles.len();
        let slot = self
            .particles
            .get_mut(index)
            .ok_or(FieldError::ParticleIndexOutOfRange { index, len })?;
        *slot = particle;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// All particles in index order
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bounds() -> SimulationBounds {
        SimulationBounds::new(4.0, 3.0, 40.0)
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = ParticleStore::initialize(0, &bounds()).unwrap_err();
        assert_eq!(err, FieldError::InvalidCapacity { requested: 0 });
        assert!(ParticleStore::from_particles(Vec::new()).is_err());
    }

    #[test]
    fn test_store_creation() {
        let store = ParticleStore::initialize(100, &bounds()).unwrap();
        assert_eq!(store.len(), 100);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_initial_distributions() {
        let b = bounds();
        let mut rng = StdRng::seed_from_u64(7);
        let store = ParticleStore::initialize_with_rng(500, &b, &mut rng).unwrap();

        for p in store.particles() {
            assert!(p.position.x.abs() <= b.half_width * SPAWN_SPREAD);
            assert!(p.position.y.abs() <= b.half_height * SPAWN_SPREAD);
            assert!(p.position.z.abs() <= b.half_depth);
            for v in p.velocity.to_array() {
                assert!(v.abs() <= MAX_INITIAL_SPEED, "velocity {} out of range", v);
            }
            assert!((MIN_PARTICLE_SIZE..=MAX_PARTICLE_SIZE).contains(&p.size));
        }
    }

    #[test]
    fn test_seeded_stores_match() {
        let b = bounds();
        let a = ParticleStore::initialize_with_rng(20, &b, &mut StdRng::seed_from_u64(3)).unwrap();
        let c = ParticleStore::initialize_with_rng(20, &b, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a.particles(), c.particles());
    }

    #[test]
    fn test_get_and_set() {
        let mut store = ParticleStore::initialize(3, &bounds()).unwrap();
        let p = Particle::at(Vec3::new(1.0, 2.0, 3.0));

        store.set(1, p).unwrap();
        assert_eq!(store.get(1), Some(p));
        assert_eq!(store.get(3), None);

        let err = store.set(3, p).unwrap_err();
        assert_eq!(err, FieldError::ParticleIndexOutOfRange { index: 3, len: 3 });
        assert_eq!(store.len(), 3);
    }
}
