use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use particle_network::capability::{profile, CapabilityHints};
use particle_network::simulation::{build_edges, max_edge_count, ProximityGraphBuilder};
use particle_network::{
    CapabilityProfile, FieldConfig, Particle, ParticleField, ParticleStore, PointerState,
    ProximityStrategy, SimulationBounds,
};

fn desktop(budget: u32) -> CapabilityProfile {
    CapabilityProfile {
        particle_budget: budget,
        effects_enabled: true,
    }
}

#[test]
fn test_small_cube_always_connects() {
    let bounds = SimulationBounds::new(1.0, 1.0, 1.0);
    let config = FieldConfig {
        max_connection_distance: 3.0,
        ..FieldConfig::default()
    };

    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let store = ParticleStore::initialize_with_rng(10, &bounds, &mut rng).unwrap();
        let mut field = ParticleField::with_store(&config, desktop(10), store, bounds);

        for _ in 0..30 {
            field.tick(1.0 / 60.0, None);
            let edges = field.last_edge_count();
            assert!(edges >= 1, "seed {}: no edges", seed);
            assert!(edges <= max_edge_count(10));
            assert!(edges <= 45);
        }
    }
}

#[test]
fn test_buffers_are_fresh_every_tick() {
    let bounds = SimulationBounds::new(6.0, 4.0, 2.0);
    let config = FieldConfig::default();
    let store = ParticleStore::from_particles(vec![
        Particle::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.5, 0.0, 0.0), 1.0),
        Particle::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(-0.5, 0.0, 0.0), 1.0),
        Particle::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0), 1.0),
    ])
    .unwrap();
    let mut field = ParticleField::with_store(&config, desktop(3), store, bounds);

    // After one tick: x = 0.5, 0.5, 4.0 -> only (0,1) connects
    let first = field.tick(0.1, None).clone();
    field.mark_uploaded();
    assert_eq!(first.edge_count(), 1);

    // After two: x = 1.0, 0.0, 6.0 -> (0,1) connects, 2 sits on the edge
    let second = field.tick(0.1, None).clone();
    assert!(field.needs_upload());

    assert_ne!(first.particle_transforms, second.particle_transforms);
    assert_ne!(first.edge_vertices, second.edge_vertices);
    assert_eq!(second.edge_vertices.len(), 6 * field.last_edge_count());
    assert_eq!(second.edge_colors.len(), 8 * field.last_edge_count());
    assert_eq!(second.particle_transforms.len(), 3);
}

#[test]
fn test_edge_count_shrinks_without_residue() {
    let bounds = SimulationBounds::new(50.0, 50.0, 1.0);
    let config = FieldConfig::default();
    // Everyone starts together and flies apart
    let particles = (0..8)
        .map(|i| {
            let angle = i as f32 * std::f32::consts::TAU / 8.0;
            Particle::new(Vec3::ZERO, Vec3::new(angle.cos(), angle.sin(), 0.0) * 2.0, 1.0)
        })
        .collect();
    let store = ParticleStore::from_particles(particles).unwrap();
    let mut field = ParticleField::with_store(&config, desktop(8), store, bounds);

    let crowded = field.tick(0.016, None).edge_count();
    assert!(crowded > 0);

    for _ in 0..5 {
        field.tick(0.016, None);
    }
    let buffers = field.buffers();
    assert_eq!(buffers.edge_count(), 0);
    assert!(buffers.edge_vertices.is_empty());
    assert!(buffers.edge_colors.is_empty());
}

#[test]
fn test_profile_feeds_store_size() {
    let hints = CapabilityHints {
        logical_core_count: 2,
        is_mobile_viewport: false,
        requested_count: 100,
    };
    let profile = profile(&hints);
    assert_eq!(profile.particle_budget, 33);

    let field = ParticleField::new(&FieldConfig::default(), profile, (1280, 720)).unwrap();
    assert_eq!(field.store().len(), 33);
    assert_eq!(field.buffers().particle_transforms.len(), 0);
}

#[test]
fn test_strategies_agree_over_a_run() {
    let bounds = SimulationBounds::from_viewport(1280, 720, 80.0);
    let mut rng = StdRng::seed_from_u64(2024);
    let mut store = ParticleStore::initialize_with_rng(300, &bounds, &mut rng).unwrap();
    let grid = ProximityGraphBuilder::new(ProximityStrategy::UniformGrid);

    for frame in 0..20 {
        let pointer = PointerState::new((frame as f32 * 0.3).cos(), 0.5);
        particle_network::simulation::advance(&mut store, Some(pointer), &bounds);
        assert_eq!(build_edges(&store, 3.0), grid.build_edges(&store, 3.0));
    }
}
