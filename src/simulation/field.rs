use crate::capability::CapabilityProfile;
use crate::config::{FieldConfig, AMBIENT_ROTATION_SPEED};
use crate::error::FieldError;
use crate::publish::{RenderBufferPublisher, RenderBuffers};
use crate::simulation::graph::ProximityGraphBuilder;
use crate::simulation::particle::{PointerState, SimulationBounds};
use crate::simulation::step::advance;
use crate::simulation::store::ParticleStore;

/// Accumulated simulation time, fed explicitly by the host
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldClock {
    total_seconds: f32,
}

impl FieldClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one frame's elapsed time. Negative or NaN deltas count as zero.
    pub fn tick(&mut self, elapsed_seconds: f32) {
        if elapsed_seconds > 0.0 {
            self.total_seconds += elapsed_seconds;
        }
    }

    pub fn total_seconds(&self) -> f32 {
        self.total_seconds
    }

    /// Ambient rotation of the field about y
    pub fn rotation(&self) -> f32 {
        self.total_seconds * AMBIENT_ROTATION_SPEED
    }
}

/// One frame of the pipeline: advance → build edges → publish.
///
/// Owns the particle store; `tick` takes `&mut self`, so no two ticks can
/// overlap and the edge build always reads a fully advanced store.
pub struct ParticleField {
    store: ParticleStore,
    bounds: SimulationBounds,
    pending_viewport: Option<(u32, u32)>,
    depth: f32,
    max_connection_distance: f32,
    builder: ProximityGraphBuilder,
    publisher: RenderBufferPublisher,
    clock: FieldClock,
    profile: CapabilityProfile,
    last_edge_count: usize,
}

impl ParticleField {
    /// Size the store from the capability budget and seed it inside the
    /// bounds derived from `viewport` (physical pixels).
    pub fn new(
        config: &FieldConfig,
        profile: CapabilityProfile,
        viewport: (u32, u32),
    ) -> Result<Self, FieldError> {
        let bounds = SimulationBounds::from_viewport(viewport.0, viewport.1, config.depth);
        let store = ParticleStore::initialize(profile.particle_budget, &bounds)?;
        Ok(Self::with_store(config, profile, store, bounds))
    }

    /// Assemble a field around an existing store
    pub fn with_store(
        config: &FieldConfig,
        profile: CapabilityProfile,
        store: ParticleStore,
        bounds: SimulationBounds,
    ) -> Self {
        let builder = ProximityGraphBuilder::new(config.strategy);
        log::info!(
            "Particle field: {} particles, bounds {:.2}x{:.2}x{:.2}, connection distance {}, strategy {:?}",
            store.len(),
            bounds.half_width,
            bounds.half_height,
            bounds.half_depth,
            config.max_connection_distance,
            builder.strategy().resolve(store.len())
        );

        Self {
            store,
            bounds,
            pending_viewport: None,
            depth: config.depth,
            max_connection_distance: config.max_connection_distance,
            builder,
            publisher: RenderBufferPublisher::new(),
            clock: FieldClock::new(),
            profile,
            last_edge_count: 0,
        }
    }

    /// Record a new viewport; bounds follow at the start of the next tick.
    ///
    /// A zero-sized viewport (minimized window) is ignored and the current
    /// bounds stay in force.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("Ignoring degenerate viewport {}x{}", width, height);
            return;
        }
        self.pending_viewport = Some((width, height));
    }

    /// Run one frame.
    ///
    /// `pointer` is the snapshot for the whole tick; `None` means no
    /// cursor and no attraction.
    pub fn tick(&mut self, elapsed_seconds: f32, pointer: Option<PointerState>) -> &RenderBuffers {
        if let Some((width, height)) = self.pending_viewport.take() {
            self.bounds = SimulationBounds::from_viewport(width, height, self.depth);
            log::debug!(
                "Bounds recomputed for {}x{}: {:.2}x{:.2}",
                width,
                height,
                self.bounds.half_width,
                self.bounds.half_height
            );
        }

        self.clock.tick(elapsed_seconds);
        advance(&mut self.store, pointer, &self.bounds);

        let edges = self.builder.build_edges(&self.store, self.max_connection_distance);
        self.last_edge_count = edges.len();

        self.publisher.publish(&self.store, &edges, self.clock.rotation())
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn bounds(&self) -> &SimulationBounds {
        &self.bounds
    }

    pub fn profile(&self) -> &CapabilityProfile {
        &self.profile
    }

    pub fn clock(&self) -> &FieldClock {
        &self.clock
    }

    /// Edges produced by the most recent tick
    pub fn last_edge_count(&self) -> usize {
        self.last_edge_count
    }

    pub fn buffers(&self) -> &RenderBuffers {
        self.publisher.buffers()
    }

    pub fn needs_upload(&self) -> bool {
        self.publisher.needs_upload()
    }

    /// Renderer acknowledgement that the latest buffers were consumed
    pub fn mark_uploaded(&mut self) {
        self.publisher.mark_uploaded();
    }
}
