use crate::error::FieldError;
use crate::simulation::ProximityStrategy;

// ============================================
// Startup Defaults
// ============================================

/// Baseline particle request before capability scaling
pub const DEFAULT_PARTICLE_COUNT: u32 = 100;

/// Z-extent of the spawn volume (world units)
pub const DEFAULT_DEPTH: f32 = 80.0;

/// Particles closer than this are connected by an edge (world units)
pub const DEFAULT_MAX_CONNECTION_DISTANCE: f32 = 3.0;

// ============================================
// Particle Initialization
// ============================================

/// Spawn volume extends this far past the visible bounds on x/y
pub const SPAWN_SPREAD: f32 = 1.5;

/// Per-axis velocity range [-MAX_INITIAL_SPEED, MAX_INITIAL_SPEED] (units per tick)
pub const MAX_INITIAL_SPEED: f32 = 0.005;

/// Render size range
pub const MIN_PARTICLE_SIZE: f32 = 0.5;
pub const MAX_PARTICLE_SIZE: f32 = 1.0;

// ============================================
// Simulation Step
// ============================================

/// Uniform nudge per tick toward the cursor direction
pub const POINTER_ATTRACTION: f32 = 0.02;

/// Ambient rotation of the whole field about y (radians per second)
pub const AMBIENT_ROTATION_SPEED: f32 = 0.05;

// ============================================
// Proximity Graph
// ============================================

/// Above this many particles `ProximityStrategy::Auto` switches from the
/// all-pairs scan to the uniform grid
pub const GRID_STRATEGY_THRESHOLD: usize = 400;

/// Edge RGB; alpha carries the edge weight
pub const EDGE_COLOR: [f32; 3] = [0.43, 0.34, 0.81];

// ============================================
// Capability Profiling
// ============================================

/// Hosts with fewer logical cores get a reduced particle budget
pub const MIN_DESKTOP_CORES: u32 = 4;

/// Logical viewport widths below this are treated as mobile
pub const MOBILE_VIEWPORT_WIDTH: f64 = 768.0;

/// Budget divisor applied on low-power hosts
pub const LOW_POWER_DIVISOR: u32 = 3;

// ============================================
// Camera & Rendering
// ============================================

/// Fixed camera sits on +z looking at the origin
pub const CAMERA_DISTANCE: f32 = 10.0;

/// Vertical field of view (radians, 75 degrees)
pub const CAMERA_FOV_Y: f32 = 75.0 * std::f32::consts::PI / 180.0;

pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 200.0;

/// World-space radius of a particle billboard at size 1.0
pub const PARTICLE_RADIUS: f32 = 0.05;

/// Particle billboard colour (RGBA)
pub const PARTICLE_COLOR: [f32; 4] = [0.55, 0.47, 0.93, 0.9];

/// Initial edge buffer capacity in vertices
pub const INITIAL_EDGE_VERTEX_CAPACITY: usize = 1024;

/// Fixed tick length used by headless runs (seconds)
pub const HEADLESS_TICK_SECONDS: f32 = 1.0 / 60.0;

/// Configuration set once at construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldConfig {
    /// Baseline particle request, before capability scaling
    pub count: u32,
    /// Z-extent of the spawn volume
    pub depth: f32,
    pub max_connection_distance: f32,
    pub strategy: ProximityStrategy,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_PARTICLE_COUNT,
            depth: DEFAULT_DEPTH,
            max_connection_distance: DEFAULT_MAX_CONNECTION_DISTANCE,
            strategy: ProximityStrategy::Auto,
        }
    }
}

impl FieldConfig {
    /// Build a config from command-line style arguments, falling back to
    /// defaults for every flag that is absent.
    ///
    /// Recognised flags: `--count`, `--depth`, `--max-distance`, `--strategy`.
    /// Unknown flags are left for the caller.
    pub fn from_args(args: &[String]) -> Result<Self, FieldError> {
        let mut config = Self::default();

        if let Some(raw) = flag_value(args, "--count")? {
            let requested: i64 = raw.parse().map_err(|_| invalid("--count", raw))?;
            config.count = match u32::try_from(requested) {
                Ok(count) if count > 0 => count,
                _ => return Err(FieldError::InvalidCapacity { requested }),
            };
        }

        if let Some(raw) = flag_value(args, "--depth")? {
            config.depth = parse_non_negative("--depth", raw)?;
        }

        if let Some(raw) = flag_value(args, "--max-distance")? {
            config.max_connection_distance = parse_non_negative("--max-distance", raw)?;
        }

        if let Some(raw) = flag_value(args, "--strategy")? {
            config.strategy = raw.parse()?;
        }

        Ok(config)
    }
}

/// True when `flag` appears anywhere in `args`
pub fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg == flag)
}

/// Value following `flag`, if present.
///
/// A flag given as the last argument has no value and is rejected rather
/// than silently ignored.
pub fn flag_value<'a>(args: &'a [String], flag: &'static str) -> Result<Option<&'a str>, FieldError> {
    let Some(i) = args.iter().position(|arg| arg == flag) else {
        return Ok(None);
    };
    match args.get(i + 1) {
        Some(value) => Ok(Some(value.as_str())),
        None => Err(invalid(flag, "")),
    }
}

fn parse_non_negative(flag: &'static str, raw: &str) -> Result<f32, FieldError> {
    match raw.parse::<f32>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(invalid(flag, raw)),
    }
}

fn invalid(flag: &'static str, raw: &str) -> FieldError {
    FieldError::InvalidArgument {
        flag,
        value: raw.to_string(),
    }
}
