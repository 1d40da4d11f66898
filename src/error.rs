use thiserror::Error;

/// Errors produced by the simulation core.
///
/// Only `InvalidCapacity` and `InvalidArgument` stop startup.
/// `MissingCapabilityHints` is always recovered with a conservative profile.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// Construction requested zero or negative particles
    #[error("invalid particle capacity {requested}: at least one particle is required")]
    InvalidCapacity { requested: i64 },

    /// Profiler ran somewhere that cannot describe the host
    #[error("capability hints unavailable: {reason}")]
    MissingCapabilityHints { reason: &'static str },

    #[error("particle index {index} out of range for store of {len}")]
    ParticleIndexOutOfRange { index: usize, len: usize },

    #[error("invalid value {value:?} for {flag}")]
    InvalidArgument { flag: &'static str, value: String },
}
