//! One-time host capability assessment.
//!
//! The core never queries the environment itself: `detect_hints` is the
//! only function that looks at the host, and its result is turned into an
//! immutable `CapabilityProfile` before the particle store is sized.

use crate::config::{LOW_POWER_DIVISOR, MIN_DESKTOP_CORES, MOBILE_VIEWPORT_WIDTH};
use crate::error::FieldError;

/// Raw facts about the host, gathered once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityHints {
    pub logical_core_count: u32,
    pub is_mobile_viewport: bool,
    pub requested_count: u32,
}

impl CapabilityHints {
    /// Fallback when the host cannot be inspected: assume a single-core
    /// mobile device.
    pub fn conservative(requested_count: u32) -> Self {
        Self {
            logical_core_count: 1,
            is_mobile_viewport: true,
            requested_count,
        }
    }
}

/// Particle budget and effect tier for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityProfile {
    pub particle_budget: u32,
    /// Glow on particle billboards
    pub effects_enabled: bool,
}

/// Pick a particle budget and effect tier from host hints.
///
/// Mobile viewports and hosts with fewer than `MIN_DESKTOP_CORES` logical
/// cores get a third of the requested particles, floored. This departs from
/// a plain floored third for requests of 1 or 2: those would floor to zero
/// and fail store construction, so the reduced budget is clamped to 1
/// (`requested = 2` on a low-power host gives 1, not 0). A zero request
/// stays zero. Effects are only disabled on mobile.
pub fn profile(hints: &CapabilityHints) -> CapabilityProfile {
    let low_power = hints.is_mobile_viewport || hints.logical_core_count < MIN_DESKTOP_CORES;

    let particle_budget = if low_power && hints.requested_count > 0 {
        (hints.requested_count / LOW_POWER_DIVISOR).max(1)
    } else {
        hints.requested_count
    };

    CapabilityProfile {
        particle_budget,
        effects_enabled: !hints.is_mobile_viewport,
    }
}

/// Gather hints from the running host.
///
/// `viewport_logical_width` is `None` when there is no window (headless
/// runs), which leaves the mobile check undecidable.
pub fn detect_hints(
    requested_count: u32,
    viewport_logical_width: Option<f64>,
) -> Result<CapabilityHints, FieldError> {
    let width = viewport_logical_width.ok_or(FieldError::MissingCapabilityHints {
        reason: "no viewport to measure",
    })?;

    Ok(CapabilityHints {
        logical_core_count: num_cpus::get() as u32,
        is_mobile_viewport: width < MOBILE_VIEWPORT_WIDTH,
        requested_count,
    })
}

/// Profile detected hints, or the conservative fallback when detection
/// failed. Never fails.
pub fn profile_or_conservative(
    hints: Result<CapabilityHints, FieldError>,
    requested_count: u32,
) -> CapabilityProfile {
    let hints = hints.unwrap_or_else(|err| {
        log::warn!("{}; using conservative capability profile", err);
        CapabilityHints::conservative(requested_count)
    });

    let profile = profile(&hints);
    log::info!(
        "Capability profile: {} cores, mobile={}, budget {} of {} requested, effects={}",
        hints.logical_core_count,
        hints.is_mobile_viewport,
        profile.particle_budget,
        hints.requested_count,
        profile.effects_enabled
    );
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hints(cores: u32, mobile: bool, requested: u32) -> CapabilityHints {
        CapabilityHints {
            logical_core_count: cores,
            is_mobile_viewport: mobile,
            requested_count: requested,
        }
    }

    #[test]
    fn test_low_core_count_reduces_budget() {
        let p = profile(&hints(2, false, 100));
        assert_eq!(p.particle_budget, 33);
        assert!(p.effects_enabled);
    }

    #[test]
    fn test_desktop_keeps_budget() {
        let p = profile(&hints(8, false, 100));
        assert_eq!(p.particle_budget, 100);
        assert!(p.effects_enabled);
    }

    #[test]
    fn test_mobile_reduces_budget_and_disables_effects() {
        let p = profile(&hints(8, true, 100));
        assert_eq!(p.particle_budget, 33);
        assert!(!p.effects_enabled);
    }

    #[test]
    fn test_exactly_min_cores_is_desktop() {
        let p = profile(&hints(MIN_DESKTOP_CORES, false, 90));
        assert_eq!(p.particle_budget, 90);
    }

    #[test]
    fn test_tiny_request_never_reduced_to_zero() {
        assert_eq!(profile(&hints(1, true, 2)).particle_budget, 1);
        assert_eq!(profile(&hints(2, false, 1)).particle_budget, 1);
        assert_eq!(profile(&hints(1, true, 5)).particle_budget, 1);
        assert_eq!(profile(&hints(1, true, 0)).particle_budget, 0);
    }

    #[test]
    fn test_missing_viewport_is_missing_hints() {
        let err = detect_hints(100, None).unwrap_err();
        assert!(matches!(err, FieldError::MissingCapabilityHints { .. }));
    }

    #[test]
    fn test_detect_hints_classifies_viewport() {
        let narrow = detect_hints(100, Some(390.0)).unwrap();
        assert!(narrow.is_mobile_viewport);
        assert!(narrow.logical_core_count >= 1);

        let wide = detect_hints(100, Some(1920.0)).unwrap();
        assert!(!wide.is_mobile_viewport);
        assert_eq!(wide.requested_count, 100);
    }

    #[test]
    fn test_conservative_fallback() {
        let p = profile_or_conservative(detect_hints(100, None), 100);
        assert_eq!(p.particle_budget, 33);
        assert!(!p.effects_enabled);
    }
}
