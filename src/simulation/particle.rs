use glam::Vec3;

use crate::config::{CAMERA_DISTANCE, CAMERA_FOV_Y};

/// A simulated point. Identity is its index in the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    /// Displacement per tick
    pub velocity: Vec3,
    /// Render scale
    pub size: f32,
}

impl Particle {
    pub fn new(position: Vec3, velocity: Vec3, size: f32) -> Self {
        Self {
            position,
            velocity,
            size,
        }
    }

    /// A motionless particle of unit size
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Vec3::ZERO, 1.0)
    }
}

/// Half-extents of the simulated volume.
///
/// x/y are wrap boundaries. `half_depth` only shapes the spawn volume;
/// z is never wrapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationBounds {
    pub half_width: f32,
    pub half_height: f32,
    pub half_depth: f32,
}

impl SimulationBounds {
    pub fn new(half_width: f32, half_height: f32, half_depth: f32) -> Self {
        Self {
            half_width,
            half_height,
            half_depth,
        }
    }

    /// World extents visible at z = 0 through the fixed camera.
    ///
    /// A degenerate viewport (zero width or height) is treated as square.
    pub fn from_viewport(width: u32, height: u32, depth: f32) -> Self {
        let half_height = CAMERA_DISTANCE * (CAMERA_FOV_Y * 0.5).tan();
        let aspect = if width > 0 && height > 0 {
            width as f32 / height as f32
        } else {
            1.0
        };

        Self {
            half_width: half_height * aspect,
            half_height,
            half_depth: depth * 0.5,
        }
    }

    /// True when x and y are inside the wrap boundaries
    pub fn contains_xy(&self, position: Vec3) -> bool {
        position.x.abs() <= self.half_width && position.y.abs() <= self.half_height
    }
}

/// Cursor position in normalized device space, y up
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    pub normalized_x: f32,
    pub normalized_y: f32,
}

impl PointerState {
    /// Clamps both axes to [-1, 1]
    pub fn new(normalized_x: f32, normalized_y: f32) -> Self {
        Self {
            normalized_x: normalized_x.clamp(-1.0, 1.0),
            normalized_y: normalized_y.clamp(-1.0, 1.0),
        }
    }

    /// Convert a cursor position in physical pixels (origin top-left)
    pub fn from_cursor(x: f64, y: f64, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let nx = (x / width as f64) * 2.0 - 1.0;
        let ny = 1.0 - (y / height as f64) * 2.0;
        Some(Self::new(nx as f32, ny as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_follow_aspect() {
        let wide = SimulationBounds::from_viewport(1600, 800, 80.0);
        assert!((wide.half_width - 2.0 * wide.half_height).abs() < 1e-4);
        assert_eq!(wide.half_depth, 40.0);

        let degenerate = SimulationBounds::from_viewport(0, 800, 80.0);
        assert_eq!(degenerate.half_width, degenerate.half_height);
    }

    #[test]
    fn test_pointer_from_cursor() {
        let center = PointerState::from_cursor(400.0, 300.0, 800, 600).unwrap();
        assert!(center.normalized_x.abs() < 1e-6);
        assert!(center.normalized_y.abs() < 1e-6);

        let top_left = PointerState::from_cursor(0.0, 0.0, 800, 600).unwrap();
        assert_eq!(top_left, PointerState::new(-1.0, 1.0));

        assert!(PointerState::from_cursor(0.0, 0.0, 0, 600).is_none());
    }

    #[test]
    fn test_pointer_is_clamped() {
        let p = PointerState::new(3.0, -7.5);
        assert_eq!(p.normalized_x, 1.0);
        assert_eq!(p.normalized_y, -1.0);
    }
}
