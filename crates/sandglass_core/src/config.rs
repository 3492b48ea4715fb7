//! Simulation constants and tunable physics parameters.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Nominal grain radius in pixels.
pub const BASE_RADIUS: f32 = 2.0;
/// Per-grain radius variation around [`BASE_RADIUS`].
pub const RADIUS_JITTER: f32 = 0.4;
/// Spatial hash cell edge; radius variance is small enough to keep it fixed.
pub const CELL_SIZE: f32 = BASE_RADIUS * 4.0;

pub const MIN_GRAINS: usize = 200;
pub const MAX_GRAINS: usize = 400;
/// Countdown milliseconds represented by one grain before clamping.
pub const MS_PER_GRAIN: f64 = 500.0;
/// Lower bound on the release interval so zero durations never divide by zero.
pub const MIN_RELEASE_INTERVAL_MS: f64 = 1e-3;

/// Reserve packing layout.
pub const PACK_COLUMNS: usize = 20;
pub const PACK_WIDTH_FRACTION: f32 = 0.8;
pub const PACK_JITTER: f32 = 1.0;

/// Largest step the integrator accepts (seconds).
pub const MAX_FRAME_DT: f32 = 0.05;

/// Initial velocity band of a released grain (px/s).
pub const RELEASE_VY: (f32, f32) = (20.0, 50.0);
pub const RELEASE_VX: f32 = 5.0;

/// Velocity band applied by the explosion (px/s).
pub const EXPLODE_VY: (f32, f32) = (-650.0, -350.0);
pub const EXPLODE_VX: f32 = 140.0;

/// Support distance used by the settling check (px).
pub const SUPPORT_TOLERANCE: f32 = 1.0;

/// Tunable physics parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration in px/s².
    pub gravity: f32,
    /// Horizontal velocity multiplier applied every step.
    pub friction: f32,
    /// Normal velocity retained after a wall bounce.
    pub wall_damping: f32,
    /// Vertical velocity retained after a floor or ceiling bounce.
    pub floor_damping: f32,
    /// Horizontal velocity retained after touching the floor.
    pub floor_friction: f32,
    /// Fraction of the approaching normal velocity removed per pixel of overlap.
    pub overlap_damping: f32,
    /// Speed (px/s) below which a supported grain settles.
    pub settle_speed: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 900.0,
            friction: 0.995,
            wall_damping: 0.35,
            floor_damping: 0.3,
            floor_friction: 0.8,
            overlap_damping: 0.5,
            settle_speed: 35.0,
        }
    }
}

impl PhysicsConfig {
    /// Check that the parameters keep the simulation dissipative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.gravity > 0.0) || !self.gravity.is_finite() {
            return Err(ConfigError::NonPositive {
                field: "gravity",
                value: self.gravity,
            });
        }
        if !(self.settle_speed > 0.0) || !self.settle_speed.is_finite() {
            return Err(ConfigError::NonPositive {
                field: "settle_speed",
                value: self.settle_speed,
            });
        }
        if !(self.overlap_damping > 0.0) || !self.overlap_damping.is_finite() {
            return Err(ConfigError::NonPositive {
                field: "overlap_damping",
                value: self.overlap_damping,
            });
        }

        let unit_fields = [
            ("friction", self.friction),
            ("wall_damping", self.wall_damping),
            ("floor_damping", self.floor_damping),
            ("floor_friction", self.floor_friction),
        ];
        for (field, value) in unit_fields {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::OutsideUnitInterval { field, value });
            }
        }

        Ok(())
    }
}
