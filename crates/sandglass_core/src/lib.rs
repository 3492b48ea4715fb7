//! Sandglass Core
//!
//! Contains the granular simulation behind the hourglass:
//! - Container geometry (bulbs, neck, floor/ceiling landmarks)
//! - Grain store with the time-driven release scheduler
//! - Spatial hash used for neighbor collisions
//! - Per-frame physics step, settling and the explosion event
//! - Frame time clamping and seeded randomness

pub mod config;
pub mod error;
pub mod explosion;
pub mod geometry;
pub mod grain;
pub mod math;
pub mod physics;
pub mod simulation;
pub mod spatial_hash;
pub mod status;
pub mod store;
pub mod time;

pub use glam;

pub use config::PhysicsConfig;
pub use error::ConfigError;
pub use geometry::{Geometry, WallSegment};
pub use grain::Grain;
pub use simulation::{SandSimulation, SimSnapshot};
pub use status::{Phase, TimerStatus};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
