//! Math utilities
//!
//! Re-exports glam plus the seedable random source used by the simulation.

pub use glam::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random source for grain packing, release and explosion.
///
/// Every random draw made by the simulation goes through this type so a
/// seeded instance reproduces a run exactly.
pub struct GrainRng {
    inner: StdRng,
}

impl GrainRng {
    /// Seeded generator; identical seeds give identical sequences.
    pub fn new(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
        }
    }

    /// Uniform sample in `[min, max]`. Returns `min` when the range is empty.
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if !(max > min) {
            return min;
        }
        self.inner.gen_range(min..=max)
    }

    /// Uniform sample in `[-magnitude, magnitude]`.
    pub fn symmetric(&mut self, magnitude: f32) -> f32 {
        self.range(-magnitude, magnitude)
    }
}

impl Default for GrainRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Cosine ease-in-out on `[0, 1]`.
#[inline]
pub fn cosine_ease(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    (1.0 - (std::f32::consts::PI * t).cos()) * 0.5
}
