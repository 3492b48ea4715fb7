//! A single sand grain.

use crate::math::Vec2;

/// One simulated sand particle.
///
/// `color_offset` is fixed at creation and only read by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grain {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    color_offset: f32,
    /// Resting with zero velocity; skipped by the physics step.
    pub settled: bool,
    /// Released from the reserve. Never reverts to `false`.
    pub active: bool,
}

impl Grain {
    /// A reserve grain parked at `position`.
    pub fn reserve(position: Vec2, radius: f32, color_offset: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            radius,
            color_offset: color_offset.clamp(-1.0, 1.0),
            settled: true,
            active: false,
        }
    }

    #[inline]
    pub fn color_offset(&self) -> f32 {
        self.color_offset
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Active and still moving.
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.active && !self.settled
    }

    /// Come to rest in place.
    pub fn settle(&mut self) {
        self.settled = true;
        self.velocity = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_grain_starts_inactive_and_settled() {
        let grain = Grain::reserve(Vec2::new(3.0, 4.0), 2.0, 0.25);
        assert!(!grain.active);
        assert!(grain.settled);
        assert!(!grain.is_moving());
        assert_eq!(grain.velocity, Vec2::ZERO);
        assert_eq!(grain.color_offset(), 0.25);
    }

    #[test]
    fn color_offset_is_clamped() {
        assert_eq!(Grain::reserve(Vec2::ZERO, 2.0, 3.0).color_offset(), 1.0);
        assert_eq!(Grain::reserve(Vec2::ZERO, 2.0, -3.0).color_offset(), -1.0);
    }

    #[test]
    fn settle_zeroes_velocity() {
        let mut grain = Grain::reserve(Vec2::ZERO, 2.0, 0.0);
        grain.active = true;
        grain.settled = false;
        grain.velocity = Vec2::new(3.0, -4.0);
        assert_eq!(grain.speed(), 5.0);
        grain.settle();
        assert!(grain.settled);
        assert_eq!(grain.speed(), 0.0);
    }
}
