//! Status-driven ambience: glow intensity and screen shake.

use glam::Vec2;
use sandglass_core::TimerStatus;
use std::f32::consts::TAU;

/// Shake amplitude in pixels when the countdown finishes.
pub const SHAKE_START: f32 = 10.0;
/// Exponential decay rate of the shake, per second.
pub const SHAKE_DECAY_PER_SEC: f32 = 2.5;
/// Shake below this amplitude is treated as stopped.
pub const SHAKE_EPSILON: f32 = 0.1;

const IDLE_BREATH_HZ: f32 = 0.25;
const FINISHED_PULSE_HZ: f32 = 2.0;
const RUNNING_GLOW: f32 = 0.6;
const PAUSED_GLOW: f32 = 0.2;

#[derive(Debug, Clone, Default)]
pub struct Effects {
    status: TimerStatus,
    clock: f32,
    shake: f32,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entering `Finished` from any other status kicks off the shake.
    pub fn set_status(&mut self, status: TimerStatus) {
        if status == TimerStatus::Finished && self.status != TimerStatus::Finished {
            self.shake = SHAKE_START;
        }
        if status != TimerStatus::Finished {
            self.shake = 0.0;
        }
        self.status = status;
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn advance(&mut self, dt_seconds: f32) {
        if !dt_seconds.is_finite() || dt_seconds <= 0.0 {
            return;
        }
        self.clock += dt_seconds;
        if self.shake > 0.0 {
            self.shake *= (-SHAKE_DECAY_PER_SEC * dt_seconds).exp();
            if self.shake < SHAKE_EPSILON {
                self.shake = 0.0;
            }
        }
    }

    /// Glow strength in `[0, 1]`.
    pub fn glow(&self) -> f32 {
        match self.status {
            TimerStatus::Idle => 0.35 + 0.15 * (TAU * IDLE_BREATH_HZ * self.clock).sin(),
            TimerStatus::Running => RUNNING_GLOW,
            TimerStatus::Paused => PAUSED_GLOW,
            TimerStatus::Finished => 0.55 + 0.45 * (TAU * FINISHED_PULSE_HZ * self.clock).sin(),
        }
    }

    pub fn shake_intensity(&self) -> f32 {
        self.shake
    }

    pub fn is_shaking(&self) -> bool {
        self.shake >= SHAKE_EPSILON
    }

    /// Screen offset for this frame, zero once the shake has died down.
    pub fn shake_offset(&self) -> Vec2 {
        if !self.is_shaking() {
            return Vec2::ZERO;
        }
        let t = self.clock;
        Vec2::new((t * 61.0).sin(), (t * 47.0 + 1.3).cos()) * self.shake
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finishing_starts_the_shake() {
        let mut fx = Effects::new();
        assert_eq!(fx.shake_intensity(), 0.0);
        fx.set_status(TimerStatus::Running);
        fx.set_status(TimerStatus::Finished);
        assert_eq!(fx.shake_intensity(), SHAKE_START);
        assert!(fx.is_shaking());
    }

    #[test]
    fn staying_finished_does_not_restart_the_shake() {
        let mut fx = Effects::new();
        fx.set_status(TimerStatus::Finished);
        fx.advance(0.5);
        let decayed = fx.shake_intensity();
        fx.set_status(TimerStatus::Finished);
        assert_eq!(fx.shake_intensity(), decayed);
    }

    #[test]
    fn shake_decays_exponentially() {
        let mut fx = Effects::new();
        fx.set_status(TimerStatus::Finished);
        fx.advance(1.0);
        let expected = SHAKE_START * (-SHAKE_DECAY_PER_SEC).exp();
        assert!((fx.shake_intensity() - expected).abs() < 1e-4);
    }

    #[test]
    fn faint_shake_yields_no_offset() {
        let mut fx = Effects::new();
        fx.set_status(TimerStatus::Finished);
        for _ in 0..300 {
            fx.advance(1.0 / 60.0);
        }
        assert!(!fx.is_shaking());
        assert_eq!(fx.shake_intensity(), 0.0);
        assert_eq!(fx.shake_offset(), Vec2::ZERO);
    }

    #[test]
    fn active_shake_stays_within_its_amplitude() {
        let mut fx = Effects::new();
        fx.set_status(TimerStatus::Finished);
        fx.advance(0.1);
        let offset = fx.shake_offset();
        let bound = fx.shake_intensity() + 1e-4;
        assert!(offset.x.abs() <= bound && offset.y.abs() <= bound);
    }

    #[test]
    fn clearing_stops_the_shake() {
        let mut fx = Effects::new();
        fx.set_status(TimerStatus::Finished);
        fx.set_status(TimerStatus::Idle);
        assert_eq!(fx.shake_offset(), Vec2::ZERO);
    }

    #[test]
    fn glow_follows_status() {
        let mut fx = Effects::new();
        for _ in 0..50 {
            fx.advance(0.07);
            let g = fx.glow();
            assert!((0.19..=0.51).contains(&g), "idle glow {g}");
        }

        fx.set_status(TimerStatus::Running);
        assert_eq!(fx.glow(), RUNNING_GLOW);
        fx.set_status(TimerStatus::Paused);
        assert!(fx.glow() < RUNNING_GLOW);

        fx.set_status(TimerStatus::Finished);
        let mut seen = Vec::new();
        for _ in 0..30 {
            fx.advance(1.0 / 60.0);
            seen.push(fx.glow());
        }
        let min = seen.iter().cloned().fold(f32::MAX, f32::min);
        let max = seen.iter().cloned().fold(f32::MIN, f32::max);
        assert!(max - min > 0.5, "finished glow should pulse");
    }

    #[test]
    fn bad_deltas_are_ignored() {
        let mut fx = Effects::new();
        fx.set_status(TimerStatus::Finished);
        fx.advance(f32::NAN);
        fx.advance(-1.0);
        assert_eq!(fx.shake_intensity(), SHAKE_START);
    }
}
