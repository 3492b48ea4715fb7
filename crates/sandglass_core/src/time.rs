//! Frame time tracking
//!
//! Variable-rate frames with the delta clamped so a stalled host (backgrounded
//! window, breakpoint) cannot feed the integrator one huge step.

use crate::config::MAX_FRAME_DT;
use std::time::{Duration, Instant};

/// Clamp a raw frame delta (seconds) into `[0, MAX_FRAME_DT]`.
#[inline]
pub fn clamp_frame_delta(dt: f32) -> f32 {
    if dt.is_nan() {
        return 0.0;
    }
    dt.clamp(0.0, MAX_FRAME_DT)
}

/// Per-frame clock driven by the host's redraw callback.
pub struct FrameClock {
    last_frame: Option<Instant>,
    frame_count: u64,
    simulated: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_frame: None,
            frame_count: 0,
            simulated: Duration::ZERO,
        }
    }

    /// Advance to `now` and return the clamped delta in seconds.
    ///
    /// The first call returns zero: there is no previous frame to measure from.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let raw = match self.last_frame {
            Some(last) => now.saturating_duration_since(last).as_secs_f32(),
            None => 0.0,
        };
        self.last_frame = Some(now);
        self.frame_count += 1;

        let dt = clamp_frame_delta(raw);
        self.simulated += Duration::from_secs_f32(dt);
        dt
    }

    /// Forget the previous frame, e.g. after the window was hidden.
    pub fn resync(&mut self) {
        self.last_frame = None;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Sum of clamped deltas handed out so far.
    pub fn simulated_time(&self) -> Duration {
        self.simulated
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
