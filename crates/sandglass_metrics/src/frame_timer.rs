//! Rolling frame-time statistics

use super::ring_buffer::RingBuffer;
use std::time::{Duration, Instant};

/// Measures wall time between `begin` and `end` for the last N frames.
pub struct FrameTimer {
    frame_start: Instant,
    frame_times: RingBuffer<Duration>,
    frames: u64,
}

impl FrameTimer {
    pub fn new(window: usize) -> Self {
        Self {
            frame_start: Instant::now(),
            frame_times: RingBuffer::new(window),
            frames: 0,
        }
    }

    pub fn begin(&mut self) {
        self.frame_start = Instant::now();
    }

    pub fn end(&mut self) {
        self.record(self.frame_start.elapsed());
    }

    /// Record a frame duration measured elsewhere.
    pub fn record(&mut self, frame_time: Duration) {
        self.frame_times.push(frame_time);
        self.frames += 1;
    }

    pub fn fps(&self) -> f64 {
        let avg = self.frame_times.average().as_secs_f64();
        if avg > 0.0 {
            1.0 / avg
        } else {
            0.0
        }
    }

    pub fn frame_time_ms(&self) -> f64 {
        self.frame_times.average().as_secs_f64() * 1000.0
    }

    pub fn worst_frame_ms(&self) -> f64 {
        self.frame_times.peak().as_secs_f64() * 1000.0
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
