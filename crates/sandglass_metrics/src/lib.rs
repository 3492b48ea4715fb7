//! Sandglass Metrics - frame and stage timing for the runtime
//!
//! Collection only happens with the `metrics` feature. Without it every type
//! below is an empty stub and instrumentation compiles to nothing.
//!
//! # Usage
//!
//! ```ignore
//! use sandglass_metrics::{FrameTimer, StageProfiler};
//!
//! let mut timer = FrameTimer::new(120);
//! let mut stages = StageProfiler::new();
//! timer.begin();
//! stages.time("physics", || sim.update(dt, elapsed_ms));
//! timer.end();
//! tracing::info!(fps = timer.fps(), "frame stats");
//! ```

#[cfg(feature = "metrics")]
mod frame_timer;
#[cfg(feature = "metrics")]
mod ring_buffer;
#[cfg(feature = "metrics")]
mod stage_profiler;

#[cfg(feature = "metrics")]
pub use frame_timer::FrameTimer;
#[cfg(feature = "metrics")]
pub use ring_buffer::RingBuffer;
#[cfg(feature = "metrics")]
pub use stage_profiler::{StageProfiler, StageTiming};

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
pub struct FrameTimer;

#[cfg(not(feature = "metrics"))]
impl FrameTimer {
    pub fn new(_window: usize) -> Self { Self }
    pub fn begin(&mut self) {}
    pub fn end(&mut self) {}
    pub fn record(&mut self, _frame_time: std::time::Duration) {}
    pub fn fps(&self) -> f64 { 0.0 }
    pub fn frame_time_ms(&self) -> f64 { 0.0 }
    pub fn worst_frame_ms(&self) -> f64 { 0.0 }
    pub fn frames(&self) -> u64 { 0 }
}

#[cfg(not(feature = "metrics"))]
pub struct RingBuffer<T>(std::marker::PhantomData<T>);

#[cfg(not(feature = "metrics"))]
impl<T> RingBuffer<T> {
    pub fn new(_capacity: usize) -> Self { Self(std::marker::PhantomData) }
    pub fn push(&mut self, _sample: T) {}
    pub fn len(&self) -> usize { 0 }
    pub fn is_empty(&self) -> bool { true }
}

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct StageTiming {
    pub total: std::time::Duration,
    pub calls: u32,
}

#[cfg(not(feature = "metrics"))]
impl StageTiming {
    pub fn average_ms(&self) -> f64 { 0.0 }
}

#[cfg(not(feature = "metrics"))]
#[derive(Default)]
pub struct StageProfiler;

#[cfg(not(feature = "metrics"))]
impl StageProfiler {
    pub fn new() -> Self { Self }
    pub fn time<F, R>(&mut self, _stage: &'static str, f: F) -> R where F: FnOnce() -> R { f() }
    pub fn record(&mut self, _stage: &'static str, _elapsed: std::time::Duration) {}
    pub fn timing(&self, _stage: &str) -> StageTiming { StageTiming::default() }
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, StageTiming)> + '_ { std::iter::empty() }
    pub fn reset(&mut self) {}
}
