//! Accumulated time per named frame stage (physics, scene, render, ...)

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

#[derive(Default)]
pub struct StageProfiler {
    stages: BTreeMap<&'static str, StageTiming>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct StageTiming {
    pub total: Duration,
    pub calls: u32,
}

impl StageTiming {
    pub fn average_ms(&self) -> f64 {
        if self.calls == 0 {
            return 0.0;
        }
        self.total.as_secs_f64() * 1000.0 / self.calls as f64
    }
}

impl StageProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f`, charging its wall time to `stage`.
    pub fn time<F, R>(&mut self, stage: &'static str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        self.record(stage, start.elapsed());
        result
    }

    pub fn record(&mut self, stage: &'static str, elapsed: Duration) {
        let timing = self.stages.entry(stage).or_default();
        timing.total += elapsed;
        timing.calls += 1;
    }

    pub fn timing(&self, stage: &str) -> StageTiming {
        self.stages.get(stage).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, StageTiming)> + '_ {
        self.stages.iter().map(|(name, timing)| (*name, *timing))
    }

    pub fn reset(&mut self) {
        self.stages.clear();
    }
}
