//! Grain ownership and the time-driven release scheduler.
//!
//! The store owns every grain for one countdown. Reserve grains are packed
//! into the top bulb at initialization and released one by one through the
//! neck so that the released count is a pure function of elapsed time.

use crate::config::{
    BASE_RADIUS, MAX_GRAINS, MIN_GRAINS, MIN_RELEASE_INTERVAL_MS, MS_PER_GRAIN, PACK_COLUMNS,
    PACK_JITTER, PACK_WIDTH_FRACTION, RADIUS_JITTER, RELEASE_VX, RELEASE_VY,
};
use crate::geometry::Geometry;
use crate::grain::Grain;
use crate::math::{GrainRng, Vec2};

/// Number of grains simulated for a countdown of `total_duration_ms`.
pub fn grain_count_for(total_duration_ms: f64) -> usize {
    let raw = (total_duration_ms / MS_PER_GRAIN).floor();
    if !(raw > 0.0) {
        return MIN_GRAINS;
    }
    (raw.min(MAX_GRAINS as f64) as usize).clamp(MIN_GRAINS, MAX_GRAINS)
}

/// Milliseconds between consecutive releases, floored so it is never zero.
pub fn release_interval_for(total_duration_ms: f64, total_grains: usize) -> f64 {
    let interval = total_duration_ms / total_grains.max(1) as f64;
    if interval.is_finite() {
        interval.max(MIN_RELEASE_INTERVAL_MS)
    } else {
        MIN_RELEASE_INTERVAL_MS
    }
}

/// Fixed-size grain collection plus release bookkeeping.
#[derive(Debug, Default)]
pub struct GrainStore {
    grains: Vec<Grain>,
    total_grains: usize,
    released: usize,
    release_interval_ms: f64,
}

impl GrainStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard everything and pack a fresh reserve for `total_duration_ms`.
    pub fn initialize(&mut self, total_duration_ms: f64, geometry: &Geometry, rng: &mut GrainRng) {
        self.reset();

        let total_grains = grain_count_for(total_duration_ms);
        self.total_grains = total_grains;
        self.release_interval_ms = release_interval_for(total_duration_ms, total_grains);
        self.grains = pack_reserve(total_grains, geometry, rng);
    }

    /// Lay the unreleased grains out again for a new container.
    ///
    /// Released grains and the release count are left alone. The reserve keeps
    /// its bottom-to-top order, so the next grain due is still the lowest.
    pub fn repack_reserve(&mut self, geometry: &Geometry, rng: &mut GrainRng) {
        let mut reserve: Vec<usize> = (0..self.grains.len())
            .filter(|&i| !self.grains[i].active)
            .collect();
        reserve.sort_by(|&a, &b| {
            self.grains[b]
                .position
                .y
                .total_cmp(&self.grains[a].position.y)
                .then(a.cmp(&b))
        });

        for (slot, index) in reserve.into_iter().enumerate() {
            let grain = &mut self.grains[index];
            grain.position = slot_position(slot, grain.radius, geometry, rng);
            grain.velocity = Vec2::ZERO;
        }
    }

    /// Release grains until the released count matches `elapsed_ms`.
    ///
    /// Returns how many grains were released by this call.
    pub fn release_due(&mut self, elapsed_ms: f64, geometry: &Geometry, rng: &mut GrainRng) -> usize {
        let target = self.target_released(elapsed_ms);
        let before = self.released;
        while self.released < target {
            self.release_next(geometry, rng);
        }
        self.released - before
    }

    /// Released count the scheduler aims for at `elapsed_ms`, capped at the total.
    pub fn target_released(&self, elapsed_ms: f64) -> usize {
        if self.total_grains == 0 {
            return 0;
        }
        let steps = (elapsed_ms.max(0.0) / self.release_interval_ms).floor();
        (steps as usize).min(self.total_grains)
    }

    /// Move the lowest reserve grain into the neck and let physics take over.
    ///
    /// The count advances even if no reserve grain is left.
    fn release_next(&mut self, geometry: &Geometry, rng: &mut GrainRng) {
        if let Some(index) = self.lowest_reserve_grain() {
            let lm = geometry.landmarks();
            let grain = &mut self.grains[index];
            let radius = grain.radius;

            let (min_x, max_x) = (lm.neck_left + radius, lm.neck_right - radius);
            let x = if max_x > min_x {
                rng.range(min_x, max_x)
            } else {
                geometry.center_x()
            };

            grain.position = Vec2::new(x, lm.neck_top + radius);
            grain.velocity = Vec2::new(
                rng.symmetric(RELEASE_VX),
                rng.range(RELEASE_VY.0, RELEASE_VY.1),
            );
            grain.active = true;
            grain.settled = false;
        }
        self.released += 1;
    }

    /// Inactive grain with the greatest y. Ties go to the lowest index.
    fn lowest_reserve_grain(&self) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (index, grain) in self.grains.iter().enumerate() {
            if grain.active {
                continue;
            }
            match best {
                Some((_, y)) if grain.position.y <= y => {}
                _ => best = Some((index, grain.position.y)),
            }
        }
        best.map(|(index, _)| index)
    }

    /// Empty the store. Idempotent.
    pub fn reset(&mut self) {
        self.grains.clear();
        self.total_grains = 0;
        self.released = 0;
        self.release_interval_ms = 0.0;
    }

    pub fn grains(&self) -> &[Grain] {
        &self.grains
    }

    pub(crate) fn grains_mut(&mut self) -> &mut [Grain] {
        &mut self.grains
    }

    pub fn is_empty(&self) -> bool {
        self.grains.is_empty()
    }

    pub fn total_grains(&self) -> usize {
        self.total_grains
    }

    pub fn released_count(&self) -> usize {
        self.released
    }

    pub fn release_interval_ms(&self) -> f64 {
        self.release_interval_ms
    }

    /// Fraction of grains still waiting in the reserve, in `[0, 1]`.
    pub fn reserve_fraction(&self) -> f32 {
        if self.total_grains == 0 {
            return 0.0;
        }
        (self.total_grains - self.released.min(self.total_grains)) as f32 / self.total_grains as f32
    }
}

/// Lay `count` reserve grains out in rows of [`PACK_COLUMNS`], stacked upward
/// from just above the neck.
fn pack_reserve(count: usize, geometry: &Geometry, rng: &mut GrainRng) -> Vec<Grain> {
    (0..count)
        .map(|slot| {
            let radius = BASE_RADIUS + rng.symmetric(RADIUS_JITTER);
            let position = slot_position(slot, radius, geometry, rng);
            Grain::reserve(position, radius, rng.symmetric(1.0))
        })
        .collect()
}

/// Jittered position of packing slot `slot` for a grain of `radius`.
fn slot_position(slot: usize, radius: f32, geometry: &Geometry, rng: &mut GrainRng) -> Vec2 {
    let lm = geometry.landmarks();
    let row = slot / PACK_COLUMNS;
    let column = slot % PACK_COLUMNS;

    let row_y = lm.neck_top - BASE_RADIUS - row as f32 * BASE_RADIUS * 2.0;
    let row_width = PACK_WIDTH_FRACTION * 2.0 * geometry.half_width_at(row_y);
    let spacing = row_width / PACK_COLUMNS as f32;

    let x = geometry.center_x() - row_width * 0.5
        + (column as f32 + 0.5) * spacing
        + rng.symmetric(PACK_JITTER);
    let y = (row_y + rng.symmetric(PACK_JITTER))
        .max(lm.ceiling + radius)
        .min(lm.neck_top);
    Vec2::new(x, y)
}
