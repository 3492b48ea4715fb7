//! The hourglass simulation driven once per frame by the host.
//!
//! `SandSimulation` owns the grain store, the container geometry, the spatial
//! hash and the random source. Consumers only ever see grains through the
//! shared borrow returned by [`SandSimulation::snapshot`].
//!
//! Every operation is a silent no-op until geometry is set, and `update` /
//! `explode` are no-ops until grains are initialized.

use crate::config::PhysicsConfig;
use crate::explosion;
use crate::geometry::{Geometry, Landmarks};
use crate::grain::Grain;
use crate::math::GrainRng;
use crate::physics;
use crate::spatial_hash::SpatialHashGrid;
use crate::store::GrainStore;
use crate::time::clamp_frame_delta;
use tracing::{debug, trace};

/// Read-only view handed to the renderer after each update.
#[derive(Debug, Clone, Copy)]
pub struct SimSnapshot<'a> {
    pub grains: &'a [Grain],
    pub geometry: Option<&'a Geometry>,
    pub total_grains: usize,
    pub released_count: usize,
}

impl SimSnapshot<'_> {
    /// Share of grains still in the top reserve, `0.0` when nothing is loaded.
    pub fn reserve_fraction(&self) -> f32 {
        if self.total_grains == 0 {
            return 0.0;
        }
        let remaining = self.total_grains - self.released_count.min(self.total_grains);
        remaining as f32 / self.total_grains as f32
    }

    pub fn active_grains(&self) -> impl Iterator<Item = &Grain> + '_ {
        self.grains.iter().filter(|g| g.active)
    }
}

pub struct SandSimulation {
    store: GrainStore,
    geometry: Option<Geometry>,
    config: PhysicsConfig,
    rng: GrainRng,
    index: SpatialHashGrid,
    neighbors: Vec<usize>,
    elapsed_ms: f64,
}

impl SandSimulation {
    /// Simulation with entropy-seeded randomness.
    pub fn new(config: PhysicsConfig) -> Self {
        Self::with_rng(config, GrainRng::from_entropy())
    }

    /// Simulation whose packing, release and explosion draws are reproducible.
    pub fn with_seed(config: PhysicsConfig, seed: u64) -> Self {
        Self::with_rng(config, GrainRng::new(seed))
    }

    fn with_rng(config: PhysicsConfig, rng: GrainRng) -> Self {
        Self {
            store: GrainStore::new(),
            geometry: None,
            config,
            rng,
            index: SpatialHashGrid::default(),
            neighbors: Vec::with_capacity(32),
            elapsed_ms: 0.0,
        }
    }

    /// Install the container for the current layout.
    ///
    /// Grains keep their state; call [`initialize`](Self::initialize) to
    /// repack the reserve for the new shape.
    pub fn set_geometry(&mut self, geometry: Geometry) {
        debug!(
            width = geometry.width(),
            height = geometry.height(),
            walls = geometry.walls().len(),
            "geometry set"
        );
        self.geometry = Some(geometry);
    }

    /// Install a new container without restarting the countdown.
    ///
    /// Released grains keep moving and are only pushed back inside the new
    /// walls; grains that had to move lose their settled state. The reserve
    /// is repacked into the new top bulb and the release count is kept, so
    /// nothing is released early. Without grains this is `set_geometry`.
    pub fn refit_geometry(&mut self, geometry: Geometry) {
        self.set_geometry(geometry);
        let Some(geometry) = self.geometry.as_ref() else {
            return;
        };
        if self.store.is_empty() {
            return;
        }

        self.store.repack_reserve(geometry, &mut self.rng);
        let mut displaced = 0usize;
        for grain in self.store.grains_mut().iter_mut().filter(|g| g.active) {
            let before = grain.position;
            physics::confine(grain, geometry, &self.config);
            if grain.position != before {
                grain.settled = false;
                displaced += 1;
            }
        }
        debug!(displaced, released = self.store.released_count(), "grains refit");
    }

    /// Forget the container; the simulation goes back to no-op mode.
    pub fn clear_geometry(&mut self) {
        self.geometry = None;
    }

    /// Discard all grains and pack a fresh reserve for a countdown of
    /// `total_duration_ms`. No-op without geometry.
    pub fn initialize(&mut self, total_duration_ms: f64) {
        let Some(geometry) = self.geometry.as_ref() else {
            return;
        };
        self.store.initialize(total_duration_ms, geometry, &mut self.rng);
        self.elapsed_ms = 0.0;
        debug!(
            total_duration_ms,
            total_grains = self.store.total_grains(),
            release_interval_ms = self.store.release_interval_ms(),
            "grain store initialized"
        );
    }

    /// Advance one frame: release grains due at `timer_elapsed_ms`, rebuild the
    /// spatial hash, then step every moving grain.
    pub fn update(&mut self, dt_seconds: f32, timer_elapsed_ms: f64) {
        let Some(geometry) = self.geometry.as_ref() else {
            return;
        };
        if self.store.is_empty() {
            return;
        }

        let dt = clamp_frame_delta(dt_seconds);
        self.elapsed_ms = timer_elapsed_ms;

        let released = self
            .store
            .release_due(timer_elapsed_ms, geometry, &mut self.rng);
        if released > 0 {
            trace!(
                released,
                total_released = self.store.released_count(),
                "grains released"
            );
        }

        self.index.rebuild(self.store.grains());

        let grains = self.store.grains_mut();
        for index in 0..grains.len() {
            if !grains[index].is_moving() {
                continue;
            }
            physics::step_grain(
                grains,
                index,
                &self.index,
                &mut self.neighbors,
                geometry,
                &self.config,
                dt,
            );
        }
    }

    /// Launch the resting pile upward. Returns how many grains were kicked.
    pub fn explode(&mut self) -> usize {
        if self.geometry.is_none() || self.store.is_empty() {
            return 0;
        }
        let kicked = explosion::explode(self.store.grains_mut(), &mut self.rng);
        debug!(kicked, "explosion");
        kicked
    }

    /// Empty the store. Idempotent.
    pub fn reset(&mut self) {
        self.store.reset();
        self.elapsed_ms = 0.0;
        debug!("grain store reset");
    }

    pub fn snapshot(&self) -> SimSnapshot<'_> {
        SimSnapshot {
            grains: self.store.grains(),
            geometry: self.geometry.as_ref(),
            total_grains: self.store.total_grains(),
            released_count: self.store.released_count(),
        }
    }

    pub fn grains(&self) -> &[Grain] {
        self.store.grains()
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    pub fn landmarks(&self) -> Option<Landmarks> {
        self.geometry.as_ref().map(Geometry::landmarks)
    }

    pub fn total_grains(&self) -> usize {
        self.store.total_grains()
    }

    pub fn released_count(&self) -> usize {
        self.store.released_count()
    }

    pub fn release_interval_ms(&self) -> f64 {
        self.store.release_interval_ms()
    }

    /// Last timer value seen by `update`.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn settled_count(&self) -> usize {
        self.store
            .grains()
            .iter()
            .filter(|g| g.active && g.settled)
            .count()
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }
}

impl Default for SandSimulation {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;

    fn ready(seed: u64) -> SandSimulation {
        let mut sim = SandSimulation::with_seed(PhysicsConfig::default(), seed);
        sim.set_geometry(Geometry::from_bounds(400.0, 600.0).expect("geometry"));
        sim
    }

    #[test]
    fn everything_is_a_no_op_without_geometry() {
        let mut sim = SandSimulation::with_seed(PhysicsConfig::default(), 1);
        sim.initialize(60_000.0);
        sim.update(0.016, 30_000.0);
        assert_eq!(sim.explode(), 0);
        sim.reset();

        assert_eq!(sim.total_grains(), 0);
        assert_eq!(sim.released_count(), 0);
        assert!(sim.grains().is_empty());
        assert!(sim.landmarks().is_none());
        assert!(sim.snapshot().geometry.is_none());
    }

    #[test]
    fn update_without_grains_is_a_no_op() {
        let mut sim = ready(1);
        sim.update(0.016, 5_000.0);
        assert_eq!(sim.released_count(), 0);
        assert_eq!(sim.elapsed_ms(), 0.0);
        assert_eq!(sim.explode(), 0);
    }

    #[test]
    fn snapshot_reports_reserve_fraction() {
        let mut sim = ready(2);
        assert_eq!(sim.snapshot().reserve_fraction(), 0.0);

        sim.initialize(60_000.0);
        sim.update(0.016, 15_000.0);
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.released_count, 50);
        assert!((snapshot.reserve_fraction() - 0.75).abs() < 1e-6);
        assert_eq!(snapshot.active_grains().count(), 50);
    }

    #[test]
    fn clearing_geometry_freezes_the_simulation() {
        let mut sim = ready(3);
        sim.initialize(60_000.0);
        sim.update(0.016, 3_000.0);
        let before: Vec<Grain> = sim.grains().to_vec();

        sim.clear_geometry();
        sim.update(0.016, 30_000.0);
        assert_eq!(sim.grains(), before.as_slice());
        assert_eq!(sim.released_count(), 10);
    }

    #[test]
    fn falling_grain_meets_the_pile_where_it_lands() {
        let mut sim = ready(4);
        sim.initialize(60_000.0);
        let cx = sim.geometry().expect("geometry").center_x();
        {
            let grains = sim.store.grains_mut();
            let mut pile = Grain::reserve(Vec2::new(cx, 500.0), 2.0, 0.0);
            pile.active = true;
            pile.settle();
            let mut falling = Grain::reserve(Vec2::new(cx, 480.0), 2.0, 0.0);
            falling.active = true;
            falling.settled = false;
            falling.velocity = Vec2::new(0.0, 600.0);
            grains[0] = pile;
            grains[1] = falling;
        }

        sim.update(1.0 / 30.0, 0.0);

        let (pile, falling) = (sim.grains()[0], sim.grains()[1]);
        assert_eq!(pile.position, Vec2::new(cx, 500.0));
        let gap = falling.position.distance(pile.position);
        assert!(gap >= 2.0, "grains overlap: gap {gap}");
    }

    #[test]
    fn refit_keeps_released_grains_and_release_count() {
        let mut sim = ready(8);
        sim.initialize(60_000.0);
        for frame in 1..=60 {
            sim.update(1.0 / 30.0, frame as f64 * 500.0);
        }
        let released = sim.released_count();
        assert_eq!(released, 100);

        sim.refit_geometry(Geometry::from_bounds(300.0, 500.0).expect("geometry"));
        assert_eq!(sim.released_count(), released);
        assert_eq!(sim.grains().iter().filter(|g| g.active).count(), released);

        let geometry = sim.geometry().expect("geometry").clone();
        for grain in sim.grains().iter().filter(|g| g.active) {
            assert!(grain.position.y + grain.radius <= geometry.floor() + 1e-3);
            assert!(grain.position.y - grain.radius >= geometry.ceiling() - 1e-3);
        }

        // Same elapsed time: no burst of releases after the refit.
        sim.update(1.0 / 30.0, 30_000.0);
        assert_eq!(sim.released_count(), released);
    }

    #[test]
    fn refit_without_grains_only_sets_geometry() {
        let mut sim = SandSimulation::with_seed(PhysicsConfig::default(), 9);
        sim.refit_geometry(Geometry::from_bounds(400.0, 600.0).expect("geometry"));
        assert!(sim.geometry().is_some());
        assert_eq!(sim.total_grains(), 0);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let mut a = ready(11);
        let mut b = ready(11);
        for sim in [&mut a, &mut b] {
            sim.initialize(90_000.0);
            for frame in 0..120 {
                sim.update(1.0 / 60.0, frame as f64 * 250.0);
            }
        }
        assert_eq!(a.grains(), b.grains());
    }
}
