//! One hourglass: countdown, simulation and render state stepped together.
//!
//! Nothing here touches the window or the GPU, so the whole frame pipeline up
//! to the finished [`Scene`] runs headless in tests.

use sandglass_core::{Geometry, SandSimulation, TimerStatus};
use sandglass_metrics::StageProfiler;
use sandglass_render::{RenderState, Scene};
use sandglass_services::{Countdown, CountdownEvent, CountdownEventKind, Settings};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info};

type Inbox = Rc<RefCell<VecDeque<CountdownEvent>>>;

pub struct Session {
    countdown: Countdown,
    sim: SandSimulation,
    render: RenderState,
    inbox: Inbox,
    stages: StageProfiler,
}

impl Session {
    pub fn new(settings: &Settings) -> Self {
        let sim = match settings.countdown.seed {
            Some(seed) => SandSimulation::with_seed(settings.physics, seed),
            None => SandSimulation::new(settings.physics),
        };

        let inbox: Inbox = Rc::new(RefCell::new(VecDeque::new()));
        let mut countdown = Countdown::new();
        for kind in [
            CountdownEventKind::Configured,
            CountdownEventKind::Finished,
            CountdownEventKind::Cleared,
        ] {
            let inbox = inbox.clone();
            countdown.subscribe(kind, move |event| inbox.borrow_mut().push_back(*event));
        }

        let mut session = Self {
            countdown,
            sim,
            render: RenderState::new(),
            inbox,
            stages: StageProfiler::new(),
        };

        let countdown_settings = &settings.countdown;
        session
            .countdown
            .configure(countdown_settings.duration(), countdown_settings.phase);
        if countdown_settings.autostart {
            session.countdown.start();
        }
        session
    }

    /// Rebuild the container for a new drawable area.
    ///
    /// The first usable size fills the reserve; later ones refit the grains
    /// already loaded. Returns `false` when the area is too small to hold an
    /// hourglass.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        match Geometry::from_bounds(width, height) {
            Some(geometry) if self.sim.total_grains() == 0 => {
                self.sim.set_geometry(geometry);
                self.sim.initialize(self.countdown.duration_ms());
                debug!(width, height, "geometry built");
                true
            }
            Some(geometry) => {
                self.sim.refit_geometry(geometry);
                debug!(width, height, "geometry rebuilt");
                true
            }
            None => {
                self.sim.clear_geometry();
                false
            }
        }
    }

    /// Step one frame of `dt` seconds and describe it.
    pub fn frame(&mut self, dt: f32) -> Scene {
        let dt = sandglass_core::time::clamp_frame_delta(dt);
        self.countdown.advance(Duration::from_secs_f32(dt));
        self.drain_events();

        let elapsed_ms = self.countdown.elapsed_ms();
        let sim = &mut self.sim;
        self.stages.time("physics", || sim.update(dt, elapsed_ms));

        self.render.set_progress(self.countdown.progress());
        self.render.set_status(self.countdown.status());
        self.render.advance(dt);

        let render = &self.render;
        let sim = &self.sim;
        self.stages.time("scene", || render.build(&sim.snapshot()))
    }

    /// Space bar: start, pause or resume.
    pub fn toggle(&mut self) -> bool {
        self.countdown.toggle()
    }

    /// Clear and run the same countdown again from the top.
    pub fn restart(&mut self) -> bool {
        self.countdown.restart()
    }

    fn drain_events(&mut self) {
        loop {
            let Some(event) = self.inbox.borrow_mut().pop_front() else {
                break;
            };
            match event {
                CountdownEvent::Configured { duration, phase } => {
                    self.render.set_phase(phase);
                    self.sim.initialize(duration.as_secs_f64() * 1000.0);
                }
                CountdownEvent::Finished => {
                    let kicked = self.sim.explode();
                    info!(kicked, "countdown finished");
                }
                CountdownEvent::Cleared => self.sim.reset(),
                CountdownEvent::Started | CountdownEvent::Resumed | CountdownEvent::Paused => {}
            }
        }
    }

    pub fn status(&self) -> TimerStatus {
        self.countdown.status()
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn simulation(&self) -> &SandSimulation {
        &self.sim
    }

    pub fn stages_mut(&mut self) -> &mut StageProfiler {
        &mut self.stages
    }
}
