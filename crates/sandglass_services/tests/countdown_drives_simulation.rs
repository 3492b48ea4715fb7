//! The countdown's events wired to a simulation the way the runtime does it.

use sandglass_core::{Geometry, Phase, PhysicsConfig, SandSimulation, TimerStatus};
use sandglass_services::{Countdown, CountdownEvent, CountdownEventKind};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(33);

struct Harness {
    countdown: Countdown,
    sim: SandSimulation,
    inbox: Rc<RefCell<VecDeque<CountdownEvent>>>,
    exploded: usize,
}

impl Harness {
    fn new() -> Self {
        let inbox = Rc::new(RefCell::new(VecDeque::new()));
        let mut countdown = Countdown::new();
        for kind in CountdownEventKind::ALL {
            let inbox = inbox.clone();
            countdown.subscribe(kind, move |event| inbox.borrow_mut().push_back(*event));
        }

        let mut sim = SandSimulation::with_seed(PhysicsConfig::default(), 99);
        sim.set_geometry(Geometry::from_bounds(360.0, 540.0).expect("geometry"));

        Self {
            countdown,
            sim,
            inbox,
            exploded: 0,
        }
    }

    fn drain(&mut self) {
        loop {
            let Some(event) = self.inbox.borrow_mut().pop_front() else {
                break;
            };
            match event {
                CountdownEvent::Configured { duration, .. } => {
                    self.sim.initialize(duration.as_secs_f64() * 1000.0);
                }
                CountdownEvent::Finished => {
                    self.exploded += self.sim.explode();
                }
                CountdownEvent::Cleared => self.sim.reset(),
                _ => {}
            }
        }
    }

    fn frame(&mut self) {
        self.countdown.advance(FRAME);
        self.drain();
        self.sim
            .update(FRAME.as_secs_f32(), self.countdown.elapsed_ms());
    }
}

#[test]
fn configure_start_and_finish() {
    let mut h = Harness::new();
    h.countdown.configure(Duration::from_secs(20), Phase::Work);
    h.drain();
    assert_eq!(h.sim.total_grains(), 200);

    h.countdown.start();
    while h.countdown.status() != TimerStatus::Finished {
        h.frame();
    }
    // Finished is drained on the frame it fires; let the burst play out.
    for _ in 0..30 {
        h.frame();
    }

    assert_eq!(h.sim.released_count(), 200);
    assert_eq!(h.countdown.progress(), 1.0);
    assert!(h.exploded > 0, "settled grains should have been launched");
}

#[test]
fn pausing_freezes_releases() {
    let mut h = Harness::new();
    h.countdown.configure(Duration::from_secs(60), Phase::Work);
    h.countdown.start();
    for _ in 0..60 {
        h.frame();
    }
    let released = h.sim.released_count();
    assert!(released > 0);

    h.countdown.pause();
    for _ in 0..120 {
        h.frame();
    }
    assert_eq!(h.sim.released_count(), released);
}

#[test]
fn clearing_empties_the_hourglass() {
    let mut h = Harness::new();
    h.countdown.configure(Duration::from_secs(30), Phase::ShortBreak);
    h.countdown.start();
    for _ in 0..30 {
        h.frame();
    }
    h.countdown.clear();
    h.drain();
    assert_eq!(h.sim.total_grains(), 0);

    assert!(h.countdown.restart());
    h.drain();
    assert_eq!(h.sim.total_grains(), 200);
    assert_eq!(h.sim.released_count(), 0);
}
