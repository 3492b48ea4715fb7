//! Countdown timer that drives the hourglass.
//!
//! The countdown is advanced by the frame loop and announces every status
//! change on its [`EventBus`]. Transitions that make no sense for the current
//! status are ignored and reported by returning `false`.

use crate::events::{Event, EventBus, SubscriptionId};
use sandglass_core::{Phase, TimerStatus};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CountdownEvent {
    Configured { duration: Duration, phase: Phase },
    Started,
    Resumed,
    Paused,
    Finished,
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountdownEventKind {
    Configured,
    Started,
    Resumed,
    Paused,
    Finished,
    Cleared,
}

impl CountdownEventKind {
    pub const ALL: [CountdownEventKind; 6] = [
        CountdownEventKind::Configured,
        CountdownEventKind::Started,
        CountdownEventKind::Resumed,
        CountdownEventKind::Paused,
        CountdownEventKind::Finished,
        CountdownEventKind::Cleared,
    ];
}

impl Event for CountdownEvent {
    type Kind = CountdownEventKind;

    fn kind(&self) -> CountdownEventKind {
        match self {
            CountdownEvent::Configured { .. } => CountdownEventKind::Configured,
            CountdownEvent::Started => CountdownEventKind::Started,
            CountdownEvent::Resumed => CountdownEventKind::Resumed,
            CountdownEvent::Paused => CountdownEventKind::Paused,
            CountdownEvent::Finished => CountdownEventKind::Finished,
            CountdownEvent::Cleared => CountdownEventKind::Cleared,
        }
    }
}

#[derive(Debug, Default)]
pub struct Countdown {
    duration: Duration,
    elapsed: Duration,
    status: TimerStatus,
    phase: Phase,
    bus: EventBus<CountdownEvent>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, kind: CountdownEventKind, callback: F) -> SubscriptionId
    where
        F: FnMut(&CountdownEvent) + 'static,
    {
        self.bus.subscribe(kind, callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Arm the countdown for `duration`. Any status returns to idle with
    /// nothing elapsed. A zero duration is rejected.
    pub fn configure(&mut self, duration: Duration, phase: Phase) -> bool {
        if duration.is_zero() {
            return false;
        }
        self.duration = duration;
        self.elapsed = Duration::ZERO;
        self.status = TimerStatus::Idle;
        self.phase = phase;
        debug!(duration_ms = duration.as_millis() as u64, phase = phase.label(), "countdown configured");
        self.bus
            .publish(&CountdownEvent::Configured { duration, phase });
        true
    }

    /// Idle starts, paused resumes.
    pub fn start(&mut self) -> bool {
        let event = match self.status {
            TimerStatus::Idle if !self.duration.is_zero() => CountdownEvent::Started,
            TimerStatus::Paused => CountdownEvent::Resumed,
            _ => return false,
        };
        self.status = TimerStatus::Running;
        self.bus.publish(&event);
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.status != TimerStatus::Running {
            return false;
        }
        self.status = TimerStatus::Paused;
        self.bus.publish(&CountdownEvent::Paused);
        true
    }

    /// Start, resume or pause depending on the current status.
    pub fn toggle(&mut self) -> bool {
        match self.status {
            TimerStatus::Running => self.pause(),
            _ => self.start(),
        }
    }

    /// Accumulate `dt` while running. Reaching the duration finishes the
    /// countdown exactly once.
    pub fn advance(&mut self, dt: Duration) {
        if self.status != TimerStatus::Running {
            return;
        }
        self.elapsed = (self.elapsed + dt).min(self.duration);
        if self.elapsed >= self.duration {
            self.status = TimerStatus::Finished;
            debug!("countdown finished");
            self.bus.publish(&CountdownEvent::Finished);
        }
    }

    /// Back to idle with nothing elapsed. The duration is kept.
    pub fn clear(&mut self) -> bool {
        self.elapsed = Duration::ZERO;
        self.status = TimerStatus::Idle;
        self.bus.publish(&CountdownEvent::Cleared);
        true
    }

    /// Clear, re-arm with the same duration and start running.
    pub fn restart(&mut self) -> bool {
        if self.duration.is_zero() {
            return false;
        }
        self.clear();
        self.configure(self.duration, self.phase) && self.start()
    }

    /// Fraction of the duration elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 0.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0) as f32
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration.as_secs_f64() * 1000.0
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorded() -> (Countdown, Rc<RefCell<Vec<CountdownEvent>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut countdown = Countdown::new();
        for kind in CountdownEventKind::ALL {
            let log = log.clone();
            countdown.subscribe(kind, move |event| log.borrow_mut().push(*event));
        }
        (countdown, log)
    }

    #[test]
    fn full_cycle_publishes_each_transition() {
        let (mut countdown, log) = recorded();
        let duration = Duration::from_secs(2);

        assert!(countdown.configure(duration, Phase::Work));
        assert!(countdown.start());
        countdown.advance(Duration::from_millis(500));
        assert!(countdown.pause());
        countdown.advance(Duration::from_secs(10));
        assert_eq!(countdown.elapsed_ms(), 500.0);
        assert!(countdown.start());
        countdown.advance(Duration::from_secs(5));
        assert!(countdown.clear());

        assert_eq!(
            *log.borrow(),
            vec![
                CountdownEvent::Configured {
                    duration,
                    phase: Phase::Work
                },
                CountdownEvent::Started,
                CountdownEvent::Paused,
                CountdownEvent::Resumed,
                CountdownEvent::Finished,
                CountdownEvent::Cleared,
            ]
        );
    }

    #[test]
    fn finished_is_published_once_and_elapsed_is_capped() {
        let (mut countdown, log) = recorded();
        countdown.configure(Duration::from_secs(1), Phase::Work);
        countdown.start();
        for _ in 0..10 {
            countdown.advance(Duration::from_millis(400));
        }

        assert_eq!(countdown.status(), TimerStatus::Finished);
        assert_eq!(countdown.elapsed(), Duration::from_secs(1));
        assert_eq!(countdown.progress(), 1.0);
        let finishes = log
            .borrow()
            .iter()
            .filter(|e| **e == CountdownEvent::Finished)
            .count();
        assert_eq!(finishes, 1);
    }

    #[test]
    fn invalid_transitions_are_rejected() {
        let (mut countdown, log) = recorded();
        assert!(!countdown.start(), "nothing configured");
        assert!(!countdown.pause());
        assert!(!countdown.configure(Duration::ZERO, Phase::Work));

        countdown.configure(Duration::from_millis(100), Phase::Work);
        assert!(!countdown.pause(), "idle cannot pause");
        countdown.start();
        assert!(!countdown.start(), "already running");
        countdown.advance(Duration::from_millis(100));
        assert!(!countdown.start(), "finished cannot restart without configure");
        assert!(!countdown.pause());

        let kinds: Vec<_> = log.borrow().iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                CountdownEventKind::Configured,
                CountdownEventKind::Started,
                CountdownEventKind::Finished,
            ]
        );
    }

    #[test]
    fn elapsed_only_grows_while_running() {
        let mut countdown = Countdown::new();
        countdown.configure(Duration::from_secs(60), Phase::ShortBreak);
        countdown.advance(Duration::from_secs(3));
        assert_eq!(countdown.elapsed(), Duration::ZERO);

        countdown.start();
        let mut last = 0.0;
        for _ in 0..20 {
            countdown.advance(Duration::from_millis(250));
            assert!(countdown.elapsed_ms() >= last);
            last = countdown.elapsed_ms();
        }
        assert_eq!(countdown.elapsed_ms(), 5_000.0);
        assert!((countdown.progress() - 5.0 / 60.0).abs() < 1e-6);
        assert_eq!(countdown.remaining(), Duration::from_secs(55));
    }

    #[test]
    fn configure_resets_a_running_countdown() {
        let mut countdown = Countdown::new();
        countdown.configure(Duration::from_secs(10), Phase::Work);
        countdown.start();
        countdown.advance(Duration::from_secs(4));

        assert!(countdown.configure(Duration::from_secs(20), Phase::LongBreak));
        assert_eq!(countdown.status(), TimerStatus::Idle);
        assert_eq!(countdown.elapsed(), Duration::ZERO);
        assert_eq!(countdown.phase(), Phase::LongBreak);
        assert_eq!(countdown.duration_ms(), 20_000.0);
    }

    #[test]
    fn toggle_and_restart() {
        let (mut countdown, log) = recorded();
        countdown.configure(Duration::from_secs(3), Phase::Work);
        assert!(countdown.toggle());
        assert_eq!(countdown.status(), TimerStatus::Running);
        assert!(countdown.toggle());
        assert_eq!(countdown.status(), TimerStatus::Paused);

        countdown.toggle();
        countdown.advance(Duration::from_secs(1));
        log.borrow_mut().clear();

        assert!(countdown.restart());
        assert_eq!(countdown.status(), TimerStatus::Running);
        assert_eq!(countdown.elapsed(), Duration::ZERO);
        let kinds: Vec<_> = log.borrow().iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                CountdownEventKind::Cleared,
                CountdownEventKind::Configured,
                CountdownEventKind::Started,
            ]
        );
    }
}
