//! Sandglass Runtime
//!
//! Opens a window and runs the hourglass countdown until it is closed.
//!
//! Keys: Space starts or pauses, R restarts, Escape quits.

mod session;

use anyhow::{Context, Result};
use sandglass_core::time::FrameClock;
use sandglass_metrics::FrameTimer;
use sandglass_render::{window_attributes, RenderError, Renderer, WindowConfig};
use sandglass_services::{Settings, SETTINGS_ENV};
use session::Session;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

const REPORT_INTERVAL: Duration = Duration::from_secs(2);

struct App {
    window_config: WindowConfig,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    session: Session,
    clock: FrameClock,
    frame_timer: FrameTimer,
    last_report: Instant,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(settings: &Settings) -> Self {
        Self {
            window_config: WindowConfig {
                title: settings.window.title.clone(),
                width: settings.window.width,
                height: settings.window.height,
            },
            window: None,
            renderer: None,
            session: Session::new(settings),
            clock: FrameClock::new(),
            frame_timer: FrameTimer::new(120),
            last_report: Instant::now(),
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{err:#}");
        self.failure = Some(err);
        event_loop.exit();
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(renderer) = &mut self.renderer {
            renderer.resize(width, height);
        }
        if !self.session.resize(width as f32, height as f32) {
            warn!(width, height, "window too small for the hourglass");
        }
        self.clock.resync();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        match &event.logical_key {
            Key::Named(NamedKey::Space) => {
                if self.session.toggle() {
                    info!(status = ?self.session.status(), "countdown toggled");
                }
            }
            Key::Named(NamedKey::Escape) => event_loop.exit(),
            Key::Character(c) if c.eq_ignore_ascii_case("r") => {
                if self.session.restart() {
                    info!("countdown restarted");
                }
            }
            _ => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.frame_timer.begin();

        let dt = self.clock.tick(Instant::now());
        let scene = self.session.frame(dt);

        if let Some(renderer) = &mut self.renderer {
            let result = self
                .session
                .stages_mut()
                .time("render", || renderer.render(&scene));
            match result {
                Ok(_) => {}
                Err(err) if err.is_recoverable() => {
                    warn!("{err}, reconfiguring surface");
                    renderer.reconfigure();
                }
                Err(err) if err.is_fatal() => {
                    self.fail(event_loop, err.into());
                    return;
                }
                Err(err) => warn!("{err}"),
            }
        }

        self.frame_timer.end();

        if self.last_report.elapsed() >= REPORT_INTERVAL {
            self.last_report = Instant::now();
            self.report();
        }
    }

    fn report(&mut self) {
        let sim = self.session.simulation();
        let countdown = self.session.countdown();
        info!(
            fps = format_args!("{:.1}", self.frame_timer.fps()),
            frame_ms = format_args!("{:.2}", self.frame_timer.frame_time_ms()),
            worst_ms = format_args!("{:.2}", self.frame_timer.worst_frame_ms()),
            status = ?countdown.status(),
            remaining_s = countdown.remaining().as_secs(),
            released = sim.released_count(),
            total = sim.total_grains(),
            settled = sim.settled_count(),
            "frame stats"
        );

        let stages = self.session.stages_mut();
        for (stage, timing) in stages.iter() {
            info!(stage, avg_ms = format_args!("{:.3}", timing.average_ms()), calls = timing.calls, "stage timing");
        }
        stages.reset();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(window_attributes(&self.window_config)) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                self.fail(event_loop, anyhow::Error::new(err).context("creating window"));
                return;
            }
        };

        let renderer: Result<Renderer, RenderError> =
            pollster::block_on(Renderer::new(window.clone()));
        match renderer {
            Ok(renderer) => {
                let (width, height) = renderer.size();
                self.renderer = Some(renderer);
                self.resize(width, height);
            }
            Err(err) => {
                self.fail(event_loop, anyhow::Error::new(err).context("initializing renderer"));
                return;
            }
        }

        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::Occluded(true) => self.clock.resync(),
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Sandglass v{}", sandglass_core::VERSION);

    let settings = Settings::from_args(std::env::args().skip(1), std::env::var(SETTINGS_ENV).ok())
        .context("loading settings")?;
    info!(
        duration_s = settings.countdown.duration_secs,
        phase = settings.countdown.phase.label(),
        autostart = settings.countdown.autostart,
        "countdown configured"
    );

    let event_loop = EventLoop::new().context("creating event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(&settings);
    event_loop.run_app(&mut app).context("running event loop")?;

    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
