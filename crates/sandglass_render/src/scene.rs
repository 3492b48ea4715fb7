//! Frame description built from a simulation snapshot.
//!
//! [`RenderState::build`] turns the read-only [`SimSnapshot`] plus the
//! countdown inputs into a [`Scene`]: a flat list of draw commands in screen
//! pixels. The GPU backend only ever sees the scene, so everything visual can
//! be checked without a device.

use crate::effects::Effects;
use crate::palette::{grain_color, Color, Palette};
use glam::Vec2;
use sandglass_core::{Geometry, Phase, SimSnapshot, TimerStatus};

/// Gap between the glass and the reservoir sand, in pixels.
pub const RESERVOIR_INSET: f32 = 2.0;
/// Rows used to outline the reservoir band.
pub const RESERVOIR_ROWS: usize = 16;

const FRAME_CAP_THICKNESS: f32 = 10.0;
const FRAME_CAP_OVERHANG: f32 = 14.0;
const OUTLINE_WIDTH: f32 = 2.0;
const HIGHLIGHT_WIDTH: f32 = 1.5;
const HIGHLIGHT_INSET: f32 = 6.0;
const GLOW_SOFTNESS: f32 = 1.0;
const GRAIN_SOFTNESS: f32 = 0.25;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Filled strip between two rails sampled at matching heights.
    Band {
        left: Vec<Vec2>,
        right: Vec<Vec2>,
        color: Color,
    },
    /// Disc whose edge fades over `softness` of its radius.
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        softness: f32,
    },
    Polyline {
        points: Vec<Vec2>,
        width: f32,
        color: Color,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub clear: Color,
    /// Screen-shake translation applied to every command.
    pub offset: Vec2,
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn empty(clear: Color) -> Self {
        Self {
            clear,
            offset: Vec2::ZERO,
            commands: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f32, Color)> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Circle {
                center,
                radius,
                color,
                ..
            } => Some((*center, *radius, *color)),
            _ => None,
        })
    }

    pub fn bands(&self) -> impl Iterator<Item = (&[Vec2], &[Vec2], Color)> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Band { left, right, color } => {
                Some((left.as_slice(), right.as_slice(), *color))
            }
            _ => None,
        })
    }
}

/// Per-frame inputs that do not come from the simulation.
#[derive(Debug, Clone)]
pub struct RenderState {
    progress: f32,
    phase: Phase,
    palette: Palette,
    effects: Effects,
}

impl RenderState {
    pub fn new() -> Self {
        Self {
            progress: 0.0,
            phase: Phase::default(),
            palette: Palette::default(),
            effects: Effects::new(),
        }
    }

    /// Countdown progress, clamped to `[0, 1]`.
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
    }

    pub fn set_status(&mut self, status: TimerStatus) {
        self.effects.set_status(status);
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.palette = Palette::for_phase(phase);
    }

    /// Advance glow and shake animation.
    pub fn advance(&mut self, dt_seconds: f32) {
        self.effects.advance(dt_seconds);
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> TimerStatus {
        self.effects.status()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub fn build(&self, snapshot: &SimSnapshot<'_>) -> Scene {
        let mut scene = Scene::empty(self.palette.background);
        let Some(geometry) = snapshot.geometry else {
            return scene;
        };

        let palette = &self.palette;
        let sand = palette.progress_color(self.progress);
        scene.offset = self.effects.shake_offset();

        let left = geometry.profile(-1.0);
        let right = geometry.profile(1.0);

        scene.commands.push(self.glow(geometry, sand));
        scene.commands.push(DrawCommand::Band {
            left: left.clone(),
            right: right.clone(),
            color: palette.glass,
        });

        if let Some(reservoir) = reservoir_band(geometry, snapshot, sand) {
            scene.commands.push(reservoir);
        }

        scene.commands.extend(snapshot.active_grains().map(|grain| {
            DrawCommand::Circle {
                center: grain.position,
                radius: grain.radius,
                color: grain_color(sand, grain.color_offset()),
                softness: GRAIN_SOFTNESS,
            }
        }));

        scene.commands.push(DrawCommand::Polyline {
            points: left,
            width: OUTLINE_WIDTH,
            color: palette.outline,
        });
        scene.commands.push(DrawCommand::Polyline {
            points: right,
            width: OUTLINE_WIDTH,
            color: palette.outline,
        });
        scene.commands.push(highlight(geometry, palette.highlight));

        scene.commands.push(frame_cap(geometry, geometry.ceiling(), -1.0, palette.frame));
        scene.commands.push(frame_cap(geometry, geometry.floor(), 1.0, palette.frame));

        scene
    }

    /// Soft halo around the lower bulb, tinted with the current sand color.
    fn glow(&self, geometry: &Geometry, sand: Color) -> DrawCommand {
        let center = Vec2::new(
            geometry.center_x(),
            (geometry.neck_bottom() + geometry.floor()) * 0.5,
        );
        let intensity = self.effects.glow();
        DrawCommand::Circle {
            center,
            radius: geometry.max_half_width() * (1.2 + 0.15 * intensity),
            color: sand.with_alpha(0.25 * intensity),
            softness: GLOW_SOFTNESS,
        }
    }
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new()
    }
}

/// Sand still waiting in the top bulb, drawn from the release fraction.
fn reservoir_band(geometry: &Geometry, snapshot: &SimSnapshot<'_>, color: Color) -> Option<DrawCommand> {
    let fraction = snapshot.reserve_fraction();
    if fraction <= 0.0 {
        return None;
    }

    let bulb = geometry.neck_top() - geometry.ceiling();
    let level = geometry.neck_top() - bulb * fraction;
    let cx = geometry.center_x();

    let mut left = Vec::with_capacity(RESERVOIR_ROWS + 1);
    let mut right = Vec::with_capacity(RESERVOIR_ROWS + 1);
    for row in 0..=RESERVOIR_ROWS {
        let y = level + (geometry.neck_top() - level) * row as f32 / RESERVOIR_ROWS as f32;
        let half = (geometry.half_width_at(y) - RESERVOIR_INSET).max(0.0);
        left.push(Vec2::new(cx - half, y));
        right.push(Vec2::new(cx + half, y));
    }

    Some(DrawCommand::Band { left, right, color })
}

/// Thin reflection running down the left side of the top bulb.
fn highlight(geometry: &Geometry, color: Color) -> DrawCommand {
    let cx = geometry.center_x();
    let top = geometry.ceiling() + HIGHLIGHT_INSET;
    let bottom = geometry.neck_top() - HIGHLIGHT_INSET;
    let steps = 8;
    let points = (0..=steps)
        .map(|i| {
            let y = top + (bottom - top) * i as f32 / steps as f32;
            let half = (geometry.half_width_at(y) - HIGHLIGHT_INSET).max(0.0);
            Vec2::new(cx - half, y)
        })
        .collect();
    DrawCommand::Polyline {
        points,
        width: HIGHLIGHT_WIDTH,
        color,
    }
}

/// Wooden cap on the outside of the ceiling (`direction = -1`) or floor (`+1`).
fn frame_cap(geometry: &Geometry, y: f32, direction: f32, color: Color) -> DrawCommand {
    let half = geometry.max_half_width() + FRAME_CAP_OVERHANG;
    let cx = geometry.center_x();
    let far = y + direction * FRAME_CAP_THICKNESS;
    let (top, bottom) = if direction < 0.0 { (far, y) } else { (y, far) };
    DrawCommand::Band {
        left: vec![Vec2::new(cx - half, top), Vec2::new(cx - half, bottom)],
        right: vec![Vec2::new(cx + half, top), Vec2::new(cx + half, bottom)],
        color,
    }
}
