//! Colors for the glass, the sand and the background.

use sandglass_core::Phase;

/// How far a grain's `color_offset` of `±1` moves each channel.
pub const GRAIN_BRIGHTNESS_SPREAD: f32 = 0.12;

/// Progress at which the gradient reaches its warm midpoint.
pub const GRADIENT_MIDPOINT: f32 = 0.6;

/// Linear RGBA, every channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Add `amount` to the RGB channels, clamping each to `[0, 1]`.
    pub fn shifted(self, amount: f32) -> Color {
        Color {
            r: (self.r + amount).clamp(0.0, 1.0),
            g: (self.g + amount).clamp(0.0, 1.0),
            b: (self.b + amount).clamp(0.0, 1.0),
            a: self.a,
        }
    }

    pub fn with_alpha(self, a: f32) -> Color {
        Color {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Colors for one countdown phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub frame: Color,
    pub glass: Color,
    pub outline: Color,
    pub highlight: Color,
    /// Sand color at zero progress.
    pub cool: Color,
    /// Sand color at [`GRADIENT_MIDPOINT`].
    pub warm: Color,
    /// Sand color when the countdown completes.
    pub hot: Color,
}

impl Palette {
    pub fn for_phase(phase: Phase) -> Self {
        let base = Palette {
            background: Color::rgb(0.05, 0.05, 0.07),
            frame: Color::rgb(0.32, 0.22, 0.14),
            glass: Color::rgba(0.70, 0.82, 0.92, 0.10),
            outline: Color::rgba(0.80, 0.90, 1.00, 0.55),
            highlight: Color::rgba(1.00, 1.00, 1.00, 0.30),
            cool: Color::rgb(0.35, 0.62, 0.85),
            warm: Color::rgb(0.93, 0.76, 0.42),
            hot: Color::rgb(0.90, 0.32, 0.22),
        };

        match phase {
            Phase::Work => base,
            Phase::ShortBreak => Palette {
                cool: Color::rgb(0.42, 0.80, 0.62),
                warm: Color::rgb(0.78, 0.86, 0.48),
                hot: Color::rgb(0.95, 0.70, 0.30),
                ..base
            },
            Phase::LongBreak => Palette {
                background: Color::rgb(0.04, 0.04, 0.09),
                cool: Color::rgb(0.55, 0.50, 0.90),
                warm: Color::rgb(0.78, 0.58, 0.88),
                hot: Color::rgb(0.95, 0.45, 0.62),
                ..base
            },
        }
    }

    /// Piecewise-linear gradient: `cool` at 0, `warm` at the midpoint, `hot` at 1.
    pub fn progress_color(&self, progress: f32) -> Color {
        let p = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        if p <= GRADIENT_MIDPOINT {
            self.cool.lerp(self.warm, p / GRADIENT_MIDPOINT)
        } else {
            self.warm
                .lerp(self.hot, (p - GRADIENT_MIDPOINT) / (1.0 - GRADIENT_MIDPOINT))
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::for_phase(Phase::default())
    }
}

/// Per-grain variation of the sand color.
pub fn grain_color(base: Color, color_offset: f32) -> Color {
    base.shifted(color_offset.clamp(-1.0, 1.0) * GRAIN_BRIGHTNESS_SPREAD)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Color, b: Color) -> bool {
        let d = [a.r - b.r, a.g - b.g, a.b - b.b, a.a - b.a];
        d.iter().all(|c| c.abs() < 1e-5)
    }

    #[test]
    fn gradient_hits_its_stops() {
        let palette = Palette::default();
        assert!(close(palette.progress_color(0.0), palette.cool));
        assert!(close(palette.progress_color(GRADIENT_MIDPOINT), palette.warm));
        assert!(close(palette.progress_color(1.0), palette.hot));
    }

    #[test]
    fn gradient_interpolates_within_each_tier() {
        let palette = Palette::default();
        let quarter = palette.progress_color(0.3);
        assert!(close(quarter, palette.cool.lerp(palette.warm, 0.5)));

        let late = palette.progress_color(0.8);
        assert!(close(late, palette.warm.lerp(palette.hot, 0.5)));
    }

    #[test]
    fn gradient_clamps_out_of_range_progress() {
        let palette = Palette::default();
        assert!(close(palette.progress_color(-3.0), palette.cool));
        assert!(close(palette.progress_color(7.0), palette.hot));
        assert!(close(palette.progress_color(f32::NAN), palette.cool));
    }

    #[test]
    fn grain_offset_brightens_and_darkens() {
        let base = Color::rgb(0.5, 0.5, 0.5);
        let bright = grain_color(base, 1.0);
        let dark = grain_color(base, -1.0);
        assert!((bright.r - (0.5 + GRAIN_BRIGHTNESS_SPREAD)).abs() < 1e-6);
        assert!((dark.g - (0.5 - GRAIN_BRIGHTNESS_SPREAD)).abs() < 1e-6);
        assert!(close(grain_color(base, 0.0), base));
    }

    #[test]
    fn grain_channels_stay_in_range() {
        let white = grain_color(Color::WHITE, 1.0);
        let black = grain_color(Color::BLACK, -1.0);
        assert_eq!(white, Color::WHITE);
        assert_eq!(black, Color::BLACK);
    }

    #[test]
    fn phases_have_distinct_sand() {
        let work = Palette::for_phase(Phase::Work);
        let short = Palette::for_phase(Phase::ShortBreak);
        let long = Palette::for_phase(Phase::LongBreak);
        assert_ne!(work.cool, short.cool);
        assert_ne!(short.cool, long.cool);
        assert_eq!(work.frame, long.frame);
    }
}
