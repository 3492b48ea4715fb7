//! Hourglass container geometry.
//!
//! The container is two bulbs joined by a short vertical neck. Each bulb
//! profile widens from the neck toward the ceiling (top bulb) or the floor
//! (bottom bulb) following `sqrt(cosine_ease(t))`, and the left profile is the
//! mirror image of the right one around the vertical center line.

use crate::config::BASE_RADIUS;
use crate::math::{cosine_ease, Vec2};

/// Segments sampled along each bulb profile.
pub const BULB_SEGMENTS: usize = 24;

const CEILING_FRACTION: f32 = 0.06;
const FLOOR_FRACTION: f32 = 0.94;
const NECK_HALF_HEIGHT_FRACTION: f32 = 0.02;
const MAX_HALF_WIDTH_OF_WIDTH: f32 = 0.42;
const MAX_HALF_WIDTH_OF_HEIGHT: f32 = 0.30;
const NECK_OF_MAX: f32 = 0.08;
const MIN_NECK_HALF_WIDTH: f32 = BASE_RADIUS * 2.5;

/// One straight piece of the container wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSegment {
    pub start: Vec2,
    pub end: Vec2,
}

impl WallSegment {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Closest point on the segment to `point` (parametric `t` clamped to `[0, 1]`).
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        let along = self.end - self.start;
        let len_sq = along.length_squared();
        if len_sq <= f32::EPSILON {
            return self.start;
        }
        let t = ((point - self.start).dot(along) / len_sq).clamp(0.0, 1.0);
        self.start + along * t
    }
}

/// Scalar landmarks the simulation and renderer key off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmarks {
    pub neck_left: f32,
    pub neck_right: f32,
    pub neck_top: f32,
    pub neck_bottom: f32,
    pub floor: f32,
    pub ceiling: f32,
}

/// Container description derived from the drawable area. Immutable until the
/// next resize produces a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    width: f32,
    height: f32,
    center_x: f32,
    max_half_width: f32,
    neck_half_width: f32,
    landmarks: Landmarks,
    walls: Vec<WallSegment>,
}

impl Geometry {
    /// Build the container for a `width` × `height` pixel area.
    ///
    /// Returns `None` for empty or non-finite dimensions; callers treat that
    /// the same as "layout not ready yet".
    pub fn from_bounds(width: f32, height: f32) -> Option<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return None;
        }

        let center_x = width * 0.5;
        let center_y = height * 0.5;
        let max_half_width =
            (width * MAX_HALF_WIDTH_OF_WIDTH).min(height * MAX_HALF_WIDTH_OF_HEIGHT);
        let neck_half_width = (max_half_width * NECK_OF_MAX).max(MIN_NECK_HALF_WIDTH);
        let max_half_width = max_half_width.max(neck_half_width);
        let neck_half_height = height * NECK_HALF_HEIGHT_FRACTION;

        let landmarks = Landmarks {
            neck_left: center_x - neck_half_width,
            neck_right: center_x + neck_half_width,
            neck_top: center_y - neck_half_height,
            neck_bottom: center_y + neck_half_height,
            floor: height * FLOOR_FRACTION,
            ceiling: height * CEILING_FRACTION,
        };

        let mut geometry = Self {
            width,
            height,
            center_x,
            max_half_width,
            neck_half_width,
            landmarks,
            walls: Vec::new(),
        };
        geometry.walls = geometry.build_walls();
        Some(geometry)
    }

    /// Half of the interior width at height `y`.
    ///
    /// Inside the neck band this is the neck half-width; in either bulb it
    /// eases toward the maximum half-width at the ceiling or floor.
    pub fn half_width_at(&self, y: f32) -> f32 {
        let lm = &self.landmarks;
        let t = if y < lm.neck_top {
            (lm.neck_top - y) / (lm.neck_top - lm.ceiling)
        } else if y > lm.neck_bottom {
            (y - lm.neck_bottom) / (lm.floor - lm.neck_bottom)
        } else {
            return self.neck_half_width;
        };

        let span = self.max_half_width - self.neck_half_width;
        self.neck_half_width + span * cosine_ease(t).sqrt()
    }

    /// Profile points from ceiling to floor at the given side (`-1` left, `+1` right).
    pub fn profile(&self, side: f32) -> Vec<Vec2> {
        self.profile_heights()
            .into_iter()
            .map(|y| Vec2::new(self.center_x + side * self.half_width_at(y), y))
            .collect()
    }

    fn profile_heights(&self) -> Vec<f32> {
        let lm = &self.landmarks;
        let mut heights = Vec::with_capacity(2 * BULB_SEGMENTS + 2);

        let top_span = lm.neck_top - lm.ceiling;
        for i in 0..BULB_SEGMENTS {
            heights.push(lm.ceiling + top_span * i as f32 / BULB_SEGMENTS as f32);
        }
        heights.push(lm.neck_top);

        let bottom_span = lm.floor - lm.neck_bottom;
        for i in 0..BULB_SEGMENTS {
            heights.push(lm.neck_bottom + bottom_span * i as f32 / BULB_SEGMENTS as f32);
        }
        heights.push(lm.floor);

        heights
    }

    fn build_walls(&self) -> Vec<WallSegment> {
        let mut walls = Vec::with_capacity(2 * (2 * BULB_SEGMENTS + 1));
        for side in [-1.0, 1.0] {
            let points = self.profile(side);
            walls.extend(
                points
                    .windows(2)
                    .map(|pair| WallSegment::new(pair[0], pair[1])),
            );
        }
        walls
    }

    pub fn walls(&self) -> &[WallSegment] {
        &self.walls
    }

    pub fn landmarks(&self) -> Landmarks {
        self.landmarks
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn center_x(&self) -> f32 {
        self.center_x
    }

    pub fn max_half_width(&self) -> f32 {
        self.max_half_width
    }

    pub fn neck_half_width(&self) -> f32 {
        self.neck_half_width
    }

    pub fn neck_top(&self) -> f32 {
        self.landmarks.neck_top
    }

    pub fn neck_bottom(&self) -> f32 {
        self.landmarks.neck_bottom
    }

    pub fn floor(&self) -> f32 {
        self.landmarks.floor
    }

    pub fn ceiling(&self) -> f32 {
        self.landmarks.ceiling
    }
}
