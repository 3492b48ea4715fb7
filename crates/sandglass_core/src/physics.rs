//! Per-grain physics step.
//!
//! Each moving grain goes through the same fixed sequence every update:
//! integrate, walls, floor, ceiling, grain-grain, settle. The order is part of
//! the observable behavior; do not reshuffle it.
//!
//! Grain-grain contacts use a soft positional correction with overlap-scaled
//! velocity damping, not an impulse exchange. The settle threshold in
//! [`PhysicsConfig`] is tuned against that approximation.

use crate::config::{PhysicsConfig, SUPPORT_TOLERANCE};
use crate::geometry::{Geometry, WallSegment};
use crate::grain::Grain;
use crate::math::Vec2;
use crate::spatial_hash::SpatialHashGrid;

/// Distances below this are treated as coincident points.
const CONTACT_EPSILON: f32 = 1e-4;

/// Run the full step for `grains[index]`.
///
/// Neighbors are looked up in `grid` at the grain's position after it has
/// been integrated and pushed out of the container, so contacts are found
/// where the grain ends up this frame. `scratch` holds the candidate list.
/// Returns `true` if the grain settled during this step.
pub fn step_grain(
    grains: &mut [Grain],
    index: usize,
    grid: &SpatialHashGrid,
    scratch: &mut Vec<usize>,
    geometry: &Geometry,
    config: &PhysicsConfig,
    dt: f32,
) -> bool {
    move_grain(&mut grains[index], geometry, config, dt);

    scratch.clear();
    scratch.extend(grid.neighbors(index, grains[index].position));

    for &other in scratch.iter() {
        resolve_contact(grains, index, other, geometry, config);
    }

    try_settle(grains, index, scratch, geometry, config)
}

/// Integrate, then push the grain back inside the container.
pub fn move_grain(grain: &mut Grain, geometry: &Geometry, config: &PhysicsConfig, dt: f32) {
    integrate(grain, config, dt);
    confine(grain, geometry, config);
}

/// Walls, floor and ceiling, in that order.
pub fn confine(grain: &mut Grain, geometry: &Geometry, config: &PhysicsConfig) {
    collide_walls(grain, geometry, config);
    collide_floor(grain, geometry, config);
    collide_ceiling(grain, geometry, config);
}

/// Gravity, drag and explicit Euler position update.
pub fn integrate(grain: &mut Grain, config: &PhysicsConfig, dt: f32) {
    grain.velocity.y += config.gravity * dt;
    grain.velocity.x *= config.friction;
    grain.position += grain.velocity * dt;
}

/// Push the grain out of every wall segment it overlaps.
///
/// The normal velocity component is reflected and damped when the grain moves
/// into the wall; the tangential component is kept. A final containment clamp
/// against the analytic profile catches grains that stepped through a wall.
pub fn collide_walls(grain: &mut Grain, geometry: &Geometry, config: &PhysicsConfig) {
    let radius = grain.radius;
    for wall in geometry.walls() {
        let closest = wall.closest_point(grain.position);
        let offset = grain.position - closest;
        let dist_sq = offset.length_squared();
        if dist_sq >= radius * radius {
            continue;
        }

        let dist = dist_sq.sqrt();
        let normal = if dist > CONTACT_EPSILON {
            offset / dist
        } else {
            inward_normal(wall, geometry.center_x())
        };

        grain.position = closest + normal * radius;
        reflect_along(&mut grain.velocity, normal, config.wall_damping);
    }

    contain_laterally(grain, geometry, config);
}

/// Floor contact: clamp, bounce with damping, rub off horizontal speed.
pub fn collide_floor(grain: &mut Grain, geometry: &Geometry, config: &PhysicsConfig) {
    let floor = geometry.floor();
    if grain.position.y + grain.radius > floor {
        grain.position.y = floor - grain.radius;
        grain.velocity.y = -grain.velocity.y.abs() * config.floor_damping;
        grain.velocity.x *= config.floor_friction;
    }
}

/// Ceiling contact, mostly reached by exploded grains.
pub fn collide_ceiling(grain: &mut Grain, geometry: &Geometry, config: &PhysicsConfig) {
    let ceiling = geometry.ceiling();
    if grain.position.y - grain.radius < ceiling {
        grain.position.y = ceiling + grain.radius;
        grain.velocity.y = grain.velocity.y.abs() * config.floor_damping;
    }
}

/// Separate `grains[index]` from `grains[other]` if they overlap.
///
/// Each side moves half the overlap along the separation normal, except that
/// a settled neighbor stays pinned. The moving grain loses part of its
/// approaching normal velocity in proportion to the overlap.
pub fn resolve_contact(
    grains: &mut [Grain],
    index: usize,
    other: usize,
    geometry: &Geometry,
    config: &PhysicsConfig,
) -> bool {
    let (this, that) = (grains[index], grains[other]);
    if !that.active {
        return false;
    }

    let delta = this.position - that.position;
    let min_dist = this.radius + that.radius;
    let dist_sq = delta.length_squared();
    if dist_sq >= min_dist * min_dist {
        return false;
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > CONTACT_EPSILON {
        delta / dist
    } else {
        Vec2::NEG_Y
    };
    let overlap = min_dist - dist;
    let correction = normal * (overlap * 0.5);

    {
        let grain = &mut grains[index];
        grain.position += correction;
        clamp_vertical(grain, geometry);

        let approach = grain.velocity.dot(normal);
        if approach < 0.0 {
            let damping = (overlap * config.overlap_damping).min(1.0);
            grain.velocity -= normal * (approach * damping);
        }
    }

    if !that.settled {
        let neighbor = &mut grains[other];
        neighbor.position -= correction;
        clamp_vertical(neighbor, geometry);
    }

    true
}

/// Settle the grain if it is slow and supported in the lower bulb.
pub fn try_settle(
    grains: &mut [Grain],
    index: usize,
    neighbors: &[usize],
    geometry: &Geometry,
    config: &PhysicsConfig,
) -> bool {
    let grain = grains[index];
    if grain.position.y <= geometry.neck_bottom() || grain.speed() >= config.settle_speed {
        return false;
    }

    let on_floor = grain.position.y + grain.radius >= geometry.floor() - SUPPORT_TOLERANCE;
    let on_pile = || {
        neighbors.iter().any(|&other| {
            let below = &grains[other];
            below.active
                && below.settled
                && below.position.y > grain.position.y
                && grain.position.distance(below.position)
                    < grain.radius + below.radius + SUPPORT_TOLERANCE
        })
    };

    if on_floor || on_pile() {
        grains[index].settle();
        return true;
    }
    false
}

/// Reflect the component of `velocity` heading into `normal`, keeping `damping` of it.
fn reflect_along(velocity: &mut Vec2, normal: Vec2, damping: f32) {
    let into = velocity.dot(normal);
    if into < 0.0 {
        *velocity -= normal * (into * (1.0 + damping));
    }
}

/// Segment normal pointing toward the container's center line.
fn inward_normal(wall: &WallSegment, center_x: f32) -> Vec2 {
    let along = wall.end - wall.start;
    let perp = Vec2::new(-along.y, along.x).normalize_or_zero();
    if perp == Vec2::ZERO {
        return Vec2::NEG_Y;
    }
    let midpoint_x = (wall.start.x + wall.end.x) * 0.5;
    if perp.x * (center_x - midpoint_x) >= 0.0 {
        perp
    } else {
        -perp
    }
}

/// Keep the grain's center inside the analytic profile at its height.
fn contain_laterally(grain: &mut Grain, geometry: &Geometry, config: &PhysicsConfig) {
    let limit = geometry.half_width_at(grain.position.y) - grain.radius;
    if limit <= 0.0 {
        grain.position.x = geometry.center_x();
        grain.velocity.x = 0.0;
        return;
    }

    let offset = grain.position.x - geometry.center_x();
    if offset.abs() > limit {
        let side = offset.signum();
        grain.position.x = geometry.center_x() + side * limit;
        if grain.velocity.x * side > 0.0 {
            grain.velocity.x = -grain.velocity.x * config.wall_damping;
        }
    }
}

/// Positional floor/ceiling clamp used after contact pushes.
fn clamp_vertical(grain: &mut Grain, geometry: &Geometry) {
    let low = geometry.ceiling() + grain.radius;
    let high = geometry.floor() - grain.radius;
    if low <= high {
        grain.position.y = grain.position.y.clamp(low, high);
    }
}
