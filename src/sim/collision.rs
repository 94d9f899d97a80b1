//! Collision detection and response against the circular boundary
//!
//! The ball lives inside the wall, so contact happens when its far edge
//! reaches the wall: `distance >= boundary.radius - ball.radius`.

use glam::DVec2;

use super::state::{Ball, Boundary};
use crate::consts::{MAX_BALL_RADIUS, MIN_VELOCITY, RESTITUTION};
use crate::settings::PhysicsConfig;

/// Outcome of resolving one tick against the wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Velocity after the bounce
    pub velocity: DVec2,
    /// Radius after growth
    pub radius: f64,
    /// Center after removing any penetration
    pub center: DVec2,
    /// Contact point on the wall (if hit)
    pub point: Option<DVec2>,
}

impl CollisionResult {
    /// No contact: the ball carries on unchanged
    pub fn miss(ball: &Ball) -> Self {
        Self {
            hit: false,
            velocity: ball.velocity,
            radius: ball.radius,
            center: ball.center,
            point: None,
        }
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: DVec2, normal: DVec2) -> DVec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Unit vector from the boundary center toward the ball.
///
/// A ball sitting exactly on the center has no direction of its own, so the
/// direction of travel is used instead, then straight down.
fn contact_normal(offset: DVec2, velocity: DVec2) -> DVec2 {
    offset
        .try_normalize()
        .or_else(|| velocity.try_normalize())
        .unwrap_or(DVec2::Y)
}

/// Check the ball against the wall and compute the bounce
pub fn resolve_boundary_collision(
    ball: &Ball,
    boundary: &Boundary,
    config: &PhysicsConfig,
) -> CollisionResult {
    let offset = ball.center - boundary.center;
    let distance = offset.length();

    if distance < boundary.radius - ball.radius {
        return CollisionResult::miss(ball);
    }

    let normal = contact_normal(offset, ball.velocity);

    let mut velocity = reflect_velocity(ball.velocity, normal) * RESTITUTION;

    // Radius only ever grows, and never past the cap
    let radius = (ball.radius * config.ball_growth_rate)
        .max(ball.radius)
        .min(MAX_BALL_RADIUS);

    velocity *= config.velocity_increase_factor;

    let speed = velocity.length();
    if !(speed >= MIN_VELOCITY) {
        // A stalled ball gets pushed back toward the center
        let direction = velocity.try_normalize().unwrap_or(-normal);
        velocity = direction * MIN_VELOCITY;
    }

    let point = boundary.center + normal * boundary.radius;
    let center = boundary.center + normal * (boundary.radius - radius).max(0.0);

    CollisionResult {
        hit: true,
        velocity,
        radius,
        center,
        point: Some(point),
    }
}
