//! Simulation state and core types
//!
//! Everything the physics step reads or writes lives here.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::trail::TrailBuffer;
use crate::consts::*;

/// What currently drives the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimulationMode {
    /// Not ticking (never started, or stopped)
    #[default]
    Idle,
    /// Physics advances every frame
    Running,
    /// Pointer owns the ball; physics and the clock are suspended
    Dragging,
}

/// The moving disc
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub center: DVec2,
    pub velocity: DVec2,
    pub radius: f64,
}

impl Ball {
    /// Ball in its starting pose inside the given boundary
    pub fn new(boundary: &Boundary) -> Self {
        let offset = INITIAL_BALL_OFFSET
            .min(boundary.radius - INITIAL_BALL_RADIUS)
            .max(0.0);
        Self {
            center: boundary.center - DVec2::new(0.0, offset),
            velocity: DVec2::new(INITIAL_VELOCITY.0, INITIAL_VELOCITY.1),
            radius: INITIAL_BALL_RADIUS,
        }
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Whether `point` lies on or inside the ball
    pub fn contains(&self, point: DVec2) -> bool {
        self.center.distance(point) <= self.radius
    }
}

/// The static circular wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub center: DVec2,
    pub radius: f64,
}

impl Boundary {
    /// Largest circle that fits the surface, inset by `BOUNDARY_MARGIN`.
    /// Returns `None` when nothing fits.
    pub fn from_surface(width: f64, height: f64) -> Option<Self> {
        // `f64::min` skips NaN, so check both sides first
        if !(width.is_finite() && height.is_finite()) {
            return None;
        }
        let radius = width.min(height) / 2.0 - BOUNDARY_MARGIN;
        if !(radius > 0.0) {
            return None;
        }
        Some(Self {
            center: DVec2::new(width / 2.0, height / 2.0),
            radius,
        })
    }

    /// Distance from the boundary center to `point`
    pub fn distance_to(&self, point: DVec2) -> f64 {
        self.center.distance(point)
    }
}

/// Raised once for every tick that ends in a wall contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    /// Contact point on the wall
    pub point: DVec2,
    /// Ball center after correction
    pub center: DVec2,
    /// Ball radius after growth
    pub radius: f64,
    /// Ball speed after the bounce
    pub speed: f64,
    /// Collisions since the last reset, including this one
    pub count: u64,
}

/// Complete physics state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    pub ball: Ball,
    pub boundary: Boundary,
    /// Recent ball centers (fading trail)
    pub motion: TrailBuffer,
    /// Recent wall contacts (contact markers)
    pub collisions: TrailBuffer,
    /// Collisions since the last reset
    pub collision_count: u64,
    /// Physics steps since the last reset
    pub time_ticks: u64,
}

impl SimState {
    pub fn new(boundary: Boundary) -> Self {
        Self {
            ball: Ball::new(&boundary),
            boundary,
            motion: TrailBuffer::new(MOTION_BLUR_STEPS),
            collisions: TrailBuffer::new(MAX_COLLISION_POINTS),
            collision_count: 0,
            time_ticks: 0,
        }
    }

    /// Put the ball back in its starting pose and forget all history
    pub fn reset(&mut self) {
        self.ball = Ball::new(&self.boundary);
        self.motion.clear();
        self.collisions.clear();
        self.collision_count = 0;
        self.time_ticks = 0;
    }
}
