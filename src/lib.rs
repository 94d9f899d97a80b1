//! Grow Bounce - a ball that grows every time it hits a circular wall
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball, boundary, collisions, trails, clock)
//! - `interaction`: Pointer dragging of the ball
//! - `scheduler`: Frame scheduling contract
//! - `simulation`: Start/stop/reset lifecycle tying the pieces together
//! - `recording`: Capture of the rendered surface into a media artifact
//! - `renderer`: Paint operations issued to a drawing surface
//! - `platform`: Time sources and browser adapters
//! - `audio`: Mixing graph contract and collision tones
//! - `settings`: Runtime physics configuration and preferences

pub mod audio;
pub mod error;
pub mod interaction;
pub mod platform;
pub mod recording;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod sim;
pub mod simulation;

pub use error::{InitError, RecordingError};
pub use simulation::{Simulation, SimulationBuilder};
pub use settings::{PhysicsConfig, Settings};

/// Simulation configuration constants
pub mod consts {
    /// Ball radius after construction and after every reset
    pub const INITIAL_BALL_RADIUS: f64 = 5.0;
    /// Growth never pushes the radius past this
    pub const MAX_BALL_RADIUS: f64 = 300.0;
    /// Initial distance of the ball above the boundary center
    pub const INITIAL_BALL_OFFSET: f64 = 150.0;
    /// Initial velocity (pixels per tick)
    pub const INITIAL_VELOCITY: (f64, f64) = (0.8, 0.8);

    /// Fraction of speed kept after reflecting off the wall
    pub const RESTITUTION: f64 = 0.95;
    /// Post-collision speed floor (keeps the ball from resting on the wall)
    pub const MIN_VELOCITY: f64 = 1.0;

    /// Motion samples kept for the fading trail
    pub const MOTION_BLUR_STEPS: usize = 10;
    /// Collision points kept for contact markers
    pub const MAX_COLLISION_POINTS: usize = 100;

    /// Gap between the surface edge and the boundary wall
    pub const BOUNDARY_MARGIN: f64 = 20.0;

    /// Default downward acceleration (pixels per tick²)
    pub const GRAVITY: f64 = 0.4;
    /// Default per-tick velocity damping
    pub const VELOCITY_DECAY: f64 = 0.999;
    /// Default speed multiplier applied on each bounce
    pub const VELOCITY_INCREASE_FACTOR: f64 = 1.01;
    /// Default radius multiplier applied on each bounce
    pub const BALL_GROWTH_RATE: f64 = 1.015;
}
