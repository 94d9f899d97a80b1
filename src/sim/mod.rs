//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - One step per frame, no variable timestep
//! - Wall-clock time only feeds the display clock, never the physics
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod state;
pub mod tick;
pub mod trail;

pub use clock::SimulationClock;
pub use collision::{CollisionResult, reflect_velocity, resolve_boundary_collision};
pub use state::{Ball, Boundary, CollisionEvent, SimState, SimulationMode};
pub use tick::step;
pub use trail::TrailBuffer;
