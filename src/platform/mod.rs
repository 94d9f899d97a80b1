//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Drawing surface, frame scheduling, audio and capture (web)

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::cell::Cell;
use std::rc::Rc;

/// Source of wall-clock time in seconds
pub trait TimeSource {
    fn now_seconds(&self) -> f64;
}

/// Monotonic time since construction (`performance.now()` on the web)
#[derive(Debug, Clone, Copy)]
pub struct InstantTimeSource {
    origin: instant::Instant,
}

impl InstantTimeSource {
    pub fn new() -> Self {
        Self {
            origin: instant::Instant::now(),
        }
    }
}

impl Default for InstantTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for InstantTimeSource {
    fn now_seconds(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Hand-driven time, shared between clones
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    now: Rc<Cell<f64>>,
}

impl ManualTime {
    pub fn new(start: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, seconds: f64) {
        self.now.set(seconds);
    }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }
}

impl TimeSource for ManualTime {
    fn now_seconds(&self) -> f64 {
        self.now.get()
    }
}
