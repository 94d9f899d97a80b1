//! Wall-clock elapsed time, independent of tick count
//!
//! Pausing freezes `elapsed`; resuming re-anchors the start instant so that
//! `elapsed` carries on from where it stopped.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationClock {
    /// Instant (seconds) that `elapsed` is measured from, while running
    started_at: Option<f64>,
    /// Seconds accumulated so far
    elapsed: f64,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin or resume measuring at `now`
    pub fn start(&mut self, now: f64) {
        if self.started_at.is_none() {
            self.started_at = Some(now - self.elapsed);
        }
    }

    /// Recompute `elapsed` at `now` (no-op while paused)
    pub fn update(&mut self, now: f64) -> f64 {
        if let Some(started_at) = self.started_at {
            self.elapsed = (now - started_at).max(0.0);
        }
        self.elapsed
    }

    /// Freeze `elapsed` at `now`
    pub fn pause(&mut self, now: f64) {
        self.update(now);
        self.started_at = None;
    }

    pub fn reset(&mut self) {
        self.started_at = None;
        self.elapsed = 0.0;
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn started_at(&self) -> Option<f64> {
        self.started_at
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }
}
