//! Bounded position histories
//!
//! Trails exist only for rendering. Physics never reads them.

use std::collections::VecDeque;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Fixed-capacity FIFO of positions (oldest first)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TrailSnapshot")]
pub struct TrailBuffer {
    points: VecDeque<DVec2>,
    capacity: usize,
}

/// Serialized form; may hold more points than it is allowed to keep
#[derive(Deserialize)]
struct TrailSnapshot {
    points: Vec<DVec2>,
    capacity: usize,
}

impl From<TrailSnapshot> for TrailBuffer {
    fn from(snapshot: TrailSnapshot) -> Self {
        let mut trail = TrailBuffer::new(snapshot.capacity);
        for point in snapshot.points {
            trail.push(point);
        }
        trail
    }
}

impl TrailBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a point, evicting the oldest one when full
    pub fn push(&mut self, point: DVec2) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    /// Points from oldest to newest
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &DVec2> + DoubleEndedIterator + '_ {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<DVec2> {
        self.points.back().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
