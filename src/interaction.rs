//! Pointer dragging of the ball
//!
//! While a drag is active the pointer owns the ball: it is placed exactly
//! under the pointer with zero velocity and no trail is recorded.

use glam::DVec2;

use crate::sim::Ball;

/// Pointer input in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
}

/// Tracks whether the ball is currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragController {
    dragging: bool,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Grab the ball if `point` is on it. Returns true when a drag begins.
    pub fn pointer_down(&mut self, ball: &Ball, point: DVec2) -> bool {
        if self.dragging || !ball.contains(point) {
            return false;
        }
        self.dragging = true;
        true
    }

    /// Move the held ball to `point`. Returns true if the ball moved.
    pub fn pointer_move(&mut self, ball: &mut Ball, point: DVec2) -> bool {
        if !self.dragging {
            return false;
        }
        ball.center = point;
        ball.velocity = DVec2::ZERO;
        true
    }

    /// Let go of the ball. Returns true when a drag ends.
    pub fn pointer_up(&mut self) -> bool {
        std::mem::take(&mut self.dragging)
    }
}

/// Map a client-space pointer position onto surface pixels, accounting for
/// CSS scaling of the element (`rect` is `(left, top, width, height)`).
pub fn client_to_surface(client: DVec2, rect: (f64, f64, f64, f64), surface_size: (f64, f64)) -> DVec2 {
    let (left, top, width, height) = rect;
    let scale_x = if width > 0.0 { surface_size.0 / width } else { 1.0 };
    let scale_y = if height > 0.0 { surface_size.1 / height } else { 1.0 };
    DVec2::new((client.x - left) * scale_x, (client.y - top) * scale_y)
}
