//! 2D rendering module
//!
//! The scene is painted as an ordered list of primitive operations issued to
//! a [`Surface`]. The surface never reports back; every call is assumed to
//! complete immediately.

pub mod commands;
pub mod scene;
pub mod style;

pub use commands::{CommandList, DrawCommand};
pub use scene::{SceneOptions, SceneView, paint_scene};
pub use style::{Color, StrokeStyle, TextOverlay, colors, random_display_color};

use glam::DVec2;

/// A drawing target (canvas, offscreen buffer, command recorder)
pub trait Surface {
    /// Width and height in surface pixels
    fn size(&self) -> (f64, f64);

    fn clear(&mut self, color: Color);

    /// Outline an arc from `start` to `end` (radians, clockwise in screen space)
    fn stroke_arc(&mut self, center: DVec2, radius: f64, start: f64, end: f64, stroke: &StrokeStyle);

    fn fill_arc(&mut self, center: DVec2, radius: f64, start: f64, end: f64, color: Color);

    fn line(&mut self, from: DVec2, to: DVec2, stroke: &StrokeStyle);

    /// Draw `text` with its baseline starting at `position`. `font` is a CSS font shorthand.
    fn text(&mut self, text: &str, position: DVec2, font: &str, color: Color);
}

/// Shared surfaces, so a host can keep a handle to what the simulation paints on
impl<S: Surface + ?Sized> Surface for std::rc::Rc<std::cell::RefCell<S>> {
    fn size(&self) -> (f64, f64) {
        self.borrow().size()
    }

    fn clear(&mut self, color: Color) {
        self.borrow_mut().clear(color);
    }

    fn stroke_arc(&mut self, center: DVec2, radius: f64, start: f64, end: f64, stroke: &StrokeStyle) {
        self.borrow_mut().stroke_arc(center, radius, start, end, stroke);
    }

    fn fill_arc(&mut self, center: DVec2, radius: f64, start: f64, end: f64, color: Color) {
        self.borrow_mut().fill_arc(center, radius, start, end, color);
    }

    fn line(&mut self, from: DVec2, to: DVec2, stroke: &StrokeStyle) {
        self.borrow_mut().line(from, to, stroke);
    }

    fn text(&mut self, text: &str, position: DVec2, font: &str, color: Color) {
        self.borrow_mut().text(text, position, font, color);
    }
}
