//! In-memory surface that records paint operations
//!
//! Used for headless runs and for asserting what a frame painted.

use glam::DVec2;

use super::Surface;
use super::style::{Color, StrokeStyle};

/// One recorded paint operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    StrokeArc {
        center: DVec2,
        radius: f64,
        start: f64,
        end: f64,
        stroke: StrokeStyle,
    },
    FillArc {
        center: DVec2,
        radius: f64,
        start: f64,
        end: f64,
        color: Color,
    },
    Line {
        from: DVec2,
        to: DVec2,
        stroke: StrokeStyle,
    },
    Text {
        text: String,
        position: DVec2,
        font: String,
        color: Color,
    },
}

/// Surface that keeps the commands of the most recent frame
#[derive(Debug, Clone, Default)]
pub struct CommandList {
    width: f64,
    height: f64,
    commands: Vec<DrawCommand>,
    /// Number of `clear` calls seen (one per painted frame)
    frames: u64,
}

impl CommandList {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            frames: 0,
        }
    }

    /// Commands issued since the last `clear`
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Text strings painted in the current frame
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for CommandList {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.frames += 1;
        self.commands.push(DrawCommand::Clear(color));
    }

    fn stroke_arc(&mut self, center: DVec2, radius: f64, start: f64, end: f64, stroke: &StrokeStyle) {
        self.commands.push(DrawCommand::StrokeArc {
            center,
            radius,
            start,
            end,
            stroke: *stroke,
        });
    }

    fn fill_arc(&mut self, center: DVec2, radius: f64, start: f64, end: f64, color: Color) {
        self.commands.push(DrawCommand::FillArc {
            center,
            radius,
            start,
            end,
            color,
        });
    }

    fn line(&mut self, from: DVec2, to: DVec2, stroke: &StrokeStyle) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            stroke: *stroke,
        });
    }

    fn text(&mut self, text: &str, position: DVec2, font: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            position,
            font: font.to_string(),
            color,
        });
    }
}
