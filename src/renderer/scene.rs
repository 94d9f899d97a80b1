//! Scene painting
//!
//! Paint order (back to front): background, boundary wall, contact lines,
//! motion trail, ball, HUD text, caller overlays.

use std::f64::consts::TAU;

use glam::DVec2;

use super::Surface;
use super::style::{Color, StrokeStyle, TextOverlay, colors};
use crate::sim::SimState;

/// Boundary wall line width
const BOUNDARY_WIDTH: f64 = 3.0;
/// Contact marker dot radius
const CONTACT_DOT_RADIUS: f64 = 2.5;
/// Peak opacity of the oldest-to-newest trail ramp
const TRAIL_MAX_ALPHA: f32 = 0.5;

/// Which optional layers to paint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneOptions {
    pub show_trails: bool,
    pub show_collision_lines: bool,
    pub show_timer: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            show_trails: true,
            show_collision_lines: true,
            show_timer: true,
        }
    }
}

/// Everything needed to paint one frame, borrowed read-only
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    pub state: &'a SimState,
    pub ball_color: Color,
    /// Seconds on the simulation clock
    pub elapsed: f64,
    pub overlays: &'a [TextOverlay],
    pub options: SceneOptions,
}

/// Paint the full scene onto `surface`
pub fn paint_scene(view: &SceneView<'_>, surface: &mut dyn Surface) {
    let state = view.state;
    let ball = &state.ball;
    let boundary = &state.boundary;

    surface.clear(colors::BACKGROUND);

    surface.stroke_arc(
        boundary.center,
        boundary.radius,
        0.0,
        TAU,
        &StrokeStyle::new(colors::BOUNDARY, BOUNDARY_WIDTH),
    );

    if view.options.show_collision_lines {
        let stroke = StrokeStyle::new(view.ball_color.with_alpha(0.35), 1.0);
        for point in state.collisions.iter() {
            surface.line(*point, ball.center, &stroke);
        }
        for point in state.collisions.iter() {
            surface.fill_arc(*point, CONTACT_DOT_RADIUS, 0.0, TAU, view.ball_color);
        }
    }

    if view.options.show_trails {
        // Oldest sample faintest and smallest
        let n = state.motion.len();
        for (i, pos) in state.motion.iter().enumerate() {
            let t = (i + 1) as f64 / (n + 1) as f64;
            let alpha = TRAIL_MAX_ALPHA * t as f32;
            let radius = ball.radius * (0.5 + 0.5 * t);
            surface.fill_arc(*pos, radius, 0.0, TAU, view.ball_color.with_alpha(alpha));
        }
    }

    surface.fill_arc(ball.center, ball.radius, 0.0, TAU, view.ball_color);
    surface.stroke_arc(
        ball.center,
        ball.radius,
        0.0,
        TAU,
        &StrokeStyle::new(colors::BALL_OUTLINE, 1.0),
    );

    if view.options.show_timer {
        surface.text(
            &format_elapsed(view.elapsed),
            DVec2::new(16.0, 32.0),
            "bold 20px monospace",
            colors::HUD_TEXT,
        );
        surface.text(
            &format!("Bounces: {}", state.collision_count),
            DVec2::new(16.0, 58.0),
            "16px monospace",
            colors::HUD_TEXT,
        );
    }

    for overlay in view.overlays {
        surface.text(
            &overlay.text,
            DVec2::new(overlay.x, overlay.y),
            &overlay.font_css(),
            overlay.color,
        );
    }
}

/// `m:ss.t` clock readout
pub fn format_elapsed(seconds: f64) -> String {
    let tenths = (seconds.max(0.0) * 10.0).floor() as u64;
    let minutes = tenths / 600;
    let secs = (tenths / 10) % 60;
    format!("{}:{:02}.{}", minutes, secs, tenths % 10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{CommandList, DrawCommand};
    use crate::sim::Boundary;

    fn view_state() -> SimState {
        SimState::new(Boundary::from_surface(440.0, 440.0).unwrap())
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0.0), "0:00.0");
        assert_eq!(format_elapsed(61.25), "1:01.2");
        assert_eq!(format_elapsed(-3.0), "0:00.0");
    }

    #[test]
    fn test_paint_order_minimal_scene() {
        let state = view_state();
        let mut surface = CommandList::new(440.0, 440.0);
        let view = SceneView {
            state: &state,
            ball_color: Color::rgb(1.0, 0.0, 0.0),
            elapsed: 0.0,
            overlays: &[],
            options: SceneOptions {
                show_trails: true,
                show_collision_lines: true,
                show_timer: false,
            },
        };

        paint_scene(&view, &mut surface);

        let cmds = surface.commands();
        assert!(matches!(cmds[0], DrawCommand::Clear(_)));
        assert!(matches!(cmds[1], DrawCommand::StrokeArc { radius, .. } if radius == 200.0));
        assert!(matches!(cmds[2], DrawCommand::FillArc { radius, .. } if radius == state.ball.radius));
        assert_eq!(cmds.len(), 4);
    }

    #[test]
    fn test_trail_fades_in_toward_newest() {
        let mut state = view_state();
        for i in 0..3 {
            state.motion.push(DVec2::new(100.0 + i as f64, 100.0));
        }
        let mut surface = CommandList::new(440.0, 440.0);
        let view = SceneView {
            state: &state,
            ball_color: Color::rgb(0.0, 1.0, 0.0),
            elapsed: 0.0,
            overlays: &[],
            options: SceneOptions {
                show_collision_lines: false,
                show_timer: false,
                ..Default::default()
            },
        };

        paint_scene(&view, &mut surface);

        let alphas: Vec<f32> = surface.commands()[2..5]
            .iter()
            .map(|c| match c {
                DrawCommand::FillArc { color, .. } => color.a,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert!(alphas[0] < alphas[1] && alphas[1] < alphas[2]);
        assert!(alphas[2] < 1.0);
    }

    #[test]
    fn test_collision_lines_point_at_ball() {
        let mut state = view_state();
        state.collisions.push(DVec2::new(220.0, 420.0));
        state.collisions.push(DVec2::new(20.0, 220.0));
        let mut surface = CommandList::new(440.0, 440.0);
        let view = SceneView {
            state: &state,
            ball_color: Color::rgb(0.0, 0.0, 1.0),
            elapsed: 0.0,
            overlays: &[],
            options: SceneOptions {
                show_trails: false,
                show_timer: false,
                ..Default::default()
            },
        };

        paint_scene(&view, &mut surface);

        let lines: Vec<_> = surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|(_, to)| *to == state.ball.center));
    }

    #[test]
    fn test_overlays_painted_last_and_untouched() {
        let state = view_state();
        let overlays = [TextOverlay {
            text: "@someone".into(),
            x: 40.0,
            y: 400.0,
            color: Color::rgb(1.0, 1.0, 0.0),
            font: "Arial".into(),
            size: 18.0,
            is_bold: true,
        }];
        let mut surface = CommandList::new(440.0, 440.0);
        let view = SceneView {
            state: &state,
            ball_color: Color::rgb(1.0, 1.0, 1.0),
            elapsed: 12.0,
            overlays: &overlays,
            options: SceneOptions::default(),
        };

        paint_scene(&view, &mut surface);

        assert_eq!(surface.texts(), vec!["0:12.0", "Bounces: 0", "@someone"]);
        match surface.commands().last() {
            Some(DrawCommand::Text { position, font, .. }) => {
                assert_eq!(*position, DVec2::new(40.0, 400.0));
                assert_eq!(font, "bold 18px Arial");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
