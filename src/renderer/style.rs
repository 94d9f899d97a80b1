//! Colors, stroke styles and text overlays

use rand::Rng;
use serde::{Deserialize, Serialize};

/// RGBA color with components in 0.0 - 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Build from hue (degrees), saturation and lightness (0.0 - 1.0)
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = lightness - c / 2.0;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Self::rgb(r + m, g + m, b + m)
    }

    /// CSS `rgba(...)` string for canvas styles
    pub fn to_css(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgba({}, {}, {}, {})",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            self.a.clamp(0.0, 1.0)
        )
    }
}

/// Colors for scene elements
pub mod colors {
    use super::Color;

    pub const BACKGROUND: Color = Color::rgb(0.02, 0.02, 0.05);
    pub const BOUNDARY: Color = Color::rgb(0.85, 0.85, 0.9);
    pub const BALL_OUTLINE: Color = Color::rgba(1.0, 1.0, 1.0, 0.6);
    pub const HUD_TEXT: Color = Color::rgb(0.9, 0.9, 0.95);
}

/// Line color and width
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
}

impl StrokeStyle {
    pub const fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}

/// Caller-supplied text drawn on top of the scene, passed through as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOverlay {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub color: Color,
    /// Font family, e.g. `"sans-serif"`
    pub font: String,
    /// Font size in pixels
    pub size: f64,
    pub is_bold: bool,
}

impl TextOverlay {
    /// 18px sans-serif in the HUD color
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            color: colors::HUD_TEXT,
            font: "sans-serif".to_string(),
            size: 18.0,
            is_bold: false,
        }
    }

    /// CSS font shorthand, e.g. `"bold 24px sans-serif"`
    pub fn font_css(&self) -> String {
        if self.is_bold {
            format!("bold {}px {}", self.size, self.font)
        } else {
            format!("{}px {}", self.size, self.font)
        }
    }
}

/// Pick a bright, saturated ball color
pub fn random_display_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    let hue = rng.random_range(0.0..360.0);
    let saturation = rng.random_range(0.7..1.0);
    let lightness = rng.random_range(0.5..0.65);
    Color::from_hsl(hue, saturation, lightness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn close(a: Color, b: Color) -> bool {
        (a.r - b.r).abs() < 1e-4 && (a.g - b.g).abs() < 1e-4 && (a.b - b.b).abs() < 1e-4
    }

    #[test]
    fn test_hsl_primaries() {
        assert!(close(Color::from_hsl(0.0, 1.0, 0.5), Color::rgb(1.0, 0.0, 0.0)));
        assert!(close(Color::from_hsl(120.0, 1.0, 0.5), Color::rgb(0.0, 1.0, 0.0)));
        assert!(close(Color::from_hsl(240.0, 1.0, 0.5), Color::rgb(0.0, 0.0, 1.0)));
        assert!(close(Color::from_hsl(360.0, 1.0, 0.5), Color::rgb(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_to_css() {
        assert_eq!(Color::rgba(1.0, 0.0, 0.5, 0.25).to_css(), "rgba(255, 0, 128, 0.25)");
    }

    #[test]
    fn test_font_css() {
        let mut overlay = TextOverlay {
            text: "hi".into(),
            x: 0.0,
            y: 0.0,
            color: colors::HUD_TEXT,
            font: "sans-serif".into(),
            size: 24.0,
            is_bold: true,
        };
        assert_eq!(overlay.font_css(), "bold 24px sans-serif");
        overlay.is_bold = false;
        assert_eq!(overlay.font_css(), "24px sans-serif");
    }

    #[test]
    fn test_display_color_is_seeded() {
        let a = random_display_color(&mut Pcg32::seed_from_u64(7));
        let b = random_display_color(&mut Pcg32::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!(a.a, 1.0);
    }
}
