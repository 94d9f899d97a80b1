//! Physics tuning and display preferences
//!
//! Persisted as JSON in LocalStorage on the web.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Physics tuning knobs, read on every tick.
///
/// Values are never validated. Nonsensical numbers give strange motion,
/// not errors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Added to `velocity.y` each tick
    pub gravity: f64,
    /// Speed multiplier applied on each bounce
    pub velocity_increase_factor: f64,
    /// Per-tick multiplier on both velocity axes
    pub velocity_decay: f64,
    /// Radius multiplier applied on each bounce
    pub ball_growth_rate: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            velocity_increase_factor: VELOCITY_INCREASE_FACTOR,
            velocity_decay: VELOCITY_DECAY,
            ball_growth_rate: BALL_GROWTH_RATE,
        }
    }
}

/// User settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: PhysicsConfig,

    // === Visuals ===
    /// Fading motion trail behind the ball
    pub show_trails: bool,
    /// Lines from recorded contact points to the ball
    pub show_collision_lines: bool,
    /// Elapsed-time readout
    pub show_timer: bool,

    // === Audio ===
    /// Play a tone on each bounce
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            show_trails: true,
            show_collision_lines: true,
            show_timer: true,
            sound_enabled: true,
            volume: 0.8,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "grow_bounce_settings";

    /// Parse settings, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.to_json());
            log::info!("Settings saved");
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
