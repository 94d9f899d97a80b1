//! Audio contract and procedural collision tones
//!
//! The simulation owns a mixing graph only so the host can reach its
//! destination (to attach sounds, or to feed a recording). It never plays
//! anything itself.

use crate::consts::{INITIAL_BALL_RADIUS, MAX_BALL_RADIUS};

/// A mixing graph with a single destination other sources connect to
pub trait MixingGraph {
    type Destination;

    fn destination(&self) -> &Self::Destination;
}

/// Mixing graph for headless runs; its destination is nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentMixer;

impl MixingGraph for SilentMixer {
    type Destination = ();

    fn destination(&self) -> &() {
        &()
    }
}

/// A short sine blip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Hz
    pub frequency: f32,
    /// Seconds
    pub duration: f32,
    /// Peak gain (0.0 - 1.0) before master volume
    pub gain: f32,
}

/// Highest pitch, for the smallest ball
const TONE_MAX_HZ: f32 = 880.0;
/// Lowest pitch, for a ball at maximum size
const TONE_MIN_HZ: f32 = 110.0;
/// Impact speed that plays at full loudness
const TONE_FULL_SPEED: f64 = 20.0;

/// Tone for a bounce: bigger balls sound lower, harder hits sound louder
pub fn collision_tone(radius: f64, speed: f64) -> Tone {
    let growth = ((radius - INITIAL_BALL_RADIUS) / (MAX_BALL_RADIUS - INITIAL_BALL_RADIUS))
        .clamp(0.0, 1.0) as f32;
    let growth = if growth.is_nan() { 0.0 } else { growth };
    // Exponential sweep between the two pitches
    let frequency = TONE_MAX_HZ * (TONE_MIN_HZ / TONE_MAX_HZ).powf(growth);

    let loudness = (speed / TONE_FULL_SPEED).clamp(0.0, 1.0) as f32;

    Tone {
        frequency,
        duration: 0.08 + 0.12 * growth,
        gain: 0.1 + 0.3 * loudness,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_range() {
        let small = collision_tone(INITIAL_BALL_RADIUS, 5.0);
        let big = collision_tone(MAX_BALL_RADIUS, 5.0);
        assert!((small.frequency - TONE_MAX_HZ).abs() < 1e-3);
        assert!((big.frequency - TONE_MIN_HZ).abs() < 1e-3);
    }

    #[test]
    fn test_pitch_drops_as_ball_grows() {
        let a = collision_tone(10.0, 5.0);
        let b = collision_tone(50.0, 5.0);
        assert!(b.frequency < a.frequency);
        assert!(b.duration > a.duration);
    }

    #[test]
    fn test_harder_hits_are_louder_and_capped() {
        let soft = collision_tone(10.0, 1.0);
        let hard = collision_tone(10.0, 15.0);
        let huge = collision_tone(10.0, 1_000.0);
        assert!(hard.gain > soft.gain);
        assert!((huge.gain - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_nonsense_inputs_stay_finite() {
        let tone = collision_tone(f64::NAN, -4.0);
        assert!(tone.gain.is_finite());
        assert!(tone.frequency.is_finite());
    }
}
