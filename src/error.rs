//! Error types
//!
//! Initialization failures are fatal. Recording failures are reported by
//! encoders but never escape the recording controller.

use thiserror::Error;

/// The simulation cannot exist without these collaborators
#[derive(Debug, Error, PartialEq)]
pub enum InitError {
    #[error("no drawing surface was provided")]
    MissingSurface,
    #[error("no audio mixing graph was provided")]
    MissingMixer,
    #[error("no frame scheduler was provided")]
    MissingScheduler,
    #[error("drawing surface is too small for a boundary ({width}x{height})")]
    DegenerateSurface { width: f64, height: f64 },
    #[error("platform initialization failed: {0}")]
    Platform(String),
}

/// Problems reported by a media encoder
#[derive(Debug, Error, PartialEq)]
pub enum RecordingError {
    #[error("media encoder is unavailable")]
    EncoderUnavailable,
    #[error("media encoder failed: {0}")]
    Encoder(String),
}
