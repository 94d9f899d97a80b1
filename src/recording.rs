//! Capture of the rendered surface (plus audio) into a media artifact
//!
//! Recording is best-effort: out-of-sequence calls and encoder failures are
//! logged and otherwise ignored, and never affect the simulation.
//!
//! Lifecycle: `Inactive -> Capturing -> Finalizing -> Inactive`. The last step
//! happens whenever the encoder reports completion, which may be long after
//! `stop_capture` returns. An encoder that fails to finish, or drops the
//! completion callback without calling it, also ends the session.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::RecordingError;

/// Where a capture session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingState {
    #[default]
    Inactive,
    Capturing,
    /// Stop requested; waiting for the encoder to flush
    Finalizing,
}

/// Encoder settings for one capture
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureOptions {
    /// Frames per second sampled from the surface
    pub frame_rate: f64,
    /// Container/codec, e.g. `"video/webm;codecs=vp9,opus"`
    pub mime_type: String,
    pub video_bits_per_second: Option<u32>,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            mime_type: "video/webm".to_string(),
            video_bits_per_second: Some(5_000_000),
        }
    }
}

/// Turns the surface's frames plus audio tracks into a deliverable artifact
pub trait MediaEncoder {
    /// An audio track that can be mixed into the capture
    type Track;
    /// The finished media (e.g. a blob)
    type Artifact;

    /// Whether encoding is possible at all in this environment
    fn is_available(&self) -> bool {
        true
    }

    /// Start consuming frames from the surface together with `audio_tracks`
    fn begin(&mut self, options: &CaptureOptions, audio_tracks: Vec<Self::Track>) -> Result<(), RecordingError>;

    /// Flush buffered frames and deliver the artifact to `on_finished`,
    /// possibly asynchronously. Called at most once per successful `begin`.
    ///
    /// When no artifact can be produced, drop `on_finished` without calling it
    /// (or return an error); the session still ends.
    fn finish(&mut self, on_finished: Box<dyn FnOnce(Self::Artifact)>) -> Result<(), RecordingError>;
}

/// Completion callback for a capture
pub type CompletionCallback<A> = Box<dyn FnOnce(A)>;

/// Travels with the encoder's completion callback. Dropping it while the
/// session is still finalizing means no artifact is coming.
struct FinalizeGuard {
    state: Rc<Cell<RecordingState>>,
}

impl FinalizeGuard {
    fn complete(&self) {
        self.state.set(RecordingState::Inactive);
    }
}

impl Drop for FinalizeGuard {
    fn drop(&mut self) {
        if self.state.get() == RecordingState::Finalizing {
            log::warn!("Capture ended without output");
            self.state.set(RecordingState::Inactive);
        }
    }
}

/// Drives one encoder through capture sessions
pub struct RecordingController<E: MediaEncoder> {
    encoder: E,
    options: CaptureOptions,
    state: Rc<Cell<RecordingState>>,
    on_complete: Option<CompletionCallback<E::Artifact>>,
}

impl<E: MediaEncoder> RecordingController<E>
where
    E::Artifact: 'static,
{
    pub fn new(encoder: E) -> Self {
        Self::with_options(encoder, CaptureOptions::default())
    }

    pub fn with_options(encoder: E, options: CaptureOptions) -> Self {
        Self {
            encoder,
            options,
            state: Rc::new(Cell::new(RecordingState::Inactive)),
            on_complete: None,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state.get()
    }

    pub fn is_capturing(&self) -> bool {
        self.state.get() == RecordingState::Capturing
    }

    pub fn options(&self) -> &CaptureOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: CaptureOptions) {
        self.options = options;
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Begin capturing. `on_complete` receives the artifact once the capture
    /// is stopped and flushed. Ignored unless inactive.
    pub fn start_capture(
        &mut self,
        on_complete: impl FnOnce(E::Artifact) + 'static,
        audio_tracks: Vec<E::Track>,
    ) {
        if self.state.get() != RecordingState::Inactive {
            log::debug!("Capture already in progress; start ignored");
            return;
        }
        if !self.encoder.is_available() {
            log::warn!("No media encoder available; recording disabled");
            return;
        }

        if let Err(e) = self.encoder.begin(&self.options, audio_tracks) {
            log::warn!("Could not start capture: {}", e);
            return;
        }

        self.on_complete = Some(Box::new(on_complete));
        self.state.set(RecordingState::Capturing);
        log::info!("Capture started ({})", self.options.mime_type);
    }

    /// Ask the encoder to finish. The completion callback fires when it does.
    /// Ignored unless capturing.
    pub fn stop_capture(&mut self) {
        if self.state.get() != RecordingState::Capturing {
            log::debug!("No capture in progress; stop ignored");
            return;
        }

        self.state.set(RecordingState::Finalizing);
        let guard = FinalizeGuard {
            state: Rc::clone(&self.state),
        };
        let on_complete = self.on_complete.take();

        let finished = self.encoder.finish(Box::new(move |artifact| {
            guard.complete();
            log::info!("Capture finished");
            if let Some(callback) = on_complete {
                callback(artifact);
            }
        }));

        if let Err(e) = finished {
            log::warn!("Could not finish capture: {}", e);
            self.state.set(RecordingState::Inactive);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Encoder that hands completion back to the test to fire later
    #[derive(Default)]
    struct DeferredEncoder {
        available: bool,
        fail_begin: bool,
        /// `finish` drops the callback and reports success
        drop_on_finish: bool,
        fail_finish: bool,
        begins: u32,
        tracks_seen: Vec<&'static str>,
        pending: Rc<RefCell<Option<Box<dyn FnOnce(Vec<u8>)>>>>,
    }

    impl DeferredEncoder {
        fn new() -> Self {
            Self {
                available: true,
                ..Default::default()
            }
        }

        fn flush(pending: &Rc<RefCell<Option<Box<dyn FnOnce(Vec<u8>)>>>>, bytes: Vec<u8>) {
            let callback = pending.borrow_mut().take();
            if let Some(callback) = callback {
                callback(bytes);
            }
        }
    }

    impl MediaEncoder for DeferredEncoder {
        type Track = &'static str;
        type Artifact = Vec<u8>;

        fn is_available(&self) -> bool {
            self.available
        }

        fn begin(&mut self, _options: &CaptureOptions, audio_tracks: Vec<&'static str>) -> Result<(), RecordingError> {
            if self.fail_begin {
                return Err(RecordingError::Encoder("codec unsupported".into()));
            }
            self.begins += 1;
            self.tracks_seen.extend(audio_tracks);
            Ok(())
        }

        fn finish(&mut self, on_finished: Box<dyn FnOnce(Vec<u8>)>) -> Result<(), RecordingError> {
            if self.fail_finish {
                return Err(RecordingError::Encoder("recorder already inactive".into()));
            }
            if !self.drop_on_finish {
                *self.pending.borrow_mut() = Some(on_finished);
            }
            Ok(())
        }
    }

    #[test]
    fn test_full_lifecycle() {
        let encoder = DeferredEncoder::new();
        let pending = Rc::clone(&encoder.pending);
        let mut rec = RecordingController::new(encoder);
        let delivered = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&delivered);
        rec.start_capture(move |bytes| sink.borrow_mut().push(bytes), vec!["mix", "mic"]);
        assert_eq!(rec.state(), RecordingState::Capturing);
        assert_eq!(rec.encoder().tracks_seen, vec!["mix", "mic"]);

        rec.stop_capture();
        assert_eq!(rec.state(), RecordingState::Finalizing);
        assert!(delivered.borrow().is_empty());

        DeferredEncoder::flush(&pending, vec![1, 2, 3]);
        assert_eq!(rec.state(), RecordingState::Inactive);
        assert_eq!(*delivered.borrow(), vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_double_start_is_ignored() {
        let encoder = DeferredEncoder::new();
        let pending = Rc::clone(&encoder.pending);
        let mut rec = RecordingController::new(encoder);
        let calls = Rc::new(Cell::new(0));

        let first = Rc::clone(&calls);
        rec.start_capture(move |_| first.set(first.get() + 1), vec![]);
        let second = Rc::clone(&calls);
        rec.start_capture(move |_| second.set(second.get() + 100), vec![]);
        assert_eq!(rec.encoder().begins, 1);

        rec.stop_capture();
        DeferredEncoder::flush(&pending, vec![]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_stop_without_start_is_ignored() {
        let mut rec = RecordingController::new(DeferredEncoder::new());
        rec.stop_capture();
        assert_eq!(rec.state(), RecordingState::Inactive);
    }

    #[test]
    fn test_stop_while_finalizing_is_ignored() {
        let encoder = DeferredEncoder::new();
        let pending = Rc::clone(&encoder.pending);
        let mut rec = RecordingController::new(encoder);
        let calls = Rc::new(Cell::new(0));

        let counter = Rc::clone(&calls);
        rec.start_capture(move |_| counter.set(counter.get() + 1), vec![]);
        rec.stop_capture();
        rec.stop_capture();
        // Cannot start a new capture until the old one is flushed
        rec.start_capture(|_| {}, vec![]);
        assert_eq!(rec.state(), RecordingState::Finalizing);

        DeferredEncoder::flush(&pending, vec![]);
        assert_eq!(calls.get(), 1);
        assert_eq!(rec.state(), RecordingState::Inactive);
    }

    #[test]
    fn test_unavailable_encoder_is_silent() {
        let encoder = DeferredEncoder {
            available: false,
            ..Default::default()
        };
        let mut rec = RecordingController::new(encoder);
        rec.start_capture(|_| panic!("must not complete"), vec![]);
        assert_eq!(rec.state(), RecordingState::Inactive);
        rec.stop_capture();
        assert_eq!(rec.encoder().begins, 0);
    }

    #[test]
    fn test_failed_begin_stays_inactive() {
        let encoder = DeferredEncoder {
            available: true,
            fail_begin: true,
            ..Default::default()
        };
        let mut rec = RecordingController::new(encoder);
        rec.start_capture(|_| {}, vec![]);
        assert_eq!(rec.state(), RecordingState::Inactive);
    }

    #[test]
    fn test_restart_after_completion() {
        let encoder = DeferredEncoder::new();
        let pending = Rc::clone(&encoder.pending);
        let mut rec = RecordingController::new(encoder);

        for round in 0..2u8 {
            let got = Rc::new(Cell::new(None));
            let sink = Rc::clone(&got);
            rec.start_capture(move |bytes: Vec<u8>| sink.set(bytes.first().copied()), vec![]);
            rec.stop_capture();
            DeferredEncoder::flush(&pending, vec![round]);
            assert_eq!(got.get(), Some(round));
        }
        assert_eq!(rec.encoder().begins, 2);
    }

    #[test]
    fn test_dropped_completion_ends_session() {
        let encoder = DeferredEncoder {
            available: true,
            drop_on_finish: true,
            ..Default::default()
        };
        let mut rec = RecordingController::new(encoder);

        rec.start_capture(|_| panic!("no artifact was produced"), vec![]);
        rec.stop_capture();
        assert_eq!(rec.state(), RecordingState::Inactive);

        // Recording still works afterwards
        rec.start_capture(|_| {}, vec![]);
        assert_eq!(rec.state(), RecordingState::Capturing);
        assert_eq!(rec.encoder().begins, 2);
    }

    #[test]
    fn test_failed_finish_ends_session() {
        let encoder = DeferredEncoder {
            available: true,
            fail_finish: true,
            ..Default::default()
        };
        let mut rec = RecordingController::new(encoder);

        rec.start_capture(|_| panic!("no artifact was produced"), vec![]);
        rec.stop_capture();
        assert_eq!(rec.state(), RecordingState::Inactive);

        rec.start_capture(|_| {}, vec![]);
        assert!(rec.is_capturing());
    }
}
