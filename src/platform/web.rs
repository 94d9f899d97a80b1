//! Browser adapters: canvas 2D surface, requestAnimationFrame scheduling,
//! Web Audio mixing and MediaRecorder capture.

use std::cell::RefCell;
use std::rc::Rc;

use glam::DVec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AudioContext, Blob, BlobEvent, BlobPropertyBag, CanvasRenderingContext2d, GainNode, HtmlAnchorElement,
    HtmlCanvasElement, MediaRecorder, MediaRecorderOptions, MediaStreamAudioDestinationNode, MediaStreamTrack,
    OscillatorNode, OscillatorType, RecordingState, Url,
};

use crate::audio::{MixingGraph, Tone};
use crate::error::{InitError, RecordingError};
use crate::recording::{CaptureOptions, MediaEncoder};
use crate::renderer::{Color, StrokeStyle, Surface};
use crate::scheduler::{FrameHandle, FrameScheduler};

fn js_error(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

// === Drawing surface ===

/// Canvas 2D context as a drawing surface
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, InitError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| InitError::Platform(js_error(e)))?
            .ok_or(InitError::MissingSurface)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| InitError::MissingSurface)?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn clear(&mut self, color: Color) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w, h);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(0.0, 0.0, w, h);
    }

    fn stroke_arc(&mut self, center: DVec2, radius: f64, start: f64, end: f64, stroke: &StrokeStyle) {
        self.ctx.begin_path();
        self.ctx.set_stroke_style_str(&stroke.color.to_css());
        self.ctx.set_line_width(stroke.width);
        if self.ctx.arc(center.x, center.y, radius.max(0.0), start, end).is_ok() {
            self.ctx.stroke();
        }
    }

    fn fill_arc(&mut self, center: DVec2, radius: f64, start: f64, end: f64, color: Color) {
        self.ctx.begin_path();
        self.ctx.set_fill_style_str(&color.to_css());
        if self.ctx.arc(center.x, center.y, radius.max(0.0), start, end).is_ok() {
            self.ctx.fill();
        }
    }

    fn line(&mut self, from: DVec2, to: DVec2, stroke: &StrokeStyle) {
        self.ctx.begin_path();
        self.ctx.set_stroke_style_str(&stroke.color.to_css());
        self.ctx.set_line_width(stroke.width);
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }

    fn text(&mut self, text: &str, position: DVec2, font: &str, color: Color) {
        self.ctx.set_font(font);
        self.ctx.set_fill_style_str(&color.to_css());
        if let Err(e) = self.ctx.fill_text(text, position.x, position.y) {
            log::debug!("fill_text failed: {}", js_error(e));
        }
    }
}

// === Frame scheduling ===

type FrameTarget = Rc<RefCell<Option<Box<dyn FnMut()>>>>;

/// `requestAnimationFrame` scheduler.
///
/// The frame target is installed after the simulation exists (it usually
/// holds a weak handle to it); clones share the same target.
#[derive(Clone, Default)]
pub struct RafScheduler {
    target: FrameTarget,
}

impl RafScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set what runs on each requested frame
    pub fn set_target(&self, target: impl FnMut() + 'static) {
        *self.target.borrow_mut() = Some(Box::new(target));
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let window = web_sys::window()?;
        let target = Rc::clone(&self.target);
        let closure = Closure::once(move |_time: f64| {
            if let Some(run) = target.borrow_mut().as_mut() {
                run();
            }
        });
        let id = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok()?;
        closure.forget();
        Some(FrameHandle(id))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(handle.0);
        }
    }
}

// === Audio ===

/// Web Audio context with a stream destination that recordings can tap.
/// Clones share the same context.
#[derive(Clone)]
pub struct WebAudioMixer {
    ctx: AudioContext,
    destination: MediaStreamAudioDestinationNode,
}

impl WebAudioMixer {
    pub fn new() -> Result<Self, InitError> {
        let ctx = AudioContext::new().map_err(|e| InitError::Platform(js_error(e)))?;
        let destination = ctx
            .create_media_stream_destination()
            .map_err(|e| InitError::Platform(js_error(e)))?;
        Ok(Self { ctx, destination })
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if self.ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = self.ctx.resume();
        }
    }

    /// Audio tracks of the mix, for capture
    pub fn tracks(&self) -> Vec<MediaStreamTrack> {
        self.destination
            .stream()
            .get_audio_tracks()
            .iter()
            .filter_map(|t| t.dyn_into::<MediaStreamTrack>().ok())
            .collect()
    }

    /// Play a tone to the speakers and into the mix
    pub fn play_tone(&self, tone: &Tone, volume: f32) {
        let vol = tone.gain * volume;
        if vol <= 0.0 {
            return;
        }
        self.resume();

        let Some((osc, gain)) = self.create_osc(tone.frequency, OscillatorType::Sine) else {
            return;
        };
        let t = self.ctx.current_time();
        let end = t + tone.duration as f64;

        gain.gain().set_value_at_time(vol, t).ok();
        gain.gain().exponential_ramp_to_value_at_time(0.001, end).ok();

        osc.start().ok();
        osc.stop_with_when(end + 0.02).ok();
    }

    fn create_osc(&self, freq: f32, osc_type: OscillatorType) -> Option<(OscillatorNode, GainNode)> {
        let osc = self.ctx.create_oscillator().ok()?;
        let gain = self.ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&self.ctx.destination()).ok()?;
        gain.connect_with_audio_node(&self.destination).ok()?;

        Some((osc, gain))
    }
}

impl MixingGraph for WebAudioMixer {
    type Destination = MediaStreamAudioDestinationNode;

    fn destination(&self) -> &MediaStreamAudioDestinationNode {
        &self.destination
    }
}

// === Capture ===

type DataClosure = Closure<dyn FnMut(BlobEvent)>;
type StopClosure = Closure<dyn FnMut(web_sys::Event)>;

/// `MediaRecorder` fed by the canvas `captureStream` plus audio tracks
pub struct MediaRecorderEncoder {
    canvas: HtmlCanvasElement,
    recorder: Option<MediaRecorder>,
    mime_type: String,
    chunks: Rc<RefCell<Vec<Blob>>>,
    on_data: Option<DataClosure>,
    on_stop: Option<StopClosure>,
}

impl MediaRecorderEncoder {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self {
            canvas,
            recorder: None,
            mime_type: String::new(),
            chunks: Rc::new(RefCell::new(Vec::new())),
            on_data: None,
            on_stop: None,
        }
    }
}

impl MediaEncoder for MediaRecorderEncoder {
    type Track = MediaStreamTrack;
    type Artifact = Blob;

    fn is_available(&self) -> bool {
        web_sys::window()
            .map(|w| js_sys::Reflect::has(&w, &JsValue::from_str("MediaRecorder")).unwrap_or(false))
            .unwrap_or(false)
    }

    fn begin(&mut self, options: &CaptureOptions, audio_tracks: Vec<MediaStreamTrack>) -> Result<(), RecordingError> {
        if self.recorder.is_some() {
            return Ok(());
        }

        let stream = self
            .canvas
            .capture_stream_with_frame_request_rate(options.frame_rate)
            .map_err(|e| RecordingError::Encoder(js_error(e)))?;
        for track in &audio_tracks {
            stream.add_track(track);
        }

        let recorder_options = MediaRecorderOptions::new();
        if MediaRecorder::is_type_supported(&options.mime_type) {
            recorder_options.set_mime_type(&options.mime_type);
            self.mime_type = options.mime_type.clone();
        } else {
            log::warn!("{} not supported; using browser default", options.mime_type);
            self.mime_type = "video/webm".to_string();
        }
        if let Some(bps) = options.video_bits_per_second {
            recorder_options.set_video_bits_per_second(bps);
        }

        let recorder = MediaRecorder::new_with_media_stream_and_media_recorder_options(&stream, &recorder_options)
            .map_err(|e| RecordingError::Encoder(js_error(e)))?;

        self.chunks.borrow_mut().clear();
        let chunks = Rc::clone(&self.chunks);
        let on_data = Closure::<dyn FnMut(_)>::new(move |event: BlobEvent| {
            if let Some(blob) = event.data() {
                chunks.borrow_mut().push(blob);
            }
        });
        recorder.set_ondataavailable(Some(on_data.as_ref().unchecked_ref()));

        recorder.start().map_err(|e| RecordingError::Encoder(js_error(e)))?;

        self.on_data = Some(on_data);
        self.recorder = Some(recorder);
        Ok(())
    }

    fn finish(&mut self, on_finished: Box<dyn FnOnce(Blob)>) -> Result<(), RecordingError> {
        let recorder = self.recorder.take().ok_or(RecordingError::EncoderUnavailable)?;
        if recorder.state() == RecordingState::Inactive {
            return Err(RecordingError::Encoder("recorder already inactive".into()));
        }

        let chunks = Rc::clone(&self.chunks);
        let mime_type = self.mime_type.clone();
        let mut on_finished = Some(on_finished);
        let on_stop = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            // Taken either way: a dropped callback ends the session with no artifact
            let Some(callback) = on_finished.take() else {
                return;
            };
            let parts = js_sys::Array::new();
            for chunk in chunks.borrow_mut().drain(..) {
                parts.push(&chunk);
            }
            let bag = BlobPropertyBag::new();
            bag.set_type(&mime_type);
            match Blob::new_with_blob_sequence_and_options(&parts, &bag) {
                Ok(blob) => callback(blob),
                Err(e) => log::error!("Could not assemble recording: {}", js_error(e)),
            }
        });
        recorder.set_onstop(Some(on_stop.as_ref().unchecked_ref()));

        if let Err(e) = recorder.stop() {
            recorder.set_onstop(None);
            return Err(RecordingError::Encoder(js_error(e)));
        }
        self.on_stop = Some(on_stop);
        Ok(())
    }
}

/// Offer a blob to the user as a file download
pub fn download_blob(blob: &Blob, filename: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let url = Url::create_object_url_with_blob(blob)?;
    let anchor = document
        .create_element("a")?
        .dyn_into::<HtmlAnchorElement>()?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();
    Url::revoke_object_url(&url)?;
    Ok(())
}
