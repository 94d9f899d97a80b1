//! Grow Bounce entry point
//!
//! On the web this mounts the simulation on `<canvas id="canvas">` and wires
//! pointer input, controls, collision sounds and recording. Natively it runs a
//! headless session and logs what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::DVec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlInputElement, PointerEvent};

    use grow_bounce::Settings;
    use grow_bounce::audio::collision_tone;
    use grow_bounce::interaction::client_to_surface;
    use grow_bounce::platform::web::{CanvasSurface, MediaRecorderEncoder, RafScheduler, WebAudioMixer, download_blob};
    use grow_bounce::recording::RecordingController;
    use grow_bounce::simulation::Simulation;

    type SharedSim = Rc<RefCell<Simulation<WebAudioMixer>>>;
    type SharedRecorder = Rc<RefCell<RecordingController<MediaRecorderEncoder>>>;

    fn init_error(e: grow_bounce::InitError) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id("canvas")
            .ok_or("no #canvas element")?
            .dyn_into::<HtmlCanvasElement>()?;

        let settings = Rc::new(RefCell::new(Settings::load()));
        let mixer = WebAudioMixer::new().map_err(init_error)?;
        let scheduler = RafScheduler::new();

        let sim = Simulation::builder()
            .surface(CanvasSurface::new(canvas.clone()).map_err(init_error)?)
            .mixer(mixer.clone())
            .scheduler(scheduler.clone())
            .settings(&settings.borrow())
            .seed(js_sys::Date::now() as u64)
            .build()
            .map_err(init_error)?;
        let sim: SharedSim = Rc::new(RefCell::new(sim));

        {
            let weak = Rc::downgrade(&sim);
            scheduler.set_target(move || {
                if let Some(sim) = weak.upgrade() {
                    sim.borrow_mut().on_frame();
                }
            });
        }

        {
            let settings = Rc::clone(&settings);
            let mixer = mixer.clone();
            sim.borrow_mut().set_collision_listener(move |event| {
                let s = settings.borrow();
                if s.sound_enabled {
                    mixer.play_tone(&collision_tone(event.radius, event.speed), s.volume);
                }
            });
        }

        let recorder: SharedRecorder = Rc::new(RefCell::new(RecordingController::new(MediaRecorderEncoder::new(
            canvas.clone(),
        ))));

        wire_pointer(&canvas, &sim, &mixer)?;
        wire_buttons(&document, &sim, &recorder, &mixer)?;
        wire_sliders(&document, &sim, &settings)?;

        sim.borrow_mut().start();
        log::info!("Grow Bounce running");
        Ok(())
    }

    fn surface_point(canvas: &HtmlCanvasElement, event: &PointerEvent) -> DVec2 {
        let rect = canvas.get_bounding_client_rect();
        client_to_surface(
            DVec2::new(event.client_x() as f64, event.client_y() as f64),
            (rect.left(), rect.top(), rect.width(), rect.height()),
            (canvas.width() as f64, canvas.height() as f64),
        )
    }

    fn wire_pointer(canvas: &HtmlCanvasElement, sim: &SharedSim, mixer: &WebAudioMixer) -> Result<(), JsValue> {
        // Pointer down (grab ball, unlock audio)
        {
            let sim = Rc::clone(sim);
            let mixer = mixer.clone();
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                mixer.resume();
                let p = surface_point(&target, &event);
                let mut sim = sim.borrow_mut();
                sim.pointer_down(p.x, p.y);
                if sim.is_dragging() {
                    let _ = target.set_pointer_capture(event.pointer_id());
                }
            });
            canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Pointer move (drag)
        {
            let sim = Rc::clone(sim);
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let p = surface_point(&target, &event);
                sim.borrow_mut().pointer_move(p.x, p.y);
            });
            canvas.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Pointer up / cancel (release)
        for name in ["pointerup", "pointercancel"] {
            let sim = Rc::clone(sim);
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                sim.borrow_mut().pointer_up();
            });
            canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn on_click(document: &web_sys::Document, id: &str, mut handler: impl FnMut() + 'static) -> Result<(), JsValue> {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn wire_buttons(
        document: &web_sys::Document,
        sim: &SharedSim,
        recorder: &SharedRecorder,
        mixer: &WebAudioMixer,
    ) -> Result<(), JsValue> {
        let s = Rc::clone(sim);
        on_click(document, "start-btn", move || s.borrow_mut().start())?;
        let s = Rc::clone(sim);
        on_click(document, "stop-btn", move || s.borrow_mut().stop())?;
        let s = Rc::clone(sim);
        on_click(document, "reset-btn", move || s.borrow_mut().reset())?;

        // Record toggles between start and stop
        let recorder = Rc::clone(recorder);
        let mixer = mixer.clone();
        let label = document.get_element_by_id("record-btn");
        on_click(document, "record-btn", move || {
            let mut rec = recorder.borrow_mut();
            if rec.is_capturing() {
                rec.stop_capture();
                if let Some(el) = &label {
                    el.set_text_content(Some("Record"));
                }
                return;
            }

            mixer.resume();
            rec.start_capture(
                |blob| {
                    let name = format!("grow-bounce-{}.webm", js_sys::Date::now() as u64);
                    if let Err(e) = download_blob(&blob, &name) {
                        log::warn!("Download failed: {:?}", e);
                    }
                },
                mixer.tracks(),
            );
            if rec.is_capturing() {
                if let Some(el) = &label {
                    el.set_text_content(Some("Stop recording"));
                }
            }
        })?;

        Ok(())
    }

    fn wire_sliders(
        document: &web_sys::Document,
        sim: &SharedSim,
        settings: &Rc<RefCell<Settings>>,
    ) -> Result<(), JsValue> {
        type Apply = fn(&mut Settings, f64);
        let sliders: [(&str, Apply); 4] = [
            ("gravity", |s, v| s.physics.gravity = v),
            ("velocity-decay", |s, v| s.physics.velocity_decay = v),
            ("velocity-increase", |s, v| s.physics.velocity_increase_factor = v),
            ("growth-rate", |s, v| s.physics.ball_growth_rate = v),
        ];

        for (id, apply) in sliders {
            let Some(el) = document.get_element_by_id(id) else {
                continue;
            };
            let input = el.dyn_into::<HtmlInputElement>()?;
            let sim = Rc::clone(sim);
            let settings = Rc::clone(settings);
            let source = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Ok(value) = source.value().parse::<f64>() else {
                    return;
                };
                let mut s = settings.borrow_mut();
                apply(&mut *s, value);
                sim.borrow_mut().set_physics(s.physics);
                s.save();
            });
            input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let frames = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(600);

    log::info!("Grow Bounce (native) starting: {} headless frames", frames);
    log::info!("The interactive version runs in the browser - build with `trunk serve`");

    if let Err(e) = headless::run(frames) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use grow_bounce::audio::{SilentMixer, collision_tone};
    use grow_bounce::platform::ManualTime;
    use grow_bounce::renderer::CommandList;
    use grow_bounce::scheduler::ManualScheduler;
    use grow_bounce::{InitError, Settings, Simulation};

    const SURFACE_SIZE: f64 = 600.0;
    const FRAME_SECONDS: f64 = 1.0 / 60.0;

    /// Run a session at 60 frames per simulated second, dragging the ball
    /// to the center halfway through
    pub fn run(frames: u64) -> Result<(), InitError> {
        let surface = Rc::new(RefCell::new(CommandList::new(SURFACE_SIZE, SURFACE_SIZE)));
        let scheduler = ManualScheduler::new();
        let time = ManualTime::new(0.0);

        let mut sim = Simulation::builder()
            .surface(Rc::clone(&surface))
            .mixer(SilentMixer)
            .scheduler(scheduler.clone())
            .time_source(time.clone())
            .settings(&Settings::load())
            .seed(42)
            .build()?;

        let bounces = Rc::new(Cell::new(0u64));
        {
            let bounces = Rc::clone(&bounces);
            sim.set_collision_listener(move |event| {
                bounces.set(event.count);
                if event.count % 25 == 0 {
                    let tone = collision_tone(event.radius, event.speed);
                    log::info!(
                        "Bounce {}: radius {:.1}, speed {:.2}, tone {:.0} Hz",
                        event.count,
                        event.radius,
                        event.speed,
                        tone.frequency
                    );
                }
            });
        }

        sim.start();

        for frame in 0..frames {
            if frame == frames / 2 {
                let grab = sim.ball().center;
                let center = sim.boundary().center;
                sim.pointer_down(grab.x, grab.y);
                sim.pointer_move(center.x, center.y);
                time.advance(0.5);
                sim.pointer_up();
                log::info!("Dragged ball to the center at frame {}", frame);
            }

            time.advance(FRAME_SECONDS);
            if !scheduler.fire() {
                break;
            }
            sim.on_frame();
        }

        sim.stop();

        let ball = sim.ball();
        log::info!(
            "Done: {:.2}s elapsed, {} bounces, radius {:.2}, {} frames painted, {} draw calls in last frame",
            sim.elapsed(),
            bounces.get(),
            ball.radius,
            surface.borrow().frames(),
            surface.borrow().commands().len()
        );
        Ok(())
    }
}
