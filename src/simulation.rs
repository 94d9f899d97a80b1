//! Simulation lifecycle
//!
//! Ties the physics state to its collaborators: the drawing surface, the frame
//! scheduler, the time source and the audio mixing graph. Everything runs on
//! one thread; the tick loop and the drag handlers never write at the same
//! time because a drag cancels the pending frame and a release re-arms it.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::MixingGraph;
use crate::error::InitError;
use crate::interaction::{DragController, PointerEvent};
use crate::platform::{InstantTimeSource, TimeSource};
use crate::renderer::{Color, SceneOptions, SceneView, Surface, TextOverlay, paint_scene, random_display_color};
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::settings::{PhysicsConfig, Settings};
use crate::sim::{Ball, Boundary, CollisionEvent, SimState, SimulationClock, SimulationMode, step};

/// Collision observer
pub type CollisionListener = Box<dyn FnMut(&CollisionEvent)>;

/// A running (or idle) growing-ball simulation
pub struct Simulation<M: MixingGraph> {
    state: SimState,
    mode: SimulationMode,
    physics: PhysicsConfig,
    options: SceneOptions,
    clock: SimulationClock,
    drag: DragController,
    ball_color: Color,
    rng: Pcg32,
    overlays: Vec<TextOverlay>,
    surface: Box<dyn Surface>,
    scheduler: Box<dyn FrameScheduler>,
    time: Box<dyn TimeSource>,
    mixer: M,
    pending_frame: Option<FrameHandle>,
    on_collision: Option<CollisionListener>,
}

impl<M: MixingGraph> Simulation<M> {
    pub fn builder() -> SimulationBuilder<M> {
        SimulationBuilder::new()
    }

    // === Lifecycle ===

    /// Begin (or resume) ticking. Elapsed time continues from where it stopped.
    pub fn start(&mut self) {
        if self.mode == SimulationMode::Running {
            // Recover from a failed frame request
            self.arm_frame();
            return;
        }
        if self.mode != SimulationMode::Idle {
            return;
        }
        self.clock.start(self.time.now_seconds());
        self.mode = SimulationMode::Running;
        self.arm_frame();
        log::info!("Simulation started at {:.2}s", self.clock.elapsed());
    }

    /// Stop ticking. Nothing is reset; elapsed time is frozen.
    pub fn stop(&mut self) {
        if self.mode == SimulationMode::Idle {
            return;
        }
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.drag.pointer_up();
        self.clock.pause(self.time.now_seconds());
        self.mode = SimulationMode::Idle;
        log::info!("Simulation stopped at {:.2}s", self.clock.elapsed());
    }

    /// Return the ball, histories and clock to their initial values and pick a
    /// new ball color. Running stays running; idle stays idle.
    pub fn reset(&mut self) {
        self.state.reset();
        self.clock.reset();
        self.ball_color = random_display_color(&mut self.rng);

        if self.drag.pointer_up() {
            self.mode = SimulationMode::Running;
        }
        if self.mode == SimulationMode::Running {
            self.clock.start(self.time.now_seconds());
            self.arm_frame();
        }

        log::info!("Simulation reset");
        self.render();
    }

    /// Frame callback: one physics step, one render, then ask for the next
    /// frame. Does nothing (and asks for nothing) unless running.
    pub fn on_frame(&mut self) {
        self.pending_frame = None;
        if self.mode != SimulationMode::Running {
            return;
        }

        self.clock.update(self.time.now_seconds());

        if let Some(event) = step(&mut self.state, &self.physics) {
            if let Some(listener) = self.on_collision.as_mut() {
                listener(&event);
            }
        }

        self.render();
        self.arm_frame();
    }

    /// Paint the current state onto the surface
    pub fn render(&mut self) {
        let view = SceneView {
            state: &self.state,
            ball_color: self.ball_color,
            elapsed: self.clock.elapsed(),
            overlays: &self.overlays,
            options: self.options,
        };
        paint_scene(&view, self.surface.as_mut());
    }

    fn arm_frame(&mut self) {
        if self.pending_frame.is_some() {
            return;
        }
        self.pending_frame = self.scheduler.request_frame();
        if self.pending_frame.is_none() {
            log::error!("Frame request failed; animation halted");
        }
    }

    // === Pointer input ===

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { x, y } => self.pointer_down(x, y),
            PointerEvent::Move { x, y } => self.pointer_move(x, y),
            PointerEvent::Up => self.pointer_up(),
        }
    }

    /// Grab the ball if the pointer is on it. Only a running simulation can be grabbed.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if self.mode != SimulationMode::Running {
            return;
        }
        if !self.drag.pointer_down(&self.state.ball, DVec2::new(x, y)) {
            return;
        }
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.clock.pause(self.time.now_seconds());
        self.mode = SimulationMode::Dragging;
        log::debug!("Drag started at ({:.1}, {:.1})", x, y);
    }

    /// Move the held ball. The tick loop is paused, so this renders directly.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if self.drag.pointer_move(&mut self.state.ball, DVec2::new(x, y)) {
            self.render();
        }
    }

    /// Release the ball; physics resumes from here with zero velocity
    pub fn pointer_up(&mut self) {
        if !self.drag.pointer_up() {
            return;
        }
        self.mode = SimulationMode::Running;
        self.clock.start(self.time.now_seconds());
        self.arm_frame();
        log::debug!("Drag released");
    }

    // === Configuration ===

    pub fn set_gravity(&mut self, gravity: f64) {
        self.physics.gravity = gravity;
    }

    pub fn set_velocity_increase_factor(&mut self, factor: f64) {
        self.physics.velocity_increase_factor = factor;
    }

    pub fn set_velocity_decay(&mut self, decay: f64) {
        self.physics.velocity_decay = decay;
    }

    pub fn set_ball_growth_rate(&mut self, rate: f64) {
        self.physics.ball_growth_rate = rate;
    }

    pub fn set_physics(&mut self, physics: PhysicsConfig) {
        self.physics = physics;
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    pub fn set_scene_options(&mut self, options: SceneOptions) {
        self.options = options;
    }

    /// Replace the text drawn over the scene
    pub fn set_overlays(&mut self, overlays: Vec<TextOverlay>) {
        self.overlays = overlays;
    }

    /// Register the collision observer, replacing any previous one
    pub fn set_collision_listener(&mut self, listener: impl FnMut(&CollisionEvent) + 'static) {
        self.on_collision = Some(Box::new(listener));
    }

    pub fn clear_collision_listener(&mut self) {
        self.on_collision = None;
    }

    // === Accessors ===

    pub fn mode(&self) -> SimulationMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.mode == SimulationMode::Running
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn ball(&self) -> &Ball {
        &self.state.ball
    }

    pub fn boundary(&self) -> &Boundary {
        &self.state.boundary
    }

    /// Seconds on the simulation clock as of the last tick or transition
    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn ball_color(&self) -> Color {
        self.ball_color
    }

    /// The audio mixing graph, for the host to attach sources to
    pub fn mixer(&self) -> &M {
        &self.mixer
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }
}

/// Assembles a [`Simulation`] from its collaborators
pub struct SimulationBuilder<M: MixingGraph> {
    surface: Option<Box<dyn Surface>>,
    mixer: Option<M>,
    scheduler: Option<Box<dyn FrameScheduler>>,
    time: Option<Box<dyn TimeSource>>,
    physics: PhysicsConfig,
    options: SceneOptions,
    seed: Option<u64>,
}

impl<M: MixingGraph> Default for SimulationBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: MixingGraph> SimulationBuilder<M> {
    pub fn new() -> Self {
        Self {
            surface: None,
            mixer: None,
            scheduler: None,
            time: None,
            physics: PhysicsConfig::default(),
            options: SceneOptions::default(),
            seed: None,
        }
    }

    pub fn surface(mut self, surface: impl Surface + 'static) -> Self {
        self.surface = Some(Box::new(surface));
        self
    }

    pub fn mixer(mut self, mixer: M) -> Self {
        self.mixer = Some(mixer);
        self
    }

    pub fn scheduler(mut self, scheduler: impl FrameScheduler + 'static) -> Self {
        self.scheduler = Some(Box::new(scheduler));
        self
    }

    /// Defaults to [`InstantTimeSource`]
    pub fn time_source(mut self, time: impl TimeSource + 'static) -> Self {
        self.time = Some(Box::new(time));
        self
    }

    pub fn physics(mut self, physics: PhysicsConfig) -> Self {
        self.physics = physics;
        self
    }

    pub fn scene_options(mut self, options: SceneOptions) -> Self {
        self.options = options;
        self
    }

    /// Apply physics and visual preferences from saved settings
    pub fn settings(self, settings: &Settings) -> Self {
        self.physics(settings.physics).scene_options(SceneOptions {
            show_trails: settings.show_trails,
            show_collision_lines: settings.show_collision_lines,
            show_timer: settings.show_timer,
        })
    }

    /// Seed for ball colors. Defaults to a random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build an idle simulation and paint its first frame
    pub fn build(self) -> Result<Simulation<M>, InitError> {
        let surface = self.surface.ok_or(InitError::MissingSurface)?;
        let mixer = self.mixer.ok_or(InitError::MissingMixer)?;
        let scheduler = self.scheduler.ok_or(InitError::MissingScheduler)?;
        let time = self
            .time
            .unwrap_or_else(|| Box::new(InstantTimeSource::new()));

        let (width, height) = surface.size();
        let boundary =
            Boundary::from_surface(width, height).ok_or(InitError::DegenerateSurface { width, height })?;

        let seed = self.seed.unwrap_or_else(rand::random);
        let mut rng = Pcg32::seed_from_u64(seed);
        let ball_color = random_display_color(&mut rng);

        log::info!(
            "Simulation ready: boundary r={:.1} at ({:.1}, {:.1}), seed {}",
            boundary.radius,
            boundary.center.x,
            boundary.center.y,
            seed
        );

        let mut sim = Simulation {
            state: SimState::new(boundary),
            mode: SimulationMode::Idle,
            physics: self.physics,
            options: self.options,
            clock: SimulationClock::new(),
            drag: DragController::new(),
            ball_color,
            rng,
            overlays: Vec::new(),
            surface,
            scheduler,
            time,
            mixer,
            pending_frame: None,
            on_collision: None,
        };
        sim.render();
        Ok(sim)
    }
}
