//! Simulation orchestrator.
//!
//! [`FluidSimulation`] owns the two fields and everything that feeds them:
//! pointer state, the color cycle, the random source for ambient splats and
//! the backend that runs the passes. A frame loop forwards window events to
//! [`handle_event`](FluidSimulation::handle_event) and calls
//! [`update`](FluidSimulation::update) once per frame.
//!
//! ```
//! use splatflow::{Canvas, FluidSimulation, RecordingBackend, SimulationConfig};
//!
//! let canvas = Canvas::new(800, 600).unwrap();
//! let mut sim = FluidSimulation::new(RecordingBackend::new(), canvas, SimulationConfig::default())
//!     .unwrap()
//!     .with_seed(7);
//!
//! sim.queue_random_splats(5);
//! assert_eq!(sim.update(1.0 / 60.0), 5);
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::event::WindowEvent;

use crate::advection::{advect, AdvectionSource};
use crate::aspect::Canvas;
use crate::backend::RenderBackend;
use crate::color::Rgb;
use crate::color_cycle::ColorCycle;
use crate::config::SimulationConfig;
use crate::error::FluidError;
use crate::field::DoubleField;
use crate::pointer::{Pointer, PointerId, PointerTracker};
use crate::splat::{draw_color, SplatParams};
use crate::trail::{apply_pointer_trail, multiple_splats};

/// Velocity and dye fields driven by pointer input and ambient bursts.
pub struct FluidSimulation<B: RenderBackend> {
    backend: B,
    config: SimulationConfig,
    splat_params: SplatParams,
    linear_filtering: bool,
    velocity: DoubleField<B::Surface>,
    dye: DoubleField<B::Surface>,
    colors: ColorCycle,
    pointers: PointerTracker,
    rng: StdRng,
    /// Ambient bursts waiting for the next update, most recent last.
    pending_bursts: Vec<usize>,
}

impl<B: RenderBackend> FluidSimulation<B> {
    /// Build a simulation for `canvas`, allocating both fields on `backend`.
    ///
    /// Fails if the configured splat parameters are invalid or one of the
    /// configured palettes does not parse.
    pub fn new(mut backend: B, canvas: Canvas, config: SimulationConfig) -> Result<Self, FluidError> {
        let splat_params = config.splat_params()?;

        let mut colors = ColorCycle::new();
        for spec in &config.palettes {
            colors.registry_mut().add_spec(spec)?;
        }
        colors.set_scheme(&config.color_scheme);

        let linear_filtering = backend.supports_linear_filtering();
        if !linear_filtering {
            log::debug!("Linear filtering unavailable, advection filters manually");
        }

        let (velocity, dye) = allocate_fields(&mut backend, canvas, &config);

        Ok(Self {
            backend,
            config,
            splat_params,
            linear_filtering,
            velocity,
            dye,
            colors,
            pointers: PointerTracker::new(canvas),
            rng: StdRng::from_entropy(),
            pending_bursts: Vec::new(),
        })
    }

    /// Make ambient splats reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ========== Input ==========

    /// Feed a winit window event. Returns true if it was used.
    ///
    /// A resize reallocates the fields when their dimensions change.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        let before = self.pointers.canvas();
        let used = self.pointers.handle_event(event, &mut self.colors);
        let after = self.pointers.canvas();
        if after != before {
            self.resize(after);
        }
        used
    }

    /// Start a contact at pixel `(x, y)`. It takes the next palette color.
    pub fn pointer_down(&mut self, id: PointerId, x: f32, y: f32) -> &Pointer {
        self.pointers.down(id, x, y, &mut self.colors)
    }

    pub fn pointer_move(&mut self, id: PointerId, x: f32, y: f32) -> Option<&Pointer> {
        self.pointers.move_to(id, x, y)
    }

    pub fn pointer_up(&mut self, id: PointerId) {
        self.pointers.up(id);
    }

    /// Switch palettes. Unknown names fall back to the default scheme.
    pub fn set_color_scheme(&mut self, name: &str) -> &[Rgb] {
        self.colors.set_scheme(name)
    }

    // ========== Splats ==========

    /// Schedule an ambient burst of `amount` splats for the next update.
    pub fn queue_random_splats(&mut self, amount: usize) {
        self.pending_bursts.push(amount);
    }

    /// Inject `amount` ambient splats now.
    pub fn random_splats(&mut self, amount: usize) {
        multiple_splats(
            &mut self.backend,
            &mut self.velocity,
            &mut self.dye,
            self.pointers.canvas().aspect_ratio(),
            &mut self.rng,
            amount,
            &mut self.colors,
            self.splat_params,
        );
    }

    /// Turn every pointer move since the last call into splats.
    ///
    /// Returns the number of splats injected.
    pub fn apply_inputs(&mut self) -> usize {
        let aspect_ratio = self.pointers.canvas().aspect_ratio();
        let mut injected = 0;
        for pointer in self.pointers.take_moved() {
            injected += apply_pointer_trail(
                &mut self.backend,
                &mut self.velocity,
                &mut self.dye,
                aspect_ratio,
                &pointer,
                self.splat_params,
            );
        }
        self.pointers.prune_released();
        injected
    }

    // ========== Stepping ==========

    /// Advect velocity through itself, then dye through velocity.
    pub fn step(&mut self, dt: f32) {
        advect(
            &mut self.backend,
            &mut self.velocity,
            AdvectionSource::Velocity,
            dt,
            self.config.velocity_dissipation,
            self.linear_filtering,
        );
        advect(
            &mut self.backend,
            &mut self.velocity,
            AdvectionSource::Field(&mut self.dye),
            dt,
            self.config.density_dissipation,
            self.linear_filtering,
        );
    }

    /// Run one frame: one queued burst, pending pointer input, then a step
    /// of at most `max_delta` seconds.
    ///
    /// Returns the number of splats injected.
    pub fn update(&mut self, dt: f32) -> usize {
        let dt = dt.min(self.config.max_delta);
        let mut injected = 0;
        if let Some(amount) = self.pending_bursts.pop() {
            self.random_splats(amount);
            injected += amount;
        }
        injected += self.apply_inputs();
        self.step(dt);
        injected
    }

    /// Adopt a new canvas size.
    ///
    /// Fields are reallocated, and their content dropped, only when the
    /// grid dimensions change.
    pub fn resize(&mut self, canvas: Canvas) {
        self.pointers.set_canvas(canvas);
        let sim = canvas.field_dimensions(self.config.sim_resolution);
        let dye = canvas.field_dimensions(self.config.dye_resolution);
        if sim == (self.velocity.width(), self.velocity.height())
            && dye == (self.dye.width(), self.dye.height())
        {
            return;
        }
        log::debug!(
            "Canvas now {}x{}, reallocating fields",
            canvas.width(),
            canvas.height()
        );
        let (velocity, dye) = allocate_fields(&mut self.backend, canvas, &self.config);
        self.velocity = velocity;
        self.dye = dye;
    }

    /// Fill the screen with an opaque color.
    pub fn draw_background(&mut self, color: Rgb) {
        draw_color(&mut self.backend, None, color);
    }

    // ========== Accessors ==========

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn velocity(&self) -> &DoubleField<B::Surface> {
        &self.velocity
    }

    pub fn dye(&self) -> &DoubleField<B::Surface> {
        &self.dye
    }

    pub fn pointers(&self) -> &PointerTracker {
        &self.pointers
    }

    pub fn colors(&self) -> &ColorCycle {
        &self.colors
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn canvas(&self) -> Canvas {
        self.pointers.canvas()
    }

    /// Ambient bursts not yet injected.
    pub fn pending_bursts(&self) -> &[usize] {
        &self.pending_bursts
    }
}

fn allocate_fields<B: RenderBackend>(
    backend: &mut B,
    canvas: Canvas,
    config: &SimulationConfig,
) -> (DoubleField<B::Surface>, DoubleField<B::Surface>) {
    let (sim_w, sim_h) = canvas.field_dimensions(config.sim_resolution);
    let (dye_w, dye_h) = canvas.field_dimensions(config.dye_resolution);
    (
        DoubleField::allocate(backend, sim_w, sim_h),
        DoubleField::allocate(backend, dye_w, dye_h),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Command, ProgramKind, RecordingBackend};
    use crate::error::PaletteError;

    fn sim(config: SimulationConfig) -> FluidSimulation<RecordingBackend> {
        let canvas = Canvas::new(800, 600).unwrap();
        FluidSimulation::new(RecordingBackend::new(), canvas, config)
            .unwrap()
            .with_seed(3)
    }

    // ========== Construction Tests ==========

    #[test]
    fn test_field_dimensions_follow_canvas() {
        let sim = sim(SimulationConfig::default());
        assert_eq!((sim.velocity().width(), sim.velocity().height()), (171, 128));
        assert_eq!((sim.dye().width(), sim.dye().height()), (1365, 1024));
    }

    #[test]
    fn test_invalid_palette_fails_construction() {
        let canvas = Canvas::new(10, 10).unwrap();
        let config = SimulationConfig::default().with_palette("broken", ["rgb(1, 2, 3)"]);
        let err = FluidSimulation::new(RecordingBackend::new(), canvas, config)
            .err()
            .unwrap();
        assert!(matches!(err, FluidError::Palette(PaletteError::Parse(_))));
    }

    #[test]
    fn test_configured_palette_is_selectable() {
        let config = SimulationConfig::default()
            .with_palette("duo", ["hsl(0, 100%, 50%)", "hsl(240, 100%, 50%)"])
            .with_color_scheme("duo");
        let sim = sim(config);
        assert_eq!(sim.colors().current_scheme(), "duo");
        assert_eq!(sim.colors().colors().len(), 2);
    }

    // ========== Update Tests ==========

    #[test]
    fn test_step_advects_velocity_then_dye() {
        let mut sim = sim(SimulationConfig::default());
        let v_write = *sim.velocity().write();
        sim.backend_mut().clear();

        sim.step(0.01);

        // Velocity swapped after the first pass, so dye is advected
        // through the freshly written velocity.
        let blits = sim.backend().blits();
        assert_eq!(blits.len(), 2);
        assert_eq!(blits[0], Some(v_write));
        assert_eq!(*sim.velocity().read(), v_write);
        assert_eq!(blits[1], Some(*sim.dye().read()));
    }

    #[test]
    fn test_update_caps_dt() {
        let mut sim = sim(SimulationConfig::default().with_max_delta(0.02));
        sim.update(5.0);
        assert_eq!(
            sim.backend().last_uniform(crate::backend::Uniform::Dt),
            Some(crate::backend::UniformValue::F32(0.02))
        );
    }

    #[test]
    fn test_update_pops_one_burst() {
        let mut sim = sim(SimulationConfig::default());
        sim.queue_random_splats(3);
        sim.queue_random_splats(2);

        assert_eq!(sim.update(0.01), 2);
        assert_eq!(sim.pending_bursts(), &[3]);
        assert_eq!(sim.update(0.01), 3);
        assert_eq!(sim.update(0.01), 0);
    }

    #[test]
    fn test_pointer_drag_injects_trail_once() {
        let mut sim = sim(SimulationConfig::default());
        sim.pointer_down(PointerId::Mouse, 400.0, 300.0);
        sim.pointer_move(PointerId::Mouse, 420.0, 300.0);

        assert_eq!(sim.update(0.01), 1);
        assert_eq!(sim.update(0.01), 0);
    }

    #[test]
    fn test_released_pointers_are_pruned() {
        let mut sim = sim(SimulationConfig::default());
        sim.pointer_down(PointerId::Touch(1), 10.0, 10.0);
        sim.pointer_up(PointerId::Touch(1));
        sim.update(0.01);
        assert!(sim.pointers().is_empty());
    }

    #[test]
    fn test_manual_filtering_from_backend() {
        let canvas = Canvas::new(64, 64).unwrap();
        let mut sim = FluidSimulation::new(
            RecordingBackend::new().without_linear_filtering(),
            canvas,
            SimulationConfig::default(),
        )
        .unwrap();
        sim.step(0.01);
        assert!(sim
            .backend()
            .last_uniform(crate::backend::Uniform::DyeTexelSize)
            .is_some());
    }

    // ========== Resize Tests ==========

    #[test]
    fn test_resize_reallocates_only_on_change() {
        let mut sim = sim(SimulationConfig::default());
        sim.backend_mut().clear();

        sim.resize(Canvas::new(800, 600).unwrap());
        assert!(sim.backend().commands().is_empty());

        sim.resize(Canvas::new(600, 600).unwrap());
        assert_eq!(sim.velocity().width(), 128);
        assert_eq!(sim.dye().height(), 1024);
        let created = sim
            .backend()
            .commands()
            .iter()
            .filter(|c| matches!(c, Command::CreateSurface { .. }))
            .count();
        assert_eq!(created, 4);
    }

    #[test]
    fn test_draw_background_targets_screen() {
        let mut sim = sim(SimulationConfig::default());
        sim.backend_mut().clear();
        sim.draw_background(Rgb::BLACK);
        assert_eq!(sim.backend().commands()[0], Command::BindProgram(ProgramKind::Color));
        assert_eq!(sim.backend().blits(), vec![None]);
    }
}
