//! Run the simulation on a real GPU without a window.
//!
//! Drags a pointer in a circle and fires an ambient burst every second.
//!
//! Run with: `cargo run --example headless [-- --precise]`
//!
//! `--precise` allocates 32-bit float fields, which usually forces the
//! manual bilinear filtering path.

use splatflow::gpu::{FILTERABLE_FORMAT, PRECISE_FORMAT};
use splatflow::prelude::*;

const FRAMES: u32 = 240;

fn main() {
    use env_logger::Env;
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let precise = std::env::args().any(|a| a == "--precise");
    let format = if precise { PRECISE_FORMAT } else { FILTERABLE_FORMAT };

    let backend = match WgpuBackend::headless(format) {
        Ok(backend) => backend,
        Err(e) => {
            log::error!("Could not start the GPU backend: {}", e);
            return;
        }
    };
    log::info!(
        "Field format {:?}, hardware filtering {}",
        backend.field_format(),
        backend.supports_linear_filtering()
    );

    let canvas = match Canvas::new(1280, 720) {
        Ok(canvas) => canvas,
        Err(e) => {
            log::error!("{}", e);
            return;
        }
    };
    let config = SimulationConfig::default()
        .with_dye_resolution(512)
        .with_color_scheme("neon");
    let mut sim = match FluidSimulation::new(backend, canvas, config) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Could not build the simulation: {}", e);
            return;
        }
    };

    let dt = 1.0 / 60.0;
    let (cx, cy) = (640.0, 360.0);
    sim.pointer_down(PointerId::Mouse, cx + 200.0, cy);

    let mut total = 0;
    for frame in 0..FRAMES {
        if frame % 60 == 0 {
            sim.queue_random_splats(5);
        }
        let angle = frame as f32 * 0.1;
        sim.pointer_move(PointerId::Mouse, cx + 200.0 * angle.cos(), cy + 200.0 * angle.sin());

        total += sim.update(dt);
        sim.backend_mut().flush();
    }
    sim.pointer_up(PointerId::Mouse);

    let status = sim.backend().device().poll(wgpu::Maintain::Wait);
    if !status.is_queue_empty() {
        log::warn!("GPU queue still busy after final wait");
    }
    log::info!("{} frames, {} splats injected", FRAMES, total);
}
