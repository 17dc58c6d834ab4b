//! Record one simulated drag without a GPU and print the pass sequence.
//!
//! Run with: `cargo run --example dry_run [-- config.json]`

use std::collections::HashMap;

use splatflow::backend::Command;
use splatflow::prelude::*;

fn main() {
    use env_logger::Env;
    env_logger::Builder::from_env(Env::default().default_filter_or("debug")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| SimulationConfig::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {}: {}", path, e);
                return;
            }
        },
        None => SimulationConfig::default(),
    };

    let canvas = match Canvas::new(800, 600) {
        Ok(canvas) => canvas,
        Err(e) => {
            log::error!("{}", e);
            return;
        }
    };
    let mut sim = match FluidSimulation::new(RecordingBackend::new(), canvas, config) {
        Ok(sim) => sim.with_seed(42),
        Err(e) => {
            log::error!("{}", e);
            return;
        }
    };

    println!(
        "velocity {}x{}, dye {}x{}, scheme '{}'",
        sim.velocity().width(),
        sim.velocity().height(),
        sim.dye().width(),
        sim.dye().height(),
        sim.colors().current_scheme()
    );
    sim.backend_mut().clear();

    sim.queue_random_splats(3);
    sim.pointer_down(PointerId::Mouse, 400.0, 300.0);
    for (i, x) in [420.0, 480.0, 640.0].into_iter().enumerate() {
        sim.pointer_move(PointerId::Mouse, x, 300.0);
        let injected = sim.update(1.0 / 60.0);
        println!("frame {}: {} splats", i, injected);
    }

    let mut counts: HashMap<&'static str, usize> = HashMap::new();
    for command in sim.backend().commands() {
        let name = match command {
            Command::CreateSurface { .. } => "create_surface",
            Command::BindProgram(_) => "bind_program",
            Command::SetUniform(..) => "set_uniform",
            Command::BindTexture { .. } => "bind_texture",
            Command::SetBlending(_) => "set_blending",
            Command::Blit(_) => "blit",
        };
        *counts.entry(name).or_default() += 1;
    }
    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort();
    for (name, count) in counts {
        println!("{:>16}: {}", name, count);
    }
}
