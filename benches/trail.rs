//! Benchmarks for CPU-side splat planning and pass recording.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use splatflow::{
    hsla_to_rgb, plan_pointer_trail, plan_random_splats, Canvas, ColorCycle, FluidSimulation,
    PointerId, PointerTracker, RecordingBackend, SimulationConfig, SplatParams,
};

fn bench_pointer_trail(c: &mut Criterion) {
    let mut group = c.benchmark_group("pointer_trail");
    let canvas = Canvas::new(1920, 1080).unwrap();
    let base = SplatParams::new(0.25, 6000.0).unwrap();

    // Pixel distance moved in one event; faster moves emit more splats.
    for dx in [0.0f32, 20.0, 200.0, 1200.0] {
        group.bench_with_input(BenchmarkId::from_parameter(dx), &dx, |b, &dx| {
            let mut colors = ColorCycle::new();
            let mut tracker = PointerTracker::new(canvas);
            tracker.down(PointerId::Mouse, 100.0, 540.0, &mut colors);
            tracker.move_to(PointerId::Mouse, 100.0 + dx, 540.0);
            let pointer = tracker.get(PointerId::Mouse).unwrap().clone();
            b.iter(|| black_box(plan_pointer_trail(black_box(&pointer), base)))
        });
    }

    group.finish();
}

fn bench_random_splats(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_splats");
    let base = SplatParams::new(0.25, 6000.0).unwrap();

    for amount in [1usize, 10, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(amount), &amount, |b, &amount| {
            let mut rng = StdRng::seed_from_u64(0);
            let mut colors = ColorCycle::new();
            b.iter(|| black_box(plan_random_splats(&mut rng, amount, &mut colors, base)))
        });
    }

    group.finish();
}

fn bench_color(c: &mut Criterion) {
    c.bench_function("hsla_to_rgb", |b| {
        b.iter(|| black_box(hsla_to_rgb(black_box("hsla(210deg, 80%, 55%, 0.9)"))))
    });

    c.bench_function("set_scheme", |b| {
        let mut colors = ColorCycle::new();
        b.iter(|| black_box(colors.set_scheme("sunset").len()))
    });
}

fn bench_frame_recording(c: &mut Criterion) {
    c.bench_function("update_with_drag", |b| {
        let canvas = Canvas::new(800, 600).unwrap();
        let mut sim =
            FluidSimulation::new(RecordingBackend::new(), canvas, SimulationConfig::default())
                .unwrap()
                .with_seed(0);
        sim.pointer_down(PointerId::Mouse, 400.0, 300.0);
        let mut x = 400.0;
        b.iter(|| {
            x = if x > 700.0 { 100.0 } else { x + 40.0 };
            sim.pointer_move(PointerId::Mouse, x, 300.0);
            let n = sim.update(1.0 / 60.0);
            sim.backend_mut().clear();
            black_box(n)
        })
    });
}

criterion_group!(
    benches,
    bench_pointer_trail,
    bench_random_splats,
    bench_color,
    bench_frame_recording,
);
criterion_main!(benches);
