//! Turning pointer motion and idle time into splats.
//!
//! A drag is reported as discrete move events. Slow moves become a single
//! splat; fast moves are filled in with extra splats along the path so the
//! trail has no gaps. Faster motion also makes splats smaller and stronger.
//!
//! | speed | radius | force | extra splats |
//! |-------|--------|-------|--------------|
//! | 0.0 | base | base | 0 |
//! | 0.05 | base / 1.5 | base * 1.1 | 1 |
//! | 0.1 | base / 2 | base * 1.2 | 2 |

use glam::Vec2;
use rand::Rng;

use crate::backend::RenderBackend;
use crate::color_cycle::ColorCycle;
use crate::field::DoubleField;
use crate::pointer::Pointer;
use crate::splat::{splat, Splat, SplatParams};

/// Radius shrink per unit of speed.
const RADIUS_FALLOFF: f32 = 10.0;
/// Force gain per unit of speed.
const FORCE_GAIN: f32 = 2.0;
/// Intermediate splats per unit of speed.
const SPLATS_PER_SPEED: f32 = 20.0;
/// Intermediate splats are weaker...
const INTERMEDIATE_FORCE: f32 = 0.5;
/// ...and wider, so neighbours overlap.
const INTERMEDIATE_RADIUS: f32 = 1.2;

/// Ambient splat colors are boosted this much.
const AMBIENT_COLOR_GAIN: f32 = 10.0;
/// Ambient impulses are drawn from `[-AMBIENT_IMPULSE / 2, AMBIENT_IMPULSE / 2]`.
const AMBIENT_IMPULSE: f32 = 1000.0;

/// Splats for one pointer move, primary splat first.
pub fn plan_pointer_trail(pointer: &Pointer, base: SplatParams) -> Vec<Splat> {
    let speed = pointer.speed();

    let radius = base.radius() / (1.0 + speed * RADIUS_FALLOFF);
    let force = base.force() * (1.0 + speed * FORCE_GAIN);
    let extra = (speed * SPLATS_PER_SPEED).floor() as usize;

    let mut splats = Vec::with_capacity(extra + 1);
    splats.push(Splat {
        point: pointer.texcoord,
        impulse: pointer.delta * force,
        color: pointer.color,
        params: SplatParams::derived(radius, force),
    });

    let params = SplatParams::derived(radius * INTERMEDIATE_RADIUS, force * INTERMEDIATE_FORCE);
    let impulse = pointer.delta * force * INTERMEDIATE_FORCE;
    for i in 1..=extra {
        let t = i as f32 / (extra + 1) as f32;
        splats.push(Splat {
            point: pointer.prev_texcoord.lerp(pointer.texcoord, t),
            impulse,
            color: pointer.color,
            params,
        });
    }

    log::trace!(
        "Pointer {:?} at speed {:.4} -> {} splats",
        pointer.id,
        speed,
        splats.len()
    );
    splats
}

/// Inject the trail for one pointer move. Returns the number of splats.
pub fn apply_pointer_trail<B: RenderBackend>(
    backend: &mut B,
    velocity: &mut DoubleField<B::Surface>,
    dye: &mut DoubleField<B::Surface>,
    aspect_ratio: f32,
    pointer: &Pointer,
    base: SplatParams,
) -> usize {
    let splats = plan_pointer_trail(pointer, base);
    for s in &splats {
        splat(backend, velocity, dye, aspect_ratio, s);
    }
    splats.len()
}

/// `amount` splats at random places with random impulses, colored from
/// `colors` and amplified.
pub fn plan_random_splats<R: Rng + ?Sized>(
    rng: &mut R,
    amount: usize,
    colors: &mut ColorCycle,
    params: SplatParams,
) -> Vec<Splat> {
    (0..amount)
        .map(|_| {
            let color = colors.next_color().scaled(AMBIENT_COLOR_GAIN);
            let point = Vec2::new(rng.gen::<f32>(), rng.gen::<f32>());
            let impulse = Vec2::new(
                AMBIENT_IMPULSE * (rng.gen::<f32>() - 0.5),
                AMBIENT_IMPULSE * (rng.gen::<f32>() - 0.5),
            );
            Splat {
                point,
                impulse,
                color,
                params,
            }
        })
        .collect()
}

/// Inject `amount` ambient splats. Independent of any pointer state.
#[allow(clippy::too_many_arguments)]
pub fn multiple_splats<B: RenderBackend, R: Rng + ?Sized>(
    backend: &mut B,
    velocity: &mut DoubleField<B::Surface>,
    dye: &mut DoubleField<B::Surface>,
    aspect_ratio: f32,
    rng: &mut R,
    amount: usize,
    colors: &mut ColorCycle,
    params: SplatParams,
) {
    log::debug!("Injecting {} ambient splats", amount);
    for s in plan_random_splats(rng, amount, colors, params) {
        splat(backend, velocity, dye, aspect_ratio, &s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspect::Canvas;
    use crate::backend::RecordingBackend;
    use crate::color::Rgb;
    use crate::pointer::PointerId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn base() -> SplatParams {
        SplatParams::new(0.25, 6000.0).unwrap()
    }

    fn pointer_with_delta(delta: Vec2) -> Pointer {
        Pointer {
            id: PointerId::Mouse,
            down: true,
            moved: true,
            texcoord: Vec2::new(0.6, 0.4),
            prev_texcoord: Vec2::new(0.6, 0.4) - delta,
            delta,
            color: Rgb::new(1.0, 0.5, 0.0),
        }
    }

    // ========== Trail Planning Tests ==========

    #[test]
    fn test_stationary_pointer_single_splat() {
        let splats = plan_pointer_trail(&pointer_with_delta(Vec2::ZERO), base());
        assert_eq!(splats.len(), 1);
        assert_eq!(splats[0].params, base());
        assert_eq!(splats[0].impulse, Vec2::ZERO);
        assert_eq!(splats[0].point, Vec2::new(0.6, 0.4));
    }

    #[test]
    fn test_splat_count_grows_with_speed() {
        for speed in [0.01f32, 0.049, 0.05, 0.12, 0.3, 0.77] {
            let pointer = pointer_with_delta(Vec2::new(speed, 0.0));
            let expected = 1 + (speed * 20.0).floor() as usize;
            assert_eq!(plan_pointer_trail(&pointer, base()).len(), expected, "speed {}", speed);
        }
    }

    #[test]
    fn test_dynamic_radius_and_force() {
        let pointer = pointer_with_delta(Vec2::new(0.03, 0.04));
        let splats = plan_pointer_trail(&pointer, base());
        let primary = splats[0];

        // speed = 0.05
        assert!((primary.params.radius() - 0.25 / 1.5).abs() < 1e-6);
        assert!((primary.params.force() - 6000.0 * 1.1).abs() < 1e-2);
        assert!((primary.impulse - pointer.delta * primary.params.force()).length() < 1e-3);
    }

    #[test]
    fn test_intermediate_splats_interpolate_path() {
        let pointer = pointer_with_delta(Vec2::new(0.16, 0.0));
        let splats = plan_pointer_trail(&pointer, base());
        assert_eq!(splats.len(), 4);

        let primary = splats[0];
        for (i, s) in splats.iter().enumerate().skip(1) {
            let t = i as f32 / 4.0;
            let expected = pointer.prev_texcoord.lerp(pointer.texcoord, t);
            assert!((s.point - expected).length() < 1e-6);
            assert!((s.params.force() - primary.params.force() * 0.5).abs() < 1e-3);
            assert!((s.params.radius() - primary.params.radius() * 1.2).abs() < 1e-6);
            assert!((s.impulse - primary.impulse * 0.5).length() < 1e-3);
            assert_eq!(s.color, pointer.color);
        }
    }

    #[test]
    fn test_trail_from_drag_on_wide_canvas() {
        let canvas = Canvas::new(800, 600).unwrap();
        let mut colors = ColorCycle::new();
        let mut pointer = Pointer::on_down(PointerId::Mouse, 400.0, 300.0, &canvas, &mut colors);
        pointer.on_move(420.0, 300.0, &canvas);

        assert!((pointer.delta.x - 0.025).abs() < 1e-6);
        assert_eq!(pointer.delta.y, 0.0);

        let splats = plan_pointer_trail(&pointer, base());
        assert_eq!(splats.len(), 1);
        assert!((splats[0].params.radius() - 0.25 / 1.25).abs() < 1e-5);
        assert!((splats[0].params.force() - 6000.0 * 1.05).abs() < 1e-2);
    }

    #[test]
    fn test_apply_pointer_trail_injects_every_splat() {
        let mut backend = RecordingBackend::new();
        let mut velocity = DoubleField::allocate(&mut backend, 16, 16);
        let mut dye = DoubleField::allocate(&mut backend, 16, 16);

        let pointer = pointer_with_delta(Vec2::new(0.11, 0.0));
        let n = apply_pointer_trail(&mut backend, &mut velocity, &mut dye, 1.0, &pointer, base());
        assert_eq!(n, 3);
        assert_eq!(backend.blits().len(), 2 * n);
    }

    // ========== Ambient Splat Tests ==========

    #[test]
    fn test_random_splats_use_amplified_cycle_colors() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut colors = ColorCycle::new();
        let palette = ColorCycle::new().set_scheme("default").to_vec();

        let splats = plan_random_splats(&mut rng, palette.len() + 1, &mut colors, base());
        for (i, s) in splats.iter().enumerate() {
            assert_eq!(s.color, palette[i % palette.len()].scaled(10.0));
        }
        // Palette entries are not modified by the amplification
        assert_eq!(colors.colors(), palette.as_slice());
    }

    #[test]
    fn test_random_splats_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut colors = ColorCycle::new();
        for s in plan_random_splats(&mut rng, 200, &mut colors, base()) {
            assert!((0.0..1.0).contains(&s.point.x));
            assert!((0.0..1.0).contains(&s.point.y));
            assert!(s.impulse.x.abs() <= 500.0);
            assert!(s.impulse.y.abs() <= 500.0);
            assert_eq!(s.params, base());
        }
    }

    #[test]
    fn test_random_splats_deterministic_with_seed() {
        let a = plan_random_splats(&mut StdRng::seed_from_u64(1), 5, &mut ColorCycle::new(), base());
        let b = plan_random_splats(&mut StdRng::seed_from_u64(1), 5, &mut ColorCycle::new(), base());
        assert_eq!(a, b);
    }
}
