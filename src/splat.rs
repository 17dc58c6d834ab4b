//! Splat injection.
//!
//! A splat adds a gaussian bump around a point to both fields: the impulse
//! goes into velocity, the color into dye. Each field is rendered into its
//! write surface and swapped, so one splat costs two passes and two swaps.

use glam::{Vec2, Vec3, Vec4};

use crate::aspect::correct_radius;
use crate::backend::{ProgramKind, RenderBackend, Uniform};
use crate::color::Rgb;
use crate::error::FluidError;
use crate::field::DoubleField;

/// Radius and force of a splat.
///
/// Radius is a field-space length in hundredths (0.25 means 0.0025 before
/// aspect correction); force scales the injected velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplatParams {
    radius: f32,
    force: f32,
}

impl SplatParams {
    /// Both values must be finite and non-negative.
    pub fn new(radius: f32, force: f32) -> Result<Self, FluidError> {
        let valid = |v: f32| v.is_finite() && v >= 0.0;
        if !valid(radius) || !valid(force) {
            return Err(FluidError::InvalidSplatParams { radius, force });
        }
        Ok(Self { radius, force })
    }

    // Values derived from already-valid params by non-negative scaling.
    pub(crate) fn derived(radius: f32, force: f32) -> Self {
        Self { radius, force }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn force(&self) -> f32 {
        self.force
    }
}

/// One point impulse, ready to inject.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Splat {
    /// Center in texcoords.
    pub point: Vec2,
    /// Velocity added at the center.
    pub impulse: Vec2,
    /// Dye added at the center.
    pub color: Rgb,
    pub params: SplatParams,
}

/// Inject `splat` into `velocity` and `dye`.
///
/// `aspect_ratio` is the canvas width over height. Both fields end up
/// swapped once.
pub fn splat<B: RenderBackend>(
    backend: &mut B,
    velocity: &mut DoubleField<B::Surface>,
    dye: &mut DoubleField<B::Surface>,
    aspect_ratio: f32,
    splat: &Splat,
) {
    backend.bind_program(ProgramKind::Splat);

    backend.bind_texture(Uniform::Target, velocity.read(), 0);
    backend.set_uniform(Uniform::AspectRatio, aspect_ratio.into());
    backend.set_uniform(Uniform::Point, splat.point.into());
    backend.set_uniform(
        Uniform::Color,
        Vec3::new(splat.impulse.x, splat.impulse.y, 0.0).into(),
    );
    backend.set_uniform(
        Uniform::Radius,
        correct_radius(splat.params.radius / 100.0, aspect_ratio).into(),
    );
    backend.blit(Some(velocity.write()));
    velocity.swap();

    backend.bind_texture(Uniform::Target, dye.read(), 0);
    backend.set_uniform(Uniform::Color, Vec3::from(splat.color).into());
    backend.blit(Some(dye.write()));
    dye.swap();
}

/// Fill `target` (or the screen) with an opaque color.
pub fn draw_color<B: RenderBackend>(backend: &mut B, target: Option<&B::Surface>, color: Rgb) {
    backend.bind_program(ProgramKind::Color);
    backend.set_uniform(
        Uniform::Color,
        Vec4::new(color.r, color.g, color.b, 1.0).into(),
    );
    backend.blit(target);
}
