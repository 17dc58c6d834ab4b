//! Advection: carrying a field along the velocity field.
//!
//! Each texel looks back along the velocity at its position, samples the
//! source field there, and divides by `1 + dissipation * dt` so content
//! fades over time. A simulation tick advects twice: velocity against
//! itself, then dye against velocity.

use crate::backend::{ProgramKind, RenderBackend, Uniform};
use crate::field::DoubleField;

/// Which field an advection pass carries.
pub enum AdvectionSource<'a, S> {
    /// The velocity field itself (self-advection).
    Velocity,
    /// Some other field, carried along velocity.
    Field(&'a mut DoubleField<S>),
}

/// Run one advection pass.
///
/// Only the advected field is rendered and swapped. When `velocity` is
/// carried by another field it is sampled but left untouched. Without
/// hardware linear filtering the program also receives the source texel
/// size so it can filter manually.
pub fn advect<B: RenderBackend>(
    backend: &mut B,
    velocity: &mut DoubleField<B::Surface>,
    source: AdvectionSource<'_, B::Surface>,
    dt: f32,
    dissipation: f32,
    linear_filtering: bool,
) {
    backend.set_blending(false);
    backend.bind_program(ProgramKind::Advection);

    if !linear_filtering {
        let dye_texel = match &source {
            AdvectionSource::Velocity => velocity.texel_size(),
            AdvectionSource::Field(field) => field.texel_size(),
        };
        backend.set_uniform(Uniform::DyeTexelSize, dye_texel.into());
    }
    backend.set_uniform(Uniform::TexelSize, velocity.texel_size().into());

    backend.bind_texture(Uniform::Velocity, velocity.read(), 0);
    match &source {
        AdvectionSource::Velocity => backend.bind_texture(Uniform::Source, velocity.read(), 0),
        AdvectionSource::Field(field) => backend.bind_texture(Uniform::Source, field.read(), 1),
    }

    backend.set_uniform(Uniform::Dt, dt.into());
    backend.set_uniform(Uniform::Dissipation, dissipation.into());

    let target = match source {
        AdvectionSource::Velocity => velocity,
        AdvectionSource::Field(field) => field,
    };
    backend.blit(Some(target.write()));
    target.swap();
    log::trace!("Advected {}x{} field", target.width(), target.height());
}
