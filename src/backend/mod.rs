//! The rendering seam.
//!
//! Splat, advection and color passes never talk to a graphics API
//! directly. They drive a [`RenderBackend`]: bind one of the known
//! programs, set its uniforms, bind input surfaces, then blit a full-screen
//! pass into a target surface (or the screen).
//!
//! Two implementations ship with the crate:
//! - [`crate::gpu::WgpuBackend`] renders with wgpu.
//! - [`RecordingBackend`] records the command stream without a GPU, for
//!   tests and dry runs.

mod recording;

pub use recording::{Command, RecordingBackend, SurfaceId};

use glam::{Vec2, Vec3, Vec4};

/// The GPU programs the simulation knows how to drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProgramKind {
    /// Adds a gaussian impulse around a point.
    Splat,
    /// Moves a field along the velocity field and decays it.
    Advection,
    /// Fills the target with a constant color.
    Color,
}

/// Uniform slots used by the built-in programs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Uniform {
    /// Splat: field being perturbed.
    Target,
    /// Advection: velocity field sampled for the backtrace.
    Velocity,
    /// Advection: field being carried.
    Source,
    AspectRatio,
    /// Splat center in texcoords.
    Point,
    /// Splat impulse or dye color; fill color for the color program.
    Color,
    Radius,
    TexelSize,
    /// Texel size for manual bilinear filtering of the source field.
    DyeTexelSize,
    Dt,
    Dissipation,
}

/// Supported uniform value types.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    F32(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
}

impl UniformValue {
    /// Widen to four components, filling missing ones with `fill`.
    pub fn to_array(&self, fill: f32) -> [f32; 4] {
        match *self {
            UniformValue::F32(v) => [v, fill, fill, fill],
            UniformValue::Vec2(v) => [v.x, v.y, fill, fill],
            UniformValue::Vec3(v) => [v.x, v.y, v.z, fill],
            UniformValue::Vec4(v) => v.to_array(),
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::F32(v)
    }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self {
        UniformValue::Vec2(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        UniformValue::Vec4(v)
    }
}

/// A graphics API capable of running the simulation passes.
///
/// Calls are issued strictly in order on one thread; a blit must observe
/// every uniform and texture bound before it.
pub trait RenderBackend {
    /// A 2D render target that can also be sampled.
    type Surface;

    /// Allocate a surface of `width` x `height` texels.
    fn create_surface(&mut self, width: u32, height: u32) -> Self::Surface;

    /// Whether surfaces can be sampled with hardware bilinear filtering.
    fn supports_linear_filtering(&self) -> bool;

    fn bind_program(&mut self, program: ProgramKind);

    fn set_uniform(&mut self, uniform: Uniform, value: UniformValue);

    /// Bind `surface` for sampling through `uniform` on texture unit `unit`.
    fn bind_texture(&mut self, uniform: Uniform, surface: &Self::Surface, unit: u32);

    fn set_blending(&mut self, enabled: bool);

    /// Run the bound program over the whole of `target`, or the screen when
    /// `target` is `None`.
    fn blit(&mut self, target: Option<&Self::Surface>);
}
