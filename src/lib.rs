//! # splatflow
//!
//! Pointer-reactive fluid splats on double-buffered GPU fields.
//!
//! splatflow keeps two fields, velocity and dye. Pointer drags and ambient
//! bursts inject gaussian "splats" into both, and every frame the fields are
//! advected: velocity is carried along itself, then dye along velocity,
//! each fading with its own dissipation rate.
//!
//! ## Quick Start
//!
//! ```
//! use splatflow::prelude::*;
//!
//! let canvas = Canvas::new(800, 600).unwrap();
//! let config = SimulationConfig::default().with_color_scheme("ocean");
//! let mut sim = FluidSimulation::new(RecordingBackend::new(), canvas, config)
//!     .unwrap()
//!     .with_seed(1);
//!
//! sim.pointer_down(PointerId::Mouse, 400.0, 300.0);
//! sim.pointer_move(PointerId::Mouse, 460.0, 280.0);
//! let injected = sim.update(1.0 / 60.0);
//! assert!(injected >= 1);
//! ```
//!
//! ## Core Concepts
//!
//! ### Fields
//!
//! A [`DoubleField`] is a read/write pair of surfaces. Passes sample `read`,
//! render into `write` and swap. Fields are sized from the canvas: the
//! short side gets the configured resolution, the long side scales with the
//! aspect ratio.
//!
//! ### Backends
//!
//! Passes are expressed against [`RenderBackend`]. [`gpu::WgpuBackend`]
//! runs them on wgpu; [`RecordingBackend`] records them for tests and dry
//! runs.
//!
//! ### Trails
//!
//! A fast drag is filled in with extra splats along the path, each smaller
//! and stronger the faster the pointer moved. See [`trail`].
//!
//! ### Colors
//!
//! Each new contact takes the next color of the active [`ColorScheme`].
//! Schemes are `hsl(...)` gradients; nine are built in and more can be
//! added through [`SimulationConfig::palettes`].

pub mod advection;
pub mod aspect;
pub mod backend;
pub mod color;
pub mod color_cycle;
mod config;
mod error;
pub mod field;
pub mod gpu;
pub mod palette;
pub mod pointer;
mod simulation;
pub mod splat;
pub mod time;
pub mod trail;

pub use advection::{advect, AdvectionSource};
pub use aspect::{AspectCorrection, Axis, Canvas};
pub use backend::{ProgramKind, RecordingBackend, RenderBackend, Uniform, UniformValue};
pub use color::{hsla_to_rgb, hsv_to_rgb, Hsla, Rgb};
pub use color_cycle::ColorCycle;
pub use config::SimulationConfig;
pub use error::{ColorParseError, FluidError, GpuError, PaletteError};
pub use field::DoubleField;
pub use glam::{Vec2, Vec3, Vec4};
pub use palette::{ColorScheme, SchemeRegistry, SchemeSpec};
pub use pointer::{Pointer, PointerId, PointerTracker};
pub use simulation::FluidSimulation;
pub use splat::{draw_color, splat, Splat, SplatParams};
pub use time::FrameClock;
pub use trail::{apply_pointer_trail, multiple_splats, plan_pointer_trail, plan_random_splats};

/// Convenient re-exports for common usage.
///
/// ```
/// use splatflow::prelude::*;
/// ```
pub mod prelude {
    pub use crate::aspect::Canvas;
    pub use crate::backend::{RecordingBackend, RenderBackend};
    pub use crate::color::Rgb;
    pub use crate::color_cycle::ColorCycle;
    pub use crate::config::SimulationConfig;
    pub use crate::error::FluidError;
    pub use crate::gpu::WgpuBackend;
    pub use crate::pointer::PointerId;
    pub use crate::simulation::FluidSimulation;
    pub use crate::time::FrameClock;
    pub use crate::{Vec2, Vec3, Vec4};
}
