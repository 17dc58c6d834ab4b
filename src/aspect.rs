//! Canvas extent and aspect-ratio correction.
//!
//! Field coordinates are normalized to 0.0-1.0 on both axes, so on a
//! non-square canvas one unit of X and one unit of Y cover different pixel
//! lengths. [`AspectCorrection`] is the single place that compensates for
//! that, for pointer deltas as well as splat radii.

use glam::Vec2;

use crate::error::FluidError;

/// What an aspect-corrected value measures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal displacement. Shrunk on tall canvases.
    X,
    /// Vertical displacement. Shrunk on wide canvases.
    Y,
    /// Splat radius. Grown on wide canvases.
    Radius,
}

/// Aspect-ratio correction for one canvas shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AspectCorrection {
    aspect_ratio: f32,
}

impl AspectCorrection {
    /// `aspect_ratio` is canvas width divided by height.
    pub fn new(aspect_ratio: f32) -> Self {
        Self { aspect_ratio }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Correct `value` measured along `axis`.
    pub fn apply(&self, value: f32, axis: Axis) -> f32 {
        let ar = self.aspect_ratio;
        match axis {
            Axis::X if ar < 1.0 => value * ar,
            Axis::Y if ar > 1.0 => value / ar,
            Axis::Radius if ar > 1.0 => value * ar,
            _ => value,
        }
    }

    pub fn radius(&self, radius: f32) -> f32 {
        self.apply(radius, Axis::Radius)
    }

    /// Correct a texcoord displacement on both axes.
    pub fn delta(&self, delta: Vec2) -> Vec2 {
        Vec2::new(self.apply(delta.x, Axis::X), self.apply(delta.y, Axis::Y))
    }
}

/// Splat radius in field space, corrected for the canvas shape.
pub fn correct_radius(radius: f32, aspect_ratio: f32) -> f32 {
    AspectCorrection::new(aspect_ratio).radius(radius)
}

/// Pixel extent of the drawing surface. Both sides are always positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self, FluidError> {
        if width == 0 || height == 0 {
            return Err(FluidError::DegenerateCanvas { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn correction(&self) -> AspectCorrection {
        AspectCorrection::new(self.aspect_ratio())
    }

    /// Map a pixel position to texcoords. Y is flipped so that 0 is the
    /// bottom edge.
    pub fn texcoord(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x / self.width as f32, 1.0 - y / self.height as f32)
    }

    /// Grid size for a field of the given base resolution.
    ///
    /// The shorter canvas side gets `resolution` cells and the longer side
    /// is scaled up by the aspect ratio.
    pub fn field_dimensions(&self, resolution: u32) -> (u32, u32) {
        let mut aspect = self.aspect_ratio();
        if aspect < 1.0 {
            aspect = 1.0 / aspect;
        }
        let min = resolution.max(1);
        let max = (resolution as f32 * aspect).round().max(1.0) as u32;
        if self.width > self.height {
            (max, min)
        } else {
            (min, max)
        }
    }
}
