//! Error types for splatflow.
//!
//! This module provides error types for color parsing, palette loading,
//! simulation setup, and GPU initialization.

use std::fmt;

/// A color-gradient stop that is not valid `hsl(...)`/`hsla(...)` text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError {
    /// The text that failed to parse.
    pub input: String,
    /// What the parser expected at the point it gave up.
    pub reason: &'static str,
}

impl ColorParseError {
    pub(crate) fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid HSLA string '{}': {}", self.input, self.reason)
    }
}

impl std::error::Error for ColorParseError {}

/// Errors that can occur while loading a color scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// One of the gradient stops is malformed.
    Parse(ColorParseError),
    /// The scheme has no gradient stops at all.
    Empty { scheme: String },
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::Parse(e) => write!(f, "Failed to parse color scheme: {}", e),
            PaletteError::Empty { scheme } => {
                write!(f, "Color scheme '{}' has no gradient stops", scheme)
            }
        }
    }
}

impl std::error::Error for PaletteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PaletteError::Parse(e) => Some(e),
            PaletteError::Empty { .. } => None,
        }
    }
}

impl From<ColorParseError> for PaletteError {
    fn from(e: ColorParseError) -> Self {
        PaletteError::Parse(e)
    }
}

/// Errors that can occur when setting up or driving a simulation.
#[derive(Debug)]
pub enum FluidError {
    /// Canvas has a zero-length side, so aspect ratio and texcoords are undefined.
    DegenerateCanvas { width: u32, height: u32 },
    /// Splat radius or force is negative or not finite.
    InvalidSplatParams { radius: f32, force: f32 },
    /// A configured palette failed to load.
    Palette(PaletteError),
    /// Configuration text could not be deserialized.
    Config(serde_json::Error),
}

impl fmt::Display for FluidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FluidError::DegenerateCanvas { width, height } => write!(
                f,
                "Canvas extent {}x{} is degenerate; both sides must be positive",
                width, height
            ),
            FluidError::InvalidSplatParams { radius, force } => write!(
                f,
                "Splat parameters must be finite and non-negative (radius {}, force {})",
                radius, force
            ),
            FluidError::Palette(e) => write!(f, "Palette error: {}", e),
            FluidError::Config(e) => write!(f, "Failed to read simulation config: {}", e),
        }
    }
}

impl std::error::Error for FluidError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FluidError::Palette(e) => Some(e),
            FluidError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PaletteError> for FluidError {
    fn from(e: PaletteError) -> Self {
        FluidError::Palette(e)
    }
}

impl From<ColorParseError> for FluidError {
    fn from(e: ColorParseError) -> Self {
        FluidError::Palette(PaletteError::Parse(e))
    }
}

impl From<serde_json::Error> for FluidError {
    fn from(e: serde_json::Error) -> Self {
        FluidError::Config(e)
    }
}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}
