//! Sequential palette cycling.
//!
//! [`ColorCycle`] hands out the colors of the active scheme one at a time,
//! in gradient order, wrapping back to the first color after the last. It
//! is a plain value owned by the caller; nothing about it is global.

use crate::color::Rgb;
use crate::palette::{SchemeRegistry, DEFAULT_SCHEME};

/// Stateful producer of palette colors.
#[derive(Clone, Debug)]
pub struct ColorCycle {
    registry: SchemeRegistry,
    scheme: String,
    colors: Vec<Rgb>,
    index: usize,
}

impl ColorCycle {
    /// Cycle over the built-in schemes. The default scheme is loaded on
    /// first use.
    pub fn new() -> Self {
        Self::with_registry(SchemeRegistry::builtin())
    }

    /// Cycle over a custom registry.
    pub fn with_registry(registry: SchemeRegistry) -> Self {
        Self {
            registry,
            scheme: DEFAULT_SCHEME.to_string(),
            colors: Vec::new(),
            index: 0,
        }
    }

    /// Cycle over the built-in schemes starting on `name`.
    pub fn with_scheme(name: &str) -> Self {
        let mut cycle = Self::new();
        cycle.set_scheme(name);
        cycle
    }

    /// Switch to the scheme called `name` and restart the cycle.
    ///
    /// Unknown names fall back to the default scheme with a warning.
    /// Returns the colors of the scheme that ended up active.
    pub fn set_scheme(&mut self, name: &str) -> &[Rgb] {
        let scheme = match self.registry.get(name) {
            Some(scheme) => scheme,
            None => {
                log::warn!(
                    "Color scheme \"{}\" not found, falling back to {}",
                    name,
                    DEFAULT_SCHEME
                );
                self.registry.default_scheme()
            }
        };
        log::debug!("Color scheme set to '{}'", scheme.name());

        self.scheme = scheme.name().to_string();
        self.colors = scheme.colors().to_vec();
        self.index = 0;
        &self.colors
    }

    /// Return the current color and advance to the next one.
    pub fn next_color(&mut self) -> Rgb {
        if self.colors.is_empty() {
            let scheme = self.scheme.clone();
            self.set_scheme(&scheme);
        }
        let color = self.colors[self.index];
        self.index = (self.index + 1) % self.colors.len();
        color
    }

    /// Name of the active scheme.
    pub fn current_scheme(&self) -> &str {
        &self.scheme
    }

    /// Colors of the active scheme. Empty until the first scheme load.
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Position of the next color to be returned.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn registry(&self) -> &SchemeRegistry {
        &self.registry
    }

    /// Mutable registry access, for registering schemes after construction.
    pub fn registry_mut(&mut self) -> &mut SchemeRegistry {
        &mut self.registry
    }
}

impl Default for ColorCycle {
    fn default() -> Self {
        Self::new()
    }
}
