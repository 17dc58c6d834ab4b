//! Simulation configuration.
//!
//! Every field has a default, so a partial JSON document is enough:
//!
//! ```
//! use splatflow::SimulationConfig;
//!
//! let config = SimulationConfig::from_json(r#"{ "color_scheme": "ocean" }"#).unwrap();
//! assert_eq!(config.color_scheme, "ocean");
//! assert_eq!(config.sim_resolution, 128);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::FluidError;
use crate::palette::{SchemeSpec, DEFAULT_SCHEME};
use crate::splat::SplatParams;

/// Tunables for a [`FluidSimulation`](crate::FluidSimulation).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Velocity field resolution along the short canvas side.
    pub sim_resolution: u32,
    /// Dye field resolution along the short canvas side.
    pub dye_resolution: u32,
    /// Base splat radius, in hundredths of the field.
    pub splat_radius: f32,
    /// Base impulse multiplier.
    pub splat_force: f32,
    pub velocity_dissipation: f32,
    pub density_dissipation: f32,
    /// Scheme used for pointer and ambient colors.
    pub color_scheme: String,
    /// Upper bound on a frame delta, in seconds.
    pub max_delta: f32,
    /// Extra schemes registered on top of the built-ins.
    pub palettes: Vec<SchemeSpec>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sim_resolution: 128,
            dye_resolution: 1024,
            splat_radius: 0.25,
            splat_force: 6000.0,
            velocity_dissipation: 0.2,
            density_dissipation: 1.0,
            color_scheme: DEFAULT_SCHEME.to_string(),
            max_delta: 1.0 / 60.0,
            palettes: Vec::new(),
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, FluidError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, FluidError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_sim_resolution(mut self, resolution: u32) -> Self {
        self.sim_resolution = resolution;
        self
    }

    pub fn with_dye_resolution(mut self, resolution: u32) -> Self {
        self.dye_resolution = resolution;
        self
    }

    pub fn with_splat_radius(mut self, radius: f32) -> Self {
        self.splat_radius = radius;
        self
    }

    pub fn with_splat_force(mut self, force: f32) -> Self {
        self.splat_force = force;
        self
    }

    /// Set velocity and dye dissipation rates.
    pub fn with_dissipation(mut self, velocity: f32, density: f32) -> Self {
        self.velocity_dissipation = velocity;
        self.density_dissipation = density;
        self
    }

    pub fn with_color_scheme(mut self, name: impl Into<String>) -> Self {
        self.color_scheme = name.into();
        self
    }

    pub fn with_max_delta(mut self, seconds: f32) -> Self {
        self.max_delta = seconds;
        self
    }

    /// Register an extra scheme.
    pub fn with_palette<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        gradient: impl IntoIterator<Item = S>,
    ) -> Self {
        self.palettes.push(SchemeSpec {
            name: name.into(),
            gradient: gradient.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Base splat parameters, validated.
    pub fn splat_params(&self) -> Result<SplatParams, FluidError> {
        SplatParams::new(self.splat_radius, self.splat_force)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.sim_resolution, 128);
        assert_eq!(config.dye_resolution, 1024);
        assert_eq!(config.splat_radius, 0.25);
        assert_eq!(config.splat_force, 6000.0);
        assert_eq!(config.color_scheme, "default");
        assert!((config.max_delta - 1.0 / 60.0).abs() < 1e-7);
        assert!(config.palettes.is_empty());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = SimulationConfig::from_json(
            r#"{ "splat_force": 3000.0, "palettes": [{ "name": "duo", "gradient": ["hsl(0, 100%, 50%)", "hsl(240, 100%, 50%)"] }] }"#,
        )
        .unwrap();
        assert_eq!(config.splat_force, 3000.0);
        assert_eq!(config.dye_resolution, 1024);
        assert_eq!(config.palettes.len(), 1);
        assert_eq!(config.palettes[0].gradient.len(), 2);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = SimulationConfig::from_json("{ sim_resolution: }").unwrap_err();
        assert!(matches!(err, FluidError::Config(_)));
    }

    #[test]
    fn test_json_roundtrip_preserves_builders() {
        let config = SimulationConfig::new()
            .with_sim_resolution(64)
            .with_dissipation(0.5, 2.0)
            .with_color_scheme("neon")
            .with_palette("duo", ["hsl(0, 100%, 50%)"]);
        let back = SimulationConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_splat_params_validated() {
        assert!(SimulationConfig::default().splat_params().is_ok());
        let bad = SimulationConfig::default().with_splat_radius(-1.0);
        assert!(matches!(
            bad.splat_params(),
            Err(FluidError::InvalidSplatParams { .. })
        ));
    }
}
