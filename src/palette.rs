//! Named color-gradient schemes.
//!
//! A scheme is an ordered list of `hsl(...)` stops. Stops are parsed once,
//! when the scheme is built, so a malformed palette fails at load time
//! rather than mid-frame.
//!
//! # Built-in Schemes
//!
//! | Name | Character |
//! |------|-----------|
//! | `default` | Full hue wheel |
//! | `ocean` | Teals and deep blues |
//! | `sunset` | Warm oranges, pinks and purples |
//! | `neon` | Saturated magenta, cyan, lime |
//! | `fire` | Reds through yellow |
//! | `forest` | Greens and earthy browns |
//! | `ice` | Pale cyan to deep blue |
//! | `pastel` | Soft, light hues |
//! | `monochrome` | Grays |
//!
//! # Custom Schemes
//!
//! ```ignore
//! let mut registry = SchemeRegistry::builtin();
//! registry.add(ColorScheme::new("brand", ["hsl(12, 90%, 55%)", "hsl(200, 80%, 45%)"])?);
//! ```

use serde::{Deserialize, Serialize};

use crate::color::{hsla_to_rgb, Rgb};
use crate::error::PaletteError;

/// Name of the scheme used when nothing else is selected or a lookup fails.
pub const DEFAULT_SCHEME: &str = "default";

/// Gradient stops of the built-in schemes, in cycle order.
const BUILTIN_SCHEMES: &[(&str, &[&str])] = &[
    (
        "default",
        &[
            "hsl(0, 100%, 50%)",
            "hsl(60deg, 100%, 50%)",
            "hsl(120, 100%, 50%)",
            "hsl(180, 100%, 50%)",
            "hsl(240, 100%, 50%)",
            "hsl(300, 100%, 50%)",
        ],
    ),
    (
        "ocean",
        &[
            "hsl(180, 100%, 35%)",
            "hsl(195, 90%, 40%)",
            "hsl(210, 85%, 35%)",
            "hsl(225, 80%, 30%)",
            "hsl(170, 70%, 45%)",
        ],
    ),
    (
        "sunset",
        &[
            "hsl(15, 100%, 55%)",
            "hsl(35, 100%, 55%)",
            "hsl(340, 85%, 55%)",
            "hsl(300, 60%, 45%)",
            "hsl(270, 55%, 35%)",
        ],
    ),
    (
        "neon",
        &[
            "hsla(320, 100%, 55%, 1)",
            "hsla(180, 100%, 50%, 1)",
            "hsla(90, 100%, 50%, 1)",
            "hsla(270, 100%, 60%, 1)",
        ],
    ),
    (
        "fire",
        &[
            "hsl(0, 100%, 40%)",
            "hsl(15, 100%, 50%)",
            "hsl(30, 100%, 50%)",
            "hsl(45, 100%, 55%)",
            "hsl(55, 100%, 65%)",
        ],
    ),
    (
        "forest",
        &[
            "hsl(100, 60%, 30%)",
            "hsl(130, 50%, 35%)",
            "hsl(80, 45%, 40%)",
            "hsl(30, 45%, 30%)",
            "hsl(150, 40%, 25%)",
        ],
    ),
    (
        "ice",
        &[
            "hsl(190, 80%, 85%)",
            "hsl(200, 75%, 65%)",
            "hsl(210, 80%, 50%)",
            "hsl(220, 85%, 35%)",
        ],
    ),
    (
        "pastel",
        &[
            "hsl(350, 70%, 80%)",
            "hsl(40, 70%, 80%)",
            "hsl(120, 50%, 80%)",
            "hsl(200, 60%, 80%)",
            "hsl(270, 50%, 82%)",
        ],
    ),
    (
        "monochrome",
        &["hsl(0, 0%, 90%)", "hsl(0, 0%, 60%)", "hsl(0, 0%, 35%)"],
    ),
];

/// Serializable description of a scheme: a name plus its gradient stops.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeSpec {
    pub name: String,
    pub gradient: Vec<String>,
}

/// A named gradient with its stops already converted to RGB.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorScheme {
    name: String,
    gradient: Vec<String>,
    colors: Vec<Rgb>,
}

impl ColorScheme {
    /// Build a scheme, parsing every stop.
    ///
    /// Fails on the first malformed stop, or if there are no stops.
    pub fn new<I, S>(name: impl Into<String>, gradient: I) -> Result<Self, PaletteError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let gradient: Vec<String> = gradient.into_iter().map(Into::into).collect();
        if gradient.is_empty() {
            return Err(PaletteError::Empty { scheme: name });
        }
        let colors = gradient
            .iter()
            .map(|stop| hsla_to_rgb(stop))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name,
            gradient,
            colors,
        })
    }

    /// Build a scheme from its serialized form.
    pub fn from_spec(spec: &SchemeSpec) -> Result<Self, PaletteError> {
        Self::new(spec.name.clone(), spec.gradient.iter().cloned())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The original gradient stop strings.
    pub fn gradient(&self) -> &[String] {
        &self.gradient
    }

    /// The stops converted to RGB, in gradient order. Never empty.
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }
}

/// Registry of named color schemes in registration order.
///
/// Always holds a [`DEFAULT_SCHEME`] entry.
#[derive(Clone, Debug)]
pub struct SchemeRegistry {
    schemes: Vec<ColorScheme>,
}

impl SchemeRegistry {
    /// Registry holding the built-in schemes.
    pub fn builtin() -> Self {
        let schemes = BUILTIN_SCHEMES
            .iter()
            .filter_map(|(name, stops)| match ColorScheme::new(*name, stops.iter().copied()) {
                Ok(scheme) => Some(scheme),
                Err(e) => {
                    log::error!("Built-in color scheme '{}' failed to load: {}", name, e);
                    None
                }
            })
            .collect();
        Self { schemes }
    }

    /// Add a scheme, replacing any existing scheme with the same name.
    pub fn add(&mut self, scheme: ColorScheme) {
        match self.index_of(scheme.name()) {
            Some(i) => self.schemes[i] = scheme,
            None => self.schemes.push(scheme),
        }
    }

    /// Parse and add a serialized scheme.
    pub fn add_spec(&mut self, spec: &SchemeSpec) -> Result<(), PaletteError> {
        self.add(ColorScheme::from_spec(spec)?);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ColorScheme> {
        self.schemes.iter().find(|s| s.name == name)
    }

    /// The fallback scheme.
    pub fn default_scheme(&self) -> &ColorScheme {
        self.get(DEFAULT_SCHEME).unwrap_or(&self.schemes[0])
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.schemes.iter().position(|s| s.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemes.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

impl Default for SchemeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
