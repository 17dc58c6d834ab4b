//! Color types and color-space conversion.
//!
//! Palettes are written as CSS-style `hsl(...)` / `hsla(...)` stops and
//! converted to linear [`Rgb`] triples before they reach the GPU. Alpha is
//! parsed but never carried into the RGB result.
//!
//! ```ignore
//! use splatflow::color::{hsla_to_rgb, Rgb};
//!
//! let red = hsla_to_rgb("hsl(0, 100%, 50%)")?;
//! assert_eq!(red, Rgb::new(1.0, 0.0, 0.0));
//! ```

use std::str::FromStr;

use glam::Vec3;

use crate::error::ColorParseError;

/// An RGB triple.
///
/// Components are nominally 0.0-1.0 but may overshoot; ambient splats use
/// amplified colors on purpose and nothing re-normalizes them.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Multiply every component by `k`.
    pub fn scaled(self, k: f32) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k)
    }
}

impl From<Rgb> for Vec3 {
    fn from(c: Rgb) -> Self {
        Vec3::new(c.r, c.g, c.b)
    }
}

impl From<Rgb> for [f32; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

/// A parsed `hsl`/`hsla` color.
///
/// Hue is in degrees, saturation and lightness in percent, alpha 0.0-1.0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsla {
    pub h: f32,
    pub s: f32,
    pub l: f32,
    pub a: f32,
}

impl Hsla {
    /// Convert to RGB. Alpha is dropped.
    pub fn to_rgb(&self) -> Rgb {
        let h = (self.h as f64 / 360.0).rem_euclid(1.0);
        let s = self.s as f64 / 100.0;
        let l = self.l as f64 / 100.0;

        if s == 0.0 {
            let l = l as f32;
            return Rgb::new(l, l, l);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Rgb::new(
            hue_to_channel(p, q, h + 1.0 / 3.0) as f32,
            hue_to_channel(p, q, h) as f32,
            hue_to_channel(p, q, h - 1.0 / 3.0) as f32,
        )
    }
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

impl FromStr for Hsla {
    type Err = ColorParseError;

    /// Accepts `hsl(H, S%, L%)` and `hsla(H, S%, L%, A)`.
    ///
    /// Hue may carry a `deg` suffix, commas and `%` signs are optional, and
    /// alpha defaults to 1 when absent.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut cursor = Cursor::new(input.trim());

        if !cursor.eat("hsl") {
            return Err(ColorParseError::new(input, "expected 'hsl' or 'hsla' prefix"));
        }
        cursor.eat("a");
        if !cursor.eat("(") {
            return Err(ColorParseError::new(input, "expected '('"));
        }

        cursor.skip_whitespace();
        let h = cursor
            .integer("missing hue", "hue out of range")
            .map_err(|reason| ColorParseError::new(input, reason))?;
        cursor.eat("deg");
        cursor.separator();

        let s = cursor
            .integer("missing saturation", "saturation out of range")
            .map_err(|reason| ColorParseError::new(input, reason))?;
        cursor.eat("%");
        cursor.separator();

        let l = cursor
            .integer("missing lightness", "lightness out of range")
            .map_err(|reason| ColorParseError::new(input, reason))?;
        cursor.eat("%");
        cursor.separator();

        let a = match cursor.decimal() {
            Some(text) => text
                .parse::<f32>()
                .map_err(|_| ColorParseError::new(input, "malformed alpha"))?,
            None => 1.0,
        };

        cursor.skip_whitespace();
        if !cursor.eat(")") {
            return Err(ColorParseError::new(input, "expected ')'"));
        }
        if !cursor.is_empty() {
            return Err(ColorParseError::new(input, "trailing characters after ')'"));
        }

        Ok(Hsla {
            h: h as f32,
            s: s as f32,
            l: l as f32,
            a,
        })
    }
}

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { rest: text }
    }

    fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    fn eat(&mut self, token: &str) -> bool {
        match self.rest.strip_prefix(token) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    /// Optional whitespace, an optional comma, optional whitespace.
    fn separator(&mut self) {
        self.skip_whitespace();
        self.eat(",");
        self.skip_whitespace();
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let end = self
            .rest
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        let (head, tail) = self.rest.split_at(end);
        self.rest = tail;
        head
    }

    /// Unsigned decimal digits. Fails with `missing` when there are none
    /// and `overflow` when they do not fit a `u32`.
    fn integer(&mut self, missing: &'static str, overflow: &'static str) -> Result<u32, &'static str> {
        let digits = self.take_while(|c| c.is_ascii_digit());
        if digits.is_empty() {
            return Err(missing);
        }
        digits.parse().map_err(|_| overflow)
    }

    fn decimal(&mut self) -> Option<&'a str> {
        let text = self.take_while(|c| c.is_ascii_digit() || c == '.');
        if text.is_empty() || text == "." {
            None
        } else {
            Some(text)
        }
    }
}

/// Parse an `hsl`/`hsla` string and convert it to RGB.
pub fn hsla_to_rgb(input: &str) -> Result<Rgb, ColorParseError> {
    input.parse::<Hsla>().map(|c| c.to_rgb())
}

/// Convert HSV (all components 0.0-1.0) to RGB.
///
/// Inputs are not clamped. The hue sector wraps with a Euclidean modulo, so
/// out-of-range values still select one of the six sectors deterministically.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb {
    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match (i as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb::new(r, g, b)
}
