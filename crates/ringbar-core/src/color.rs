//! Color representation and CSS color-token parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// RGBA color with values in the range [0.0, 1.0].
///
/// Colors travel through configuration as CSS tokens (`"#0484d1"`, `"#333"`,
/// `"rgba(0, 0, 0, .3)"`, `"transparent"`), so serde goes through [`Color::from_css`]
/// and [`Color::to_css`] rather than the raw components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red component [0.0, 1.0]
    pub r: f32,
    /// Green component [0.0, 1.0]
    pub g: f32,
    /// Blue component [0.0, 1.0]
    pub b: f32,
    /// Alpha component [0.0, 1.0]
    pub a: f32,
}

impl Color {
    /// Create a new color, clamping values to [0.0, 1.0].
    #[must_use]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Create an opaque color from RGB values.
    #[must_use]
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Create a color from 8-bit channels and a [0.0, 1.0] alpha.
    #[must_use]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            a,
        )
    }

    /// Parse a hex color string (e.g., "#ff0000", "ff0000" or "#f00").
    ///
    /// Supports 3-character shorthand, 6-character RGB and 8-character RGBA formats.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid hex color.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let hex = hex.trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidHex);
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| ColorParseError::InvalidHex);

        match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (i, slot) in out.iter_mut().enumerate() {
                    *slot = channel(&hex[i..=i])? * 17;
                }
                Ok(Self::from_rgba8(out[0], out[1], out[2], 1.0))
            }
            6 => Ok(Self::from_rgba8(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                1.0,
            )),
            8 => {
                let a = channel(&hex[6..8])?;
                Ok(Self::from_rgba8(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                    f32::from(a) / 255.0,
                ))
            }
            _ => Err(ColorParseError::InvalidLength),
        }
    }

    /// Parse a CSS color token.
    ///
    /// Accepts hex notation, `rgb(r, g, b)`, `rgba(r, g, b, a)` and a handful of
    /// named colors.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a recognised color.
    pub fn from_css(token: &str) -> Result<Self, ColorParseError> {
        let token = token.trim();
        if token.starts_with('#') {
            return Self::from_hex(token);
        }

        let lower = token.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
        {
            let args = args
                .strip_suffix(')')
                .ok_or_else(|| ColorParseError::Malformed(token.to_string()))?;
            return Self::parse_functional(args)
                .ok_or_else(|| ColorParseError::Malformed(token.to_string()));
        }

        match lower.as_str() {
            "transparent" => Ok(Self::TRANSPARENT),
            "black" => Ok(Self::BLACK),
            "white" => Ok(Self::WHITE),
            "red" => Ok(Self::RED),
            "green" => Ok(Self::rgb(0.0, 128.0 / 255.0, 0.0)),
            "blue" => Ok(Self::BLUE),
            _ => Err(ColorParseError::UnknownName(token.to_string())),
        }
    }

    fn parse_functional(args: &str) -> Option<Self> {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return None;
        }
        let channel = |s: &str| -> Option<f32> {
            let v: f32 = s.parse().ok()?;
            v.is_finite().then(|| v.clamp(0.0, 255.0) / 255.0)
        };
        let r = channel(parts[0])?;
        let g = channel(parts[1])?;
        let b = channel(parts[2])?;
        let a = match parts.get(3) {
            Some(s) => {
                let v: f32 = s.parse().ok()?;
                if !v.is_finite() {
                    return None;
                }
                v
            }
            None => 1.0,
        };
        Some(Self::new(r, g, b, a))
    }

    /// Convert to hex string (RGB only).
    #[must_use]
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Convert to a CSS color token.
    ///
    /// Opaque colors print as hex, translucent ones as `rgba(..)`.
    #[must_use]
    pub fn to_css(&self) -> String {
        if *self == Self::TRANSPARENT {
            return "transparent".to_string();
        }
        if self.a >= 1.0 {
            return self.to_hex();
        }
        let [r, g, b] = self.rgb8();
        let alpha = format!("{:.3}", self.a);
        let alpha = alpha.trim_end_matches('0').trim_end_matches('.');
        format!("rgba({r}, {g}, {b}, {alpha})")
    }

    fn rgb8(&self) -> [u8; 3] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
        ]
    }

    // Common colors
    /// Black color
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    /// White color
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    /// Red color
    pub const RED: Self = Self {
        r: 1.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    /// Blue color
    pub const BLUE: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 1.0,
        a: 1.0,
    };
    /// Transparent color
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_css(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_css(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_css()
    }
}

/// Error type for color parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Invalid hex characters
    #[error("invalid hex characters")]
    InvalidHex,
    /// Invalid string length
    #[error("invalid hex string length (expected 3, 6 or 8)")]
    InvalidLength,
    /// `rgb(..)`/`rgba(..)` with the wrong arity or non-numeric arguments
    #[error("malformed color function: {0}")]
    Malformed(String),
    /// Not a color name this crate knows
    #[error("unknown color name: {0}")]
    UnknownName(String),
}
