//! Gauge configuration.

use ringbar_core::{Color, Easing};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Errors from loading or validating [`GaugeOptions`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML decode error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// TOML decode error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// `colors` was given but empty.
    #[error("colors must contain at least one color")]
    EmptyPalette,

    /// `size` is zero, negative or not a number.
    #[error("size must be positive, got {0}")]
    NonPositiveSize(f64),

    /// `barsWidth` outside `(0, 100]`.
    #[error("barsWidth must be within (0, 100], got {0}")]
    BarsWidthOutOfRange(f64),
}

/// The palette used when none is configured.
#[must_use]
pub fn default_colors() -> Vec<Color> {
    vec![
        Color::from_rgba8(0x04, 0x84, 0xd1, 1.0),
        Color::from_rgba8(0xe5, 0x3b, 0x44, 1.0),
        Color::from_rgba8(0x2c, 0xe8, 0xf4, 1.0),
        Color::from_rgba8(0xff, 0xe7, 0x62, 1.0),
        Color::from_rgba8(0x63, 0xc6, 0x4d, 1.0),
        Color::from_rgba8(0xfb, 0x92, 0x2b, 1.0),
    ]
}

/// Gauge configuration.
///
/// Field names follow the camelCase keys used in configuration files.
/// Missing keys take their defaults and unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GaugeOptions {
    /// Diameter in pixels
    pub size: f64,
    /// Ring thickness in percent of the radius
    pub bars_width: f64,
    /// Value of a full revolution
    pub max: f64,
    /// Render the textual readout
    pub show_value: bool,
    /// Decimal places in the readout
    pub value_decimals: usize,
    /// Readout suffix; `"%"` shows the sum as a percentage of `max`
    pub value_unit: String,
    /// Readout once the sum reaches `max` (`None` or empty disables it)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_when_done: Option<String>,
    /// Segment colors, used cyclically
    pub colors: Vec<Color>,
    /// Unfilled ring color
    pub background: Color,
    /// Inner disc color
    pub value_background: Color,
    /// Transition duration in milliseconds
    pub transition_time: f64,
    /// Transition timing function
    pub easing: Easing,
}

impl Default for GaugeOptions {
    fn default() -> Self {
        Self {
            size: 150.0,
            bars_width: 20.0,
            max: 100.0,
            show_value: true,
            value_decimals: 0,
            value_unit: "%".to_string(),
            value_when_done: None,
            colors: default_colors(),
            background: Color::new(0.0, 0.0, 0.0, 0.3),
            value_background: Color::from_rgba8(0x33, 0x33, 0x33, 1.0),
            transition_time: 500.0,
            easing: Easing::Linear,
        }
    }
}

impl GaugeOptions {
    /// Create options with every field at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate JSON options.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(input)?;
        options.validate()?;
        Ok(options)
    }

    /// Parse and validate YAML options.
    pub fn from_yaml(input: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_yaml_ng::from_str(input)?;
        options.validate()?;
        Ok(options)
    }

    /// Parse and validate TOML options.
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let options: Self = toml::from_str(input)?;
        options.validate()?;
        Ok(options)
    }

    /// Check the structural constraints of the options.
    ///
    /// `max <= 0` is accepted: every percentage then reads as zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(ConfigError::NonPositiveSize(self.size));
        }
        if !(self.bars_width > 0.0 && self.bars_width <= 100.0) {
            return Err(ConfigError::BarsWidthOutOfRange(self.bars_width));
        }
        if self.colors.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(())
    }

    // Builder setters

    /// Set the diameter in pixels.
    #[must_use]
    pub fn size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    /// Set the ring thickness (percent of the radius).
    #[must_use]
    pub fn bars_width(mut self, bars_width: f64) -> Self {
        self.bars_width = bars_width;
        self
    }

    /// Set the value of a full revolution.
    #[must_use]
    pub fn max(mut self, max: f64) -> Self {
        self.max = max;
        self
    }

    /// Show or hide the readout.
    #[must_use]
    pub fn show_value(mut self, show: bool) -> Self {
        self.show_value = show;
        self
    }

    /// Set readout decimal places.
    #[must_use]
    pub fn value_decimals(mut self, decimals: usize) -> Self {
        self.value_decimals = decimals;
        self
    }

    /// Set the readout unit.
    #[must_use]
    pub fn value_unit(mut self, unit: impl Into<String>) -> Self {
        self.value_unit = unit.into();
        self
    }

    /// Set the readout shown once the gauge is full.
    #[must_use]
    pub fn value_when_done(mut self, text: impl Into<String>) -> Self {
        self.value_when_done = Some(text.into());
        self
    }

    /// Set the segment palette.
    #[must_use]
    pub fn colors(mut self, colors: Vec<Color>) -> Self {
        self.colors = colors;
        self
    }

    /// Set the unfilled ring color.
    #[must_use]
    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Set the inner disc color.
    #[must_use]
    pub fn value_background(mut self, color: Color) -> Self {
        self.value_background = color;
        self
    }

    /// Set the transition duration in milliseconds.
    #[must_use]
    pub fn transition_time(mut self, ms: f64) -> Self {
        self.transition_time = ms;
        self
    }

    /// Set the transition timing function.
    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    // Derived values

    /// The done text, if enabled.
    #[must_use]
    pub fn done_text(&self) -> Option<&str> {
        self.value_when_done.as_deref().filter(|s| !s.is_empty())
    }

    /// Transition duration, with negative or non-finite values read as zero.
    #[must_use]
    pub fn transition_ms(&self) -> f64 {
        if self.transition_time.is_finite() {
            self.transition_time.max(0.0)
        } else {
            0.0
        }
    }

    /// Inner disc diameter as a fraction of the full diameter.
    #[must_use]
    pub fn inner_ratio(&self) -> f64 {
        (100.0 - self.bars_width.clamp(0.0, 100.0)) / 100.0
    }

    /// Diameter of the inner value disc in pixels.
    #[must_use]
    pub fn inner_diameter(&self) -> f64 {
        self.size * self.inner_ratio()
    }

    /// The palette to paint with, falling back to the default one when empty.
    #[must_use]
    pub fn palette(&self) -> Vec<Color> {
        if self.colors.is_empty() {
            warn!("empty color palette, using the default colors");
            default_colors()
        } else {
            self.colors.clone()
        }
    }
}
