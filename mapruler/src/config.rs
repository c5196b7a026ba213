//! Configuration of the measurement controls.

use mapruler_types::geodesy::DEFAULT_CIRCLE_STEPS;
use mapruler_types::Units;
use serde::{Deserialize, Serialize};

use crate::error::MeasureError;

const MIN_CIRCLE_STEPS: usize = 3;

/// Configuration of a [`MeasurementControl`](crate::control::MeasurementControl).
///
/// Can be deserialized from JSON, missing fields take default values:
///
/// ```
/// use mapruler::config::MeasureConfig;
/// use mapruler::mapruler_types::Units;
///
/// let config = MeasureConfig::from_json(r#"{ "units": "miles" }"#).unwrap();
/// assert_eq!(config.units(), Units::Miles);
/// assert_eq!(config.circle_steps(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    units: Units,
    circle_steps: usize,
    style: OverlayStyle,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            units: Units::Kilometers,
            circle_steps: DEFAULT_CIRCLE_STEPS,
            style: OverlayStyle::default(),
        }
    }
}

impl MeasureConfig {
    /// Parses configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, MeasureError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.circle_steps = config.circle_steps.max(MIN_CIRCLE_STEPS);
        Ok(config)
    }

    /// Units the measured lengths are reported in by
    /// [`measurements`](crate::control::MeasurementControl::measurements).
    ///
    /// Labels on the map are always shown in meters and kilometers.
    pub fn units(&self) -> Units {
        self.units
    }

    /// Sets units of the measured lengths.
    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    /// Sets units of the measured lengths.
    pub fn set_units(&mut self, units: Units) {
        self.units = units;
    }

    /// Number of segments a circle is approximated with.
    pub fn circle_steps(&self) -> usize {
        self.circle_steps
    }

    /// Sets number of segments a circle is approximated with. Values less than 3 are replaced
    /// with 3.
    pub fn with_circle_steps(mut self, steps: usize) -> Self {
        self.set_circle_steps(steps);
        self
    }

    /// Sets number of segments a circle is approximated with. Values less than 3 are replaced
    /// with 3.
    pub fn set_circle_steps(&mut self, steps: usize) {
        self.circle_steps = steps.max(MIN_CIRCLE_STEPS);
    }

    /// Paint properties of the drawn shapes.
    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// Sets paint properties of the drawn shapes.
    pub fn with_style(mut self, style: OverlayStyle) -> Self {
        self.style = style;
        self
    }

    /// Sets paint properties of the drawn shapes.
    pub fn set_style(&mut self, style: OverlayStyle) {
        self.style = style;
    }
}

/// Paint properties of the measurement layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// Color of lines and polygon outlines.
    pub line_color: String,
    /// Width of lines and polygon outlines in pixels.
    pub line_width: f64,
    /// Fill color of polygons and circles.
    pub fill_color: String,
    /// Opacity of the polygon fill, `0..=1`.
    pub fill_opacity: f64,
    /// Color of the label text.
    pub label_color: String,
    /// Color of the halo around the label text.
    pub label_halo_color: String,
    /// Font size of the labels in pixels.
    pub label_size: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            line_color: "#263238".to_string(),
            line_width: 2.0,
            fill_color: "#263238".to_string(),
            fill_opacity: 0.1,
            label_color: "#263238".to_string(),
            label_halo_color: "#ffffff".to_string(),
            label_size: 12.0,
        }
    }
}
