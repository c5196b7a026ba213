use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GeodesyError;
use crate::geo::Datum;

/// Units of length that measurements can be expressed in.
///
/// `Degrees` and `Radians` are angular units: a distance in these units is the central angle
/// between two points on the sphere.
///
/// Serialized as the unit [`name`](Units::name). Deserialization accepts everything
/// [`Units::from_str`] does, including short names like `km`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Units {
    /// Meters.
    Meters,
    /// Kilometers. Default unit of all the measurement functions.
    #[default]
    Kilometers,
    /// International miles.
    Miles,
    /// Nautical miles.
    NauticalMiles,
    /// Feet.
    Feet,
    /// Yards.
    Yards,
    /// Inches.
    Inches,
    /// Centimeters.
    Centimeters,
    /// Millimeters.
    Millimeters,
    /// Central angle in degrees.
    Degrees,
    /// Central angle in radians.
    Radians,
}

impl Units {
    /// All supported units.
    pub const ALL: [Units; 11] = [
        Units::Meters,
        Units::Kilometers,
        Units::Miles,
        Units::NauticalMiles,
        Units::Feet,
        Units::Yards,
        Units::Inches,
        Units::Centimeters,
        Units::Millimeters,
        Units::Degrees,
        Units::Radians,
    ];

    /// Name of the unit as it is parsed by [`Units::from_str`].
    pub fn name(&self) -> &'static str {
        match self {
            Units::Meters => "meters",
            Units::Kilometers => "kilometers",
            Units::Miles => "miles",
            Units::NauticalMiles => "nauticalmiles",
            Units::Feet => "feet",
            Units::Yards => "yards",
            Units::Inches => "inches",
            Units::Centimeters => "centimeters",
            Units::Millimeters => "millimeters",
            Units::Degrees => "degrees",
            Units::Radians => "radians",
        }
    }

    /// Converts a central angle in radians into a length in these units on a sphere of the
    /// given radius (in meters).
    pub fn radians_to_length(&self, radians: f64, sphere_radius: f64) -> f64 {
        match self {
            Units::Radians => radians,
            Units::Degrees => radians.to_degrees(),
            linear => radians * sphere_radius * linear.per_meter(),
        }
    }

    /// Converts a length in these units into a central angle in radians on a sphere of the
    /// given radius (in meters).
    pub fn length_to_radians(&self, length: f64, sphere_radius: f64) -> f64 {
        match self {
            Units::Radians => length,
            Units::Degrees => length.to_radians(),
            linear => length / linear.per_meter() / sphere_radius,
        }
    }

    /// Converts a length from these units into `to` units. Angular units are converted on the
    /// sphere with the WGS84 mean radius.
    pub fn convert(&self, value: f64, to: Units) -> f64 {
        let radius = Datum::WGS84.mean_radius();
        to.radians_to_length(self.length_to_radians(value, radius), radius)
    }

    // Number of units in one meter. Only meaningful for linear units.
    fn per_meter(&self) -> f64 {
        match self {
            Units::Meters => 1.0,
            Units::Kilometers => 0.001,
            Units::Miles => 1.0 / 1609.344,
            Units::NauticalMiles => 1.0 / 1852.0,
            Units::Feet => 3.28084,
            Units::Yards => 1.0936,
            Units::Inches => 39.370,
            Units::Centimeters => 100.0,
            Units::Millimeters => 1000.0,
            Units::Degrees | Units::Radians => 1.0,
        }
    }
}

impl FromStr for Units {
    type Err = GeodesyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s.to_ascii_lowercase().as_str() {
            "meters" | "metres" | "m" => Units::Meters,
            "kilometers" | "kilometres" | "km" => Units::Kilometers,
            "miles" | "mi" => Units::Miles,
            "nauticalmiles" | "nmi" => Units::NauticalMiles,
            "feet" | "ft" => Units::Feet,
            "yards" | "yd" => Units::Yards,
            "inches" | "in" => Units::Inches,
            "centimeters" | "centimetres" | "cm" => Units::Centimeters,
            "millimeters" | "millimetres" | "mm" => Units::Millimeters,
            "degrees" => Units::Degrees,
            "radians" => Units::Radians,
            _ => return Err(GeodesyError::InvalidUnit(s.to_string())),
        };

        Ok(unit)
    }
}

impl TryFrom<String> for Units {
    type Error = GeodesyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for Units {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
