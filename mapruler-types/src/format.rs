//! Human readable labels for measured values.

use std::fmt::{Display, Formatter};

/// Square meters in one hectare.
const HECTARE: u64 = 10_000;
/// Square meters in one are.
const ARE: u64 = 100;

/// Decomposition of an area into hectares, ares and centiares (square meters).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct AreaTerms {
    /// Whole hectares.
    pub hectares: u64,
    /// Whole ares left after hectares are taken out, `0..100`.
    pub ares: u64,
    /// Square meters left after ares are taken out, `0..100`.
    pub centiares: u64,
}

impl AreaTerms {
    /// Decomposes an area given in square meters. The value is rounded to whole square meters
    /// first; negative and non-finite values are treated as zero.
    pub fn from_square_meters(square_meters: f64) -> Self {
        let total = if square_meters.is_finite() && square_meters > 0.0 {
            square_meters.round() as u64
        } else {
            0
        };

        Self {
            hectares: total / HECTARE,
            ares: total % HECTARE / ARE,
            centiares: total % ARE,
        }
    }

    /// Area in square meters these terms add up to.
    pub fn square_meters(&self) -> u64 {
        self.hectares * HECTARE + self.ares * ARE + self.centiares
    }
}

impl Display for AreaTerms {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let terms = [
            (self.hectares, "ha"),
            (self.ares, "a"),
            (self.centiares, "ca"),
        ];

        let mut is_first = true;
        for (value, unit) in terms.into_iter().filter(|(value, _)| *value > 0) {
            if !is_first {
                f.write_str(" ")?;
            }

            write!(f, "{value} {unit}")?;
            is_first = false;
        }

        Ok(())
    }
}

/// Formats an area in square meters as hectares, ares and centiares, largest first. Terms equal
/// to zero are omitted, so zero area gives an empty string.
///
/// ```
/// use mapruler_types::format::format_area;
///
/// assert_eq!(format_area(120_300.0), "12 ha 3 a");
/// assert_eq!(format_area(0.0), "");
/// ```
pub fn format_area(square_meters: f64) -> String {
    AreaTerms::from_square_meters(square_meters).to_string()
}

/// Formats a distance given in kilometers. Distances under one kilometer are shown in whole
/// meters, longer ones in kilometers with two decimals.
///
/// ```
/// use mapruler_types::format::format_distance;
///
/// assert_eq!(format_distance(0.25), "250 m");
/// assert_eq!(format_distance(12.3456), "12.35 km");
/// ```
pub fn format_distance(kilometers: f64) -> String {
    let meters = (kilometers * 1000.0).round();
    if meters < 1000.0 {
        format!("{} m", meters.max(0.0))
    } else {
        format!("{kilometers:.2} km")
    }
}

/// Formats a circle radius given in kilometers as whole meters.
pub fn format_radius(kilometers: f64) -> String {
    format!("{} m", (kilometers * 1000.0).round().max(0.0))
}
