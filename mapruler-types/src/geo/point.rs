use approx::{AbsDiffEq, RelativeEq};
use num_traits::Float;
use serde::{Deserialize, Serialize};

/// Point on the surface of a celestial body.
pub trait GeoPoint {
    /// Numeric type used to represent coordinates.
    type Num: Float;

    /// Latitude in degrees.
    fn lat(&self) -> Self::Num;
    /// Longitude in degrees.
    fn lon(&self) -> Self::Num;

    /// Latitude in radians.
    fn lat_rad(&self) -> Self::Num {
        self.lat().to_radians()
    }

    /// Longitude in radians.
    fn lon_rad(&self) -> Self::Num {
        self.lon().to_radians()
    }
}

/// Geo point that can be constructed from coordinates.
pub trait NewGeoPoint<N = f64>: GeoPoint<Num = N> + Sized {
    /// Creates a point from latitude and longitude in degrees.
    fn latlon(lat: N, lon: N) -> Self;

    /// Creates a point from longitude and latitude in degrees.
    fn lonlat(lon: N, lat: N) -> Self {
        Self::latlon(lat, lon)
    }
}

/// 2d point on the surface of a celestial body.
///
/// Serialized as a `[longitude, latitude]` pair, the same way GeoJSON positions are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint2d {
    lat: f64,
    lon: f64,
}

impl GeoPoint for GeoPoint2d {
    type Num = f64;

    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }
}

impl NewGeoPoint<f64> for GeoPoint2d {
    fn latlon(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl GeoPoint2d {
    /// Creates a new point from another.
    pub fn from(other: &impl GeoPoint<Num = f64>) -> Self {
        Self {
            lat: other.lat(),
            lon: other.lon(),
        }
    }

    /// Coordinates as a `[longitude, latitude]` pair.
    pub fn to_lonlat(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl From<[f64; 2]> for GeoPoint2d {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

impl From<GeoPoint2d> for [f64; 2] {
    fn from(value: GeoPoint2d) -> Self {
        value.to_lonlat()
    }
}

impl AbsDiffEq for GeoPoint2d {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.lat.abs_diff_eq(&other.lat, epsilon) && self.lon.abs_diff_eq(&other.lon, epsilon)
    }
}

impl RelativeEq for GeoPoint2d {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.lat.relative_eq(&other.lat, epsilon, max_relative)
            && self.lon.relative_eq(&other.lon, epsilon, max_relative)
    }
}

/// Creates a new GeoPoint2d from latitude and longitude values (in degrees).
///
/// ```
/// use mapruler_types::geo::GeoPoint;
/// use mapruler_types::latlon;
///
/// let point = latlon!(38.0, 52.0);
/// assert_eq!(point.lat(), 38.0);
/// ```
#[macro_export]
macro_rules! latlon {
    ($lat:expr, $lon:expr) => {
        <$crate::geo::GeoPoint2d as $crate::geo::NewGeoPoint<f64>>::latlon($lat, $lon)
    };
}

/// Creates a new GeoPoint2d from longitude and latitude values (in degrees), in the order
/// GeoJSON uses.
///
/// ```
/// use mapruler_types::geo::GeoPoint;
/// use mapruler_types::lonlat;
///
/// let point = lonlat!(52.0, 38.0);
/// assert_eq!(point.lat(), 38.0);
/// assert_eq!(point.lon(), 52.0);
/// ```
#[macro_export]
macro_rules! lonlat {
    ($lon:expr, $lat:expr) => {
        <$crate::geo::GeoPoint2d as $crate::geo::NewGeoPoint<f64>>::lonlat($lon, $lat)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lonlat_order() {
        let point = lonlat!(10.0, 20.0);
        assert_eq!(point.lon(), 10.0);
        assert_eq!(point.lat(), 20.0);
        assert_eq!(point.to_lonlat(), [10.0, 20.0]);
        assert_eq!(point, latlon!(20.0, 10.0));
    }
}
