//! Geographic point types and geodesic measurement functions used by the `mapruler` controls.
//!
//! All measurements are done on a spherical Earth model:
//!
//! * [`geodesy::distance`] uses the haversine formula,
//! * [`geodesy::destination`] projects a point along a rhumb line,
//! * [`geodesy::circle_polygon`] approximates a geodesic circle with a closed ring,
//! * [`geodesy::area`] and [`geodesy::centroid`] work on polygon rings.
//!
//! ```
//! use mapruler_types::geodesy::distance;
//! use mapruler_types::{lonlat, Units};
//!
//! let d = distance(&lonlat!(0.0, 0.0), &lonlat!(0.0, 1.0), Units::Kilometers);
//! assert!((d - 111.19).abs() < 0.01);
//! ```

pub mod error;
pub mod format;
pub mod geo;
pub mod geodesy;
mod units;

#[cfg(feature = "geojson")]
pub mod geojson;

pub use error::GeodesyError;
pub use geo::{Datum, GeoPoint, GeoPoint2d, NewGeoPoint};
pub use units::Units;
