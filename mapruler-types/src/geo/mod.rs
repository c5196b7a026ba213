//! Geometries in geographic coordinates (latitude and longitude) (see [`GeoPoint`]) and the
//! reference ellipsoid used for measurements (see [`Datum`]).

mod datum;
mod point;

pub use datum::Datum;
pub use point::{GeoPoint, GeoPoint2d, NewGeoPoint};
