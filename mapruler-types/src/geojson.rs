//! Conversions between geo points and [`geojson`] positions and geometries.

use geojson::{Geometry, Position, Value};

use crate::error::GeodesyError;
use crate::geo::{GeoPoint, GeoPoint2d, NewGeoPoint};

impl TryFrom<&Position> for GeoPoint2d {
    type Error = GeodesyError;

    fn try_from(value: &Position) -> Result<Self, Self::Error> {
        match value.as_slice() {
            [lon, lat, ..] => Ok(GeoPoint2d::lonlat(*lon, *lat)),
            _ => Err(GeodesyError::Conversion(
                "point must contain at least 2 dimensions".to_string(),
            )),
        }
    }
}

/// Converts a point into a GeoJSON position (`[lon, lat]`).
pub fn position(point: &impl GeoPoint<Num = f64>) -> Position {
    vec![point.lon(), point.lat()]
}

/// GeoJSON `Point` geometry.
pub fn point_geometry(point: &impl GeoPoint<Num = f64>) -> Geometry {
    Geometry::new(Value::Point(position(point)))
}

/// GeoJSON `LineString` geometry going through the given points.
pub fn line_geometry(points: &[impl GeoPoint<Num = f64>]) -> Geometry {
    Geometry::new(Value::LineString(points.iter().map(position).collect()))
}

/// GeoJSON `Polygon` geometry with a single outer ring.
///
/// The ring is closed by repeating the first point if it is not closed already.
pub fn polygon_geometry(ring: &[impl GeoPoint<Num = f64>]) -> Geometry {
    let mut positions: Vec<Position> = ring.iter().map(position).collect();
    if let (Some(first), Some(last)) = (positions.first(), positions.last()) {
        if first != last {
            positions.push(first.clone());
        }
    }

    Geometry::new(Value::Polygon(vec![positions]))
}
