//! Geodesic measurement functions.
//!
//! All functions treat the Earth as a sphere. Distances are measured on the sphere with the
//! [mean radius](Datum::mean_radius) of WGS84, areas on the sphere with its
//! [equatorial radius](Datum::semimajor).

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::error::GeodesyError;
use crate::geo::{Datum, GeoPoint, GeoPoint2d, NewGeoPoint};
use crate::units::Units;

/// Number of segments used by [`circle_polygon`] if not specified otherwise.
pub const DEFAULT_CIRCLE_STEPS: usize = 64;

fn sphere_radius() -> f64 {
    Datum::WGS84.mean_radius()
}

/// Great-circle distance between two points calculated with the haversine formula.
///
/// The function is symmetric and returns `0` for equal points.
pub fn distance(
    a: &impl GeoPoint<Num = f64>,
    b: &impl GeoPoint<Num = f64>,
    units: Units,
) -> f64 {
    let d_lat = b.lat_rad() - a.lat_rad();
    let d_lon = b.lon_rad() - a.lon_rad();

    let h = (d_lat / 2.0).sin().powi(2)
        + (d_lon / 2.0).sin().powi(2) * a.lat_rad().cos() * b.lat_rad().cos();
    let central_angle = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    units.radians_to_length(central_angle, sphere_radius())
}

/// Point located `dist` away from the `origin` along the rhumb line with the given `bearing`
/// (degrees clockwise from north, normalized into `[0, 360)`).
///
/// Longitude of the result is wrapped into `[-180, 180)`.
pub fn destination(
    origin: &impl GeoPoint<Num = f64>,
    dist: f64,
    bearing: f64,
    units: Units,
) -> Result<GeoPoint2d, GeodesyError> {
    if dist < 0.0 || dist.is_nan() {
        return Err(GeodesyError::NegativeDistance(dist));
    }

    let delta = units.length_to_radians(dist, sphere_radius());
    let theta = bearing.rem_euclid(360.0).to_radians();

    let phi1 = origin.lat_rad();
    let d_phi = delta * theta.cos();
    let mut phi2 = phi1 + d_phi;

    // Going over a pole.
    if phi2.abs() > FRAC_PI_2 {
        phi2 = if phi2 > 0.0 { PI - phi2 } else { -PI - phi2 };
    }

    let d_psi = ((phi2 / 2.0 + FRAC_PI_4).tan() / (phi1 / 2.0 + FRAC_PI_4).tan()).ln();
    // East-west lines have undefined `d_phi / d_psi`.
    let q = if d_psi.abs() > 10e-12 {
        d_phi / d_psi
    } else {
        phi1.cos()
    };

    let lambda2 = origin.lon_rad() + delta * theta.sin() / q;
    let lon = (lambda2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;

    Ok(GeoPoint2d::latlon(phi2.to_degrees(), lon))
}

/// Approximates a circle with the given `center` and `radius` by a closed ring.
///
/// The ring contains `steps + 1` points, the last one being equal to the first one. The first
/// point lies straight north of the center and the points go counterclockwise.
pub fn circle_polygon(
    center: &impl GeoPoint<Num = f64>,
    radius: f64,
    steps: usize,
    units: Units,
) -> Result<Vec<GeoPoint2d>, GeodesyError> {
    if steps < 3 {
        return Err(GeodesyError::InvalidSteps(steps));
    }

    let mut ring = (0..steps)
        .map(|i| destination(center, radius, i as f64 * -360.0 / steps as f64, units))
        .collect::<Result<Vec<_>, _>>()?;

    ring.push(ring[0]);
    Ok(ring)
}

/// Unsigned area of a polygon ring on the sphere in square meters.
///
/// The ring may or may not repeat its first point at the end. Rings with less than 3 distinct
/// points have zero area.
pub fn area(ring: &[impl GeoPoint<Num = f64>]) -> f64 {
    let ring = open_ring(ring);
    let count = ring.len();
    if count < 3 {
        return 0.0;
    }

    let total: f64 = (0..count)
        .map(|i| {
            let prev = &ring[(i + count - 1) % count];
            let curr = &ring[i];
            let next = &ring[(i + 1) % count];

            (next.lon_rad() - prev.lon_rad()) * curr.lat_rad().sin()
        })
        .sum();

    let radius = Datum::WGS84.semimajor();
    (total * radius * radius / 2.0).abs()
}

/// Arithmetic mean of the vertices of a ring or a line. The closing point of a closed ring is
/// not counted twice.
///
/// This is not a geodesic centroid, but it is good enough for placing a label. Returns `None`
/// for an empty input.
pub fn centroid(points: &[impl GeoPoint<Num = f64>]) -> Option<GeoPoint2d> {
    let points = open_ring(points);
    if points.is_empty() {
        return None;
    }

    let count = points.len() as f64;
    let (lon_sum, lat_sum) = points
        .iter()
        .fold((0.0, 0.0), |(lon, lat), p| (lon + p.lon(), lat + p.lat()));

    Some(GeoPoint2d::lonlat(lon_sum / count, lat_sum / count))
}

/// Sum of the lengths of the segments of a line.
pub fn length(points: &[impl GeoPoint<Num = f64>], units: Units) -> f64 {
    points
        .windows(2)
        .map(|pair| distance(&pair[0], &pair[1], units))
        .sum()
}

fn open_ring<P: GeoPoint<Num = f64>>(ring: &[P]) -> &[P] {
    match ring {
        [first, .., last] if is_same(first, last) => &ring[..ring.len() - 1],
        _ => ring,
    }
}

fn is_same(a: &impl GeoPoint<Num = f64>, b: &impl GeoPoint<Num = f64>) -> bool {
    a.lat() == b.lat() && a.lon() == b.lon()
}
