//! Radius → bounding box approximation

use crate::models::{Coordinates, MapBounds};

/// Approximate statute miles per degree of latitude
pub const MILES_PER_DEGREE_LATITUDE: f64 = 69.0;

/// Floor for `|cos(latitude)|` so the longitude span stays finite near the poles
pub const MIN_LONGITUDE_COSINE: f64 = 0.01;

/// Axis-aligned box enclosing a circle of `radius_miles` around `center`.
///
/// The longitude span is widened by `1 / |cos(latitude)|`. Extreme latitudes
/// (beyond roughly ±89.4°) and boxes crossing the antimeridian are outside
/// the supported envelope: the cosine is clamped and longitudes are not
/// wrapped.
pub fn bounding_box(center: Coordinates, radius_miles: f64) -> MapBounds {
    let lat_delta = radius_miles / MILES_PER_DEGREE_LATITUDE;
    let cos_lat = center
        .latitude
        .to_radians()
        .cos()
        .abs()
        .max(MIN_LONGITUDE_COSINE);
    let lng_delta = radius_miles / (MILES_PER_DEGREE_LATITUDE * cos_lat);

    MapBounds::new(
        Coordinates::new(center.latitude - lat_delta, center.longitude - lng_delta),
        Coordinates::new(center.latitude + lat_delta, center.longitude + lng_delta),
    )
}
