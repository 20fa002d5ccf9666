use crate::models::{BoundingBox, Coordinates};

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance between two optional locations.
///
/// Returns `None` ("undefined distance") when either side is missing or not
/// a finite number. Callers ranking by distance must treat `None` as
/// infinitely far, never as zero.
#[inline]
pub fn distance_km(a: Option<Coordinates>, b: Option<Coordinates>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) if a.is_valid() && b.is_valid() => Some(haversine_distance(
            a.latitude,
            a.longitude,
            b.latitude,
            b.longitude,
        )),
        _ => None,
    }
}

/// Calculate a bounding box around a center point
///
/// Cheaper than Haversine for pre-filtering. The box is the exact spherical
/// envelope of the radius (plus a hair of slack), so any point it rejects is
/// guaranteed to be farther than `radius_km`. When the circle reaches a pole
/// the longitude span is unbounded and the box reports itself unreliable.
pub fn calculate_bounding_box(lat: f64, lon: f64, radius_km: f64) -> BoundingBox {
    const SLACK_DEG: f64 = 1e-9;

    let angular = radius_km / EARTH_RADIUS_KM;
    let lat_delta = angular.to_degrees() + SLACK_DEG;

    let ratio = angular.sin() / lat.to_radians().cos().abs();
    let lon_delta = if angular < std::f64::consts::FRAC_PI_2 && ratio < 1.0 {
        ratio.asin().to_degrees() + SLACK_DEG
    } else {
        f64::INFINITY
    };

    BoundingBox {
        min_lat: lat - lat_delta,
        max_lat: lat + lat_delta,
        min_lon: lon - lon_delta,
        max_lon: lon + lon_delta,
    }
}

impl BoundingBox {
    /// The box stays inside the valid coordinate ranges.
    ///
    /// Boxes crossing a pole or the antimeridian cannot be tested with plain
    /// comparisons and must not be used to reject points.
    pub fn is_reliable(&self) -> bool {
        self.min_lat >= -90.0
            && self.max_lat <= 90.0
            && self.min_lon >= -180.0
            && self.max_lon <= 180.0
            && self.min_lon.is_finite()
            && self.max_lon.is_finite()
    }
}

/// Check if a point is within a bounding box
#[inline]
pub fn is_within_bounding_box(lat: f64, lon: f64, bbox: &BoundingBox) -> bool {
    lat >= bbox.min_lat && lat <= bbox.max_lat && lon >= bbox.min_lon && lon <= bbox.max_lon
}

/// Round a distance to 3 decimal places for display and comparison
#[inline]
pub fn round_km(distance_km: f64) -> f64 {
    (distance_km * 1000.0).round() / 1000.0
}
