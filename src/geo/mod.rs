use crate::models::location::GeoPoint;

const EARTH_RADIUS_KM: f64 = 6_371.0;

const GEOCODE_BUCKETS: u64 = 5_000;
const GEOCODE_LAT_ORIGIN: f64 = 30.0;
const GEOCODE_LNG_ORIGIN: f64 = -150.0;

pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lng = (delta_lng / 2.0).sin();

    let haversine = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;
    let central_angle = 2.0 * haversine.sqrt().asin();

    EARTH_RADIUS_KM * central_angle
}

/// Deterministic stand-in for a geocoder: hashes the address text into a
/// point inside lat [30, 80) and lng [-150, -100). No I/O.
///
/// Returns `None` for empty or whitespace-only input.
pub fn geocode(address: &str) -> Option<GeoPoint> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return None;
    }

    let sum: u64 = trimmed.chars().map(|c| c as u64).sum();
    let offset = (sum % GEOCODE_BUCKETS) as f64 / 100.0;

    Some(GeoPoint {
        lat: GEOCODE_LAT_ORIGIN + offset,
        lng: GEOCODE_LNG_ORIGIN + offset,
    })
}
