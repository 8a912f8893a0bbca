use crate::model::LatLng;
use geo::{Distance, Haversine, Point};
use rstar::AABB;

/// length of the equator in meters, used for the flat-earth
/// longitude conversion.
pub const EQUATOR_LENGTH_METERS: f64 = 40_075_017.0;

/// meters covered by one degree of latitude.
pub const METERS_PER_DEGREE_LAT: f64 = EQUATOR_LENGTH_METERS / 360.0;

/// great-circle distance between two coordinates in meters.
pub fn haversine_distance(a: &LatLng, b: &LatLng) -> f64 {
    let p1 = Point::new(a.lng, a.lat);
    let p2 = Point::new(b.lng, b.lat);
    Haversine.distance(p1, p2)
}

/// converts a distance in meters into degrees of longitude at the given latitude.
///
/// this is an equirectangular approximation: the length of the circle of
/// latitude is the equator length scaled by `cos(lat)`. near the poles the
/// result grows without bound, callers should clamp where that matters.
///
/// # Arguments
///
/// * `lat` - latitude in degrees where the distance is measured
/// * `meters` - distance along the circle of latitude
///
/// # Returns
///
/// * the longitudinal span in degrees
pub fn lng_degrees_for_meters(lat: f64, meters: f64) -> f64 {
    let h_length = EQUATOR_LENGTH_METERS * lat.to_radians().cos();
    (meters / h_length) * 360.0
}

/// converts a distance in meters into degrees of latitude.
pub fn lat_degrees_for_meters(meters: f64) -> f64 {
    meters / METERS_PER_DEGREE_LAT
}

/// creates an rtree envelope in `[lng, lat]` space that contains every
/// coordinate within `meters` of `center`. the envelope is a superset of
/// the true search circle, so results must still be filtered by distance.
pub fn radius_envelope(center: &LatLng, meters: f64) -> AABB<[f64; 2]> {
    let dlat = lat_degrees_for_meters(meters);
    let dlng = lng_degrees_for_meters(center.lat, meters);
    // at high latitudes (or for huge radii) the circle wraps the globe
    let dlng = if dlng.is_finite() && dlng < 180.0 {
        dlng
    } else {
        180.0
    };
    AABB::from_corners(
        [center.lng - dlng, (center.lat - dlat).max(-90.0)],
        [center.lng + dlng, (center.lat + dlat).min(90.0)],
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use rstar::Envelope;

    #[test]
    fn test_haversine_one_degree_latitude() {
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(1.0, 0.0);
        let d = haversine_distance(&a, &b);
        // roughly 111km, exact value depends on the earth radius in use
        assert!((d - 111_195.0).abs() < 200.0, "distance was {d}");
    }

    #[test]
    fn test_lng_degrees_scale_with_latitude() {
        let at_equator = lng_degrees_for_meters(0.0, 1000.0);
        let at_sixty = lng_degrees_for_meters(60.0, 1000.0);
        assert!((at_sixty / at_equator - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_radius_envelope_contains_center() {
        let center = LatLng::new(52.5, 13.4);
        let env = radius_envelope(&center, 500.0);
        assert!(env.contains_point(&[13.4, 52.5]));
        assert!(!env.contains_point(&[13.5, 52.5]));
    }
}
