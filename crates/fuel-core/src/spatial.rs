//! Spatial math for route proximity and distance calculations.

use crate::models::GeoPoint;

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Calculate distance between two points in miles using the Haversine formula.
///
/// # Arguments
/// * `lat1`, `lon1` - First point coordinates in decimal degrees
/// * `lat2`, `lon2` - Second point coordinates in decimal degrees
///
/// # Returns
/// Distance in miles
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    // Rounding can push `a` just outside [0, 1] for antipodal points.
    let a = a.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_MILES * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Great-circle distance between two points in miles.
pub fn distance(a: GeoPoint, b: GeoPoint) -> f64 {
    haversine_distance(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Total length of a polyline in miles.
pub fn path_length(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| distance(pair[0], pair[1]))
        .sum()
}

/// Running distance from the first point, one entry per point.
pub fn cumulative_distances(points: &[GeoPoint]) -> Vec<f64> {
    let mut total = 0.0;
    let mut out = Vec::with_capacity(points.len());
    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            total += distance(points[i - 1], *point);
        }
        out.push(total);
    }
    out
}

/// Degrees of longitude spanning `miles` along the equator.
pub fn miles_to_equatorial_degrees(miles: f64) -> f64 {
    (miles / EARTH_RADIUS_MILES).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_known_distance() {
        // ~69 miles between these points (1 degree latitude)
        let dist = haversine_distance(0.0, 0.0, 1.0, 0.0);
        assert!((dist - 69.097).abs() < 0.01);
    }

    #[test]
    fn test_haversine_same_point() {
        let dist = haversine_distance(40.712776, -74.005974, 40.712776, -74.005974);
        assert_eq!(dist, 0.0);
    }

    #[test]
    fn antipodal_points_give_half_circumference() {
        let dist = distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 180.0));
        assert!(dist.is_finite());
        assert!((dist - std::f64::consts::PI * EARTH_RADIUS_MILES).abs() < 1e-6);

        let poles = distance(GeoPoint::new(90.0, 0.0), GeoPoint::new(-90.0, 0.0));
        assert!((poles - std::f64::consts::PI * EARTH_RADIUS_MILES).abs() < 1e-6);
    }

    #[test]
    fn new_york_to_washington() {
        let nyc = GeoPoint::new(40.712776, -74.005974);
        let dc = GeoPoint::new(38.9072, -77.0369);
        let dist = distance(nyc, dc);
        assert!((dist - 203.0).abs() < 3.0, "got {dist}");
    }

    #[test]
    fn cumulative_distances_are_monotonic_and_sum_to_length() {
        let points = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(0.0, 3.0),
        ];
        let cumulative = cumulative_distances(&points);
        assert_eq!(cumulative.len(), 4);
        assert_eq!(cumulative[0], 0.0);
        assert!(cumulative.windows(2).all(|w| w[1] >= w[0]));
        assert!((cumulative[3] - path_length(&points)).abs() < 1e-9);
    }

    #[test]
    fn equatorial_degrees_round_trip() {
        let degrees = miles_to_equatorial_degrees(100.0);
        let back = haversine_distance(0.0, 0.0, 0.0, degrees);
        assert!((back - 100.0).abs() < 1e-6);
    }
}
