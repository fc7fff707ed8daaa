//! Enclosed area of a closed walk

use crate::core::types::GeoPoint;
use crate::geo::EARTH_RADIUS_M;

/// Absolute enclosed area of `ring` in square meters
///
/// Accumulates `(lon2 - lon1) * (2 + sin lat1 + sin lat2)` in radians over
/// consecutive vertex pairs (the last vertex wraps to the first) and scales
/// by `R^2 / 2`. This is a surface-integral approximation that tracks the
/// planar shoelace value for the sub-kilometer loops a walker can close;
/// it is NOT a geodesic area and drifts for large or near-pole rings.
pub fn ring_area_m2(ring: &[GeoPoint]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];

        let lon1 = a.longitude.to_radians();
        let lon2 = b.longitude.to_radians();
        let lat1 = a.latitude.to_radians();
        let lat2 = b.latitude.to_radians();

        sum += (lon2 - lon1) * (2.0 + lat1.sin() + lat2.sin());
    }

    (sum * EARTH_RADIUS_M * EARTH_RADIUS_M / 2.0).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    // One degree of latitude on the 6371 km sphere
    const METERS_PER_DEG: f64 = std::f64::consts::PI * EARTH_RADIUS_M / 180.0;

    fn square_ring(origin: GeoPoint, side_m: f64) -> Vec<GeoPoint> {
        let dlat = side_m / METERS_PER_DEG;
        let dlon = side_m / (METERS_PER_DEG * origin.latitude.to_radians().cos());
        vec![
            origin,
            GeoPoint::new(origin.latitude, origin.longitude + dlon),
            GeoPoint::new(origin.latitude + dlat, origin.longitude + dlon),
            GeoPoint::new(origin.latitude + dlat, origin.longitude),
        ]
    }

    #[test]
    fn test_fifty_meter_square_near_equator() {
        let ring = square_ring(GeoPoint::new(0.01, 0.01), 50.0);
        let area = ring_area_m2(&ring);
        // 50 m x 50 m = 2500 m^2, small-area approximation within 5%
        assert!((area - 2500.0).abs() < 125.0, "got {area}");
    }

    #[test]
    fn test_square_at_mid_latitude() {
        // The lon span is widened by 1/cos(lat), so the approximation
        // still lands near the true planar area away from the equator
        let ring = square_ring(GeoPoint::new(52.52, 13.405), 50.0);
        let area = ring_area_m2(&ring);
        assert!((area - 2500.0).abs() < 125.0, "got {area}");
    }

    #[test]
    fn test_winding_direction_does_not_matter() {
        let mut ring = square_ring(GeoPoint::new(0.0, 0.0), 80.0);
        let ccw = ring_area_m2(&ring);
        ring.reverse();
        let cw = ring_area_m2(&ring);
        assert!((ccw - cw).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_ring_has_no_area() {
        assert_eq!(ring_area_m2(&[]), 0.0);
        let line = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.001)];
        assert_eq!(ring_area_m2(&line), 0.0);
    }

    #[test]
    fn test_collapsed_ring_has_zero_area() {
        // Out-and-back along a line encloses nothing
        let ring = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.001),
            GeoPoint::new(0.0, 0.002),
            GeoPoint::new(0.0, 0.001),
        ];
        let area = ring_area_m2(&ring);
        assert!(area < 1e-6, "got {area}");
    }
}
