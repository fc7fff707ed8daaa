//! Scalar predicates shared by the validator and the collision engine

use crate::core::types::GeoPoint;
use crate::geo::EARTH_RADIUS_M;

/// Great-circle distance between two fixes in meters (haversine)
pub fn distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Turn direction of the ordered triple (a, b, c) on the lon/lat plane
///
/// Longitude is x, latitude is y. The test is two-valued: an exactly zero
/// cross product (collinear points) folds into `Clockwise` rather than
/// getting its own case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
}

impl Orientation {
    pub fn of(a: GeoPoint, b: GeoPoint, c: GeoPoint) -> Self {
        let cross = (b.longitude - a.longitude) * (c.latitude - a.latitude)
            - (b.latitude - a.latitude) * (c.longitude - a.longitude);
        if cross > 0.0 {
            Orientation::CounterClockwise
        } else {
            Orientation::Clockwise
        }
    }
}

/// True iff segments p1-p2 and p3-p4 cross strictly between their endpoints
///
/// Each segment's endpoints must lie on opposite sides of the other
/// segment's supporting line.
pub fn segments_properly_intersect(p1: GeoPoint, p2: GeoPoint, p3: GeoPoint, p4: GeoPoint) -> bool {
    Orientation::of(p1, p3, p4) != Orientation::of(p2, p3, p4)
        && Orientation::of(p1, p2, p3) != Orientation::of(p1, p2, p4)
}

/// Even-odd containment test for `point` against `ring`
///
/// The test ray runs along increasing latitude at the point's longitude;
/// each ring edge straddling that longitude with its crossing above the
/// point flips containment. Rings with fewer than 3 vertices contain
/// nothing. The ring wraps implicitly (last vertex connects to first).
pub fn point_in_polygon(point: GeoPoint, ring: &[GeoPoint]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[j];

        if (a.longitude > point.longitude) != (b.longitude > point.longitude) {
            let t = (point.longitude - a.longitude) / (b.longitude - a.longitude);
            let crossing_lat = a.latitude + t * (b.latitude - a.latitude);
            if crossing_lat > point.latitude {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
