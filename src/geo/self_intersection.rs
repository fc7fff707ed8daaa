//! Self-crossing scan for walked loops

use crate::core::types::GeoPoint;
use crate::geo::primitives::segments_properly_intersect;

/// True when any two non-adjacent segments of `path` properly cross
///
/// Segments are indexed by their start vertex, so `n` points give `n - 1`
/// segments. Adjacent segments share an endpoint and are never compared.
/// Pairs where `i` falls in the first `endpoint_skip` segments and `j` in
/// the last `endpoint_skip` are skipped too: at loop closure the head and
/// tail run within the closure threshold of each other, and comparing them
/// false-positives on legitimate loops.
///
/// Callers must pass a frozen copy of the path, never a buffer another
/// task may still be appending to.
pub fn is_self_intersecting(path: &[GeoPoint], endpoint_skip: usize) -> bool {
    if path.len() < 4 {
        return false;
    }

    let segments = path.len() - 1;
    for i in 0..segments {
        for j in (i + 2)..segments {
            if i < endpoint_skip && j >= segments - endpoint_skip {
                continue;
            }
            if segments_properly_intersect(path[i], path[i + 1], path[j], path[j + 1]) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon)
    }

    const SKIP: usize = 2;

    #[test]
    fn test_simple_loop_is_clean() {
        let square = vec![
            p(0.0, 0.0),
            p(0.0, 1.0),
            p(0.5, 1.5),
            p(1.0, 1.0),
            p(1.0, 0.0),
            p(0.5, -0.5),
        ];
        assert!(!is_self_intersecting(&square, SKIP));
    }

    #[test]
    fn test_figure_eight_is_caught() {
        // Horizontal run, climb, then a vertical drop back through the run
        let path = vec![
            p(0.0, 0.0),
            p(0.0, 1.0),
            p(0.0, 2.0),
            p(1.0, 2.0),
            p(1.0, 1.5),
            p(-1.0, 1.5), // crosses the 0.0-latitude run between lon 1.0 and 2.0
            p(-1.0, 0.5),
            p(-0.5, 0.25),
            p(-0.25, -0.5),
        ];
        assert!(is_self_intersecting(&path, SKIP));
    }

    #[test]
    fn test_too_short_path_cannot_cross() {
        let path = vec![p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)];
        assert!(!is_self_intersecting(&path, SKIP));
    }

    #[test]
    fn test_head_tail_proximity_is_not_a_crossing() {
        // Closing loop whose final segment passes right next to the first
        // one; the endpoint skip must keep this a valid loop
        let path = vec![
            p(0.0, 0.0),
            p(0.0, 1.0),
            p(0.0, 2.0),
            p(1.0, 2.0),
            p(2.0, 2.0),
            p(2.0, 1.0),
            p(2.0, 0.0),
            p(1.0, -0.1),
            p(-0.05, 0.4), // tail closes by cutting just across the first segment
        ];
        assert!(!is_self_intersecting(&path, SKIP));
    }

    #[test]
    fn test_without_skip_the_same_tail_is_flagged() {
        let path = vec![
            p(0.0, 0.0),
            p(0.0, 1.0),
            p(0.0, 2.0),
            p(1.0, 2.0),
            p(2.0, 2.0),
            p(2.0, 1.0),
            p(2.0, 0.0),
            p(1.0, -0.1),
            p(-0.05, 0.4),
        ];
        assert!(is_self_intersecting(&path, 0));
    }

    #[test]
    fn test_retraced_line_is_not_proper() {
        // Out-and-back along one meridian: collinear overlap only
        let path = vec![
            p(0.0, 0.0),
            p(0.0, 1.0),
            p(0.0, 2.0),
            p(0.0, 3.0),
            p(0.0, 2.0),
            p(0.0, 1.0),
        ];
        assert!(!is_self_intersecting(&path, SKIP));
    }
}
