//! Segment and containment sweeps over the territory snapshot

use ordered_float::OrderedFloat;
use tracing::{debug, warn};

use crate::collision::{CollisionResult, CollisionSeverity, CollisionViolation};
use crate::core::config::EngineConfig;
use crate::core::types::{GeoPoint, PlayerId};
use crate::geo;
use crate::territory::TerritorySnapshot;

/// Compares the live path (and its candidate start point) against every
/// competitor territory in a snapshot
///
/// Pure given the snapshot: no state, no scheduling. The session layer
/// decides when passes run and what a violation does to the session.
#[derive(Debug, Clone)]
pub struct CollisionEngine {
    config: EngineConfig,
}

impl CollisionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Gate for starting a claim
    ///
    /// Standing inside any competitor territory blocks the session before
    /// a single fix is sampled. Returns `None` when the start is clear.
    pub fn check_start_point(
        &self,
        start: GeoPoint,
        snapshot: &TerritorySnapshot,
        self_id: &PlayerId,
    ) -> Option<CollisionViolation> {
        for territory in snapshot.competitors_of(self_id) {
            if geo::point_in_polygon(start, territory.ring()) {
                warn!(territory = ?territory.id(), "start point inside competitor territory");
                return Some(CollisionViolation::PointInTerritory {
                    territory: territory.id(),
                });
            }
        }
        None
    }

    /// One pass over a frozen copy of the live path
    ///
    /// Stages run in fixed order: path-segment crossings, then containment
    /// of the latest point, then the vertex-distance ladder. A violation
    /// short-circuits; the ladder only grades violation-free paths.
    pub fn check_path(
        &self,
        path: &[GeoPoint],
        snapshot: &TerritorySnapshot,
        self_id: &PlayerId,
    ) -> CollisionResult {
        for territory in snapshot.competitors_of(self_id) {
            let ring = territory.ring();
            for segment in path.windows(2) {
                for k in 0..ring.len() {
                    let edge_start = ring[k];
                    let edge_end = ring[(k + 1) % ring.len()];
                    if geo::segments_properly_intersect(segment[0], segment[1], edge_start, edge_end)
                    {
                        warn!(territory = ?territory.id(), "live path crosses territory boundary");
                        return CollisionResult::Violation(CollisionViolation::PathCrossesTerritory {
                            territory: territory.id(),
                        });
                    }
                }
            }
        }

        let Some(&latest) = path.last() else {
            return CollisionResult::Clear {
                severity: CollisionSeverity::Safe,
                nearest_m: None,
            };
        };

        for territory in snapshot.competitors_of(self_id) {
            if geo::point_in_polygon(latest, territory.ring()) {
                warn!(territory = ?territory.id(), "walker inside competitor territory");
                return CollisionResult::Violation(CollisionViolation::PointInTerritory {
                    territory: territory.id(),
                });
            }
        }

        // Nearest vertex, not nearest edge: an accepted approximation that
        // keeps the pass linear in vertex count
        let nearest = snapshot
            .competitors_of(self_id)
            .flat_map(|t| t.ring().iter())
            .map(|&vertex| OrderedFloat(geo::distance_m(latest, vertex)))
            .min();

        match nearest {
            None => CollisionResult::Clear {
                severity: CollisionSeverity::Safe,
                nearest_m: None,
            },
            Some(OrderedFloat(nearest_m)) => {
                let severity = self.severity_for(nearest_m);
                debug!(nearest_m, ?severity, "collision pass clear");
                CollisionResult::Clear {
                    severity,
                    nearest_m: Some(nearest_m),
                }
            }
        }
    }

    /// Distance-to-vertex ladder; each boundary belongs to the more
    /// urgent tier (100 m is Caution, 50 m is Warning, 25 m is Danger)
    fn severity_for(&self, distance_m: f64) -> CollisionSeverity {
        if distance_m > self.config.safe_distance_m {
            CollisionSeverity::Safe
        } else if distance_m > self.config.caution_distance_m {
            CollisionSeverity::Caution
        } else if distance_m > self.config.warning_distance_m {
            CollisionSeverity::Warning
        } else {
            CollisionSeverity::Danger
        }
    }
}
