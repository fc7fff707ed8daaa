//! Accept/reject decision for a closed claim

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::config::EngineConfig;
use crate::core::types::GeoPoint;
use crate::geo;

/// Why a closed path was rejected
///
/// All of these are retryable: the session layer may reset the claim and
/// let the walker try another loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RejectionReason {
    InsufficientPoints { count: usize, minimum: usize },
    InsufficientDistance { walked_m: f64, minimum_m: f64 },
    SelfIntersecting,
    InsufficientArea { area_m2: f64, minimum_m2: f64 },
}

/// Result of validating one closed path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationOutcome {
    Valid {
        area_m2: f64,
        point_count: usize,
        total_distance_m: f64,
    },
    Invalid {
        reason: RejectionReason,
    },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid { .. })
    }
}

/// Runs the claim checks over a closed path
///
/// Checks run in a fixed order, stopping at the first failure: point
/// count, walked distance, self-intersection, enclosed area. The order is
/// cost-ordered on purpose — the quadratic intersection scan only runs on
/// paths that already cleared the cheap gates.
#[derive(Debug, Clone)]
pub struct TerritoryValidator {
    config: EngineConfig,
}

impl TerritoryValidator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Validate a frozen copy of the closed path
    pub fn validate(&self, path: &[GeoPoint]) -> ValidationOutcome {
        if path.len() < self.config.min_path_points {
            return ValidationOutcome::Invalid {
                reason: RejectionReason::InsufficientPoints {
                    count: path.len(),
                    minimum: self.config.min_path_points,
                },
            };
        }

        let walked_m: f64 = path.windows(2).map(|w| geo::distance_m(w[0], w[1])).sum();
        if walked_m < self.config.min_total_distance_m {
            return ValidationOutcome::Invalid {
                reason: RejectionReason::InsufficientDistance {
                    walked_m,
                    minimum_m: self.config.min_total_distance_m,
                },
            };
        }

        if geo::is_self_intersecting(path, self.config.closure_skip_segments) {
            return ValidationOutcome::Invalid {
                reason: RejectionReason::SelfIntersecting,
            };
        }

        let area_m2 = geo::ring_area_m2(path);
        if area_m2 < self.config.min_enclosed_area_m2 {
            return ValidationOutcome::Invalid {
                reason: RejectionReason::InsufficientArea {
                    area_m2,
                    minimum_m2: self.config.min_enclosed_area_m2,
                },
            };
        }

        info!(area_m2, points = path.len(), walked_m, "claim validated");
        ValidationOutcome::Valid {
            area_m2,
            point_count: path.len(),
            total_distance_m: walked_m,
        }
    }
}
