//! Conflict checks between the live path and other players' territories

mod engine;

pub use engine::CollisionEngine;

use serde::{Deserialize, Serialize};

use crate::core::types::TerritoryId;

/// Graded proximity to the nearest competitor territory
///
/// Ordered: each tier is strictly more urgent than the one before it.
/// These are advisory only and never change session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CollisionSeverity {
    Safe,
    Caution,
    Warning,
    Danger,
}

/// Terminal conflict with an existing territory
///
/// Not part of the distance ladder and always dominates it: the session
/// layer must halt tracking and discard the in-progress path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionViolation {
    PointInTerritory { territory: TerritoryId },
    PathCrossesTerritory { territory: TerritoryId },
}

/// Outcome of one collision pass over the live path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionResult {
    /// No conflict; severity graded by distance to the nearest competitor
    /// vertex (None when no competitor territory exists)
    Clear {
        severity: CollisionSeverity,
        nearest_m: Option<f64>,
    },
    Violation(CollisionViolation),
}

/// Advisory surfaced to the UI while tracking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionSignal {
    pub severity: CollisionSeverity,
    pub distance_m: Option<f64>,
    pub message: Option<String>,
}

impl CollisionSignal {
    /// Signal for a clear (non-violation) pass
    pub fn clear(severity: CollisionSeverity, distance_m: Option<f64>) -> Self {
        let message = match (severity, distance_m) {
            (CollisionSeverity::Safe, _) => None,
            (CollisionSeverity::Caution, Some(d)) => {
                Some(format!("Approaching claimed land ({d:.0} m)"))
            }
            (CollisionSeverity::Warning, Some(d)) => {
                Some(format!("Close to claimed land ({d:.0} m)"))
            }
            (CollisionSeverity::Danger, Some(d)) => {
                Some(format!("Claimed land right ahead ({d:.0} m)"))
            }
            (_, None) => None,
        };
        Self { severity, distance_m, message }
    }
}
