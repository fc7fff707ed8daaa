//! Loop closure detection

use tracing::info;

use crate::core::config::EngineConfig;
use crate::core::types::GeoPoint;
use crate::geo;

/// Outcome of one closure probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosureCheck {
    /// The path just returned to its origin; validate now
    JustClosed,
    /// Not close enough yet (or not enough points); probe again on the
    /// next accepted fix
    Open,
    /// A previous probe already closed this path
    AlreadyClosed,
}

/// Watches path growth and declares closure when the walk returns near its
/// origin
///
/// Closing is one-shot: the first probe that sees the start-to-end gap at
/// or under the threshold latches, and every later probe reports
/// [`ClosureCheck::AlreadyClosed`] so validation can never run twice for
/// one claim.
#[derive(Debug)]
pub struct ClosureDetector {
    min_points: usize,
    closure_distance_m: f64,
    closed: bool,
}

impl ClosureDetector {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            min_points: config.min_path_points,
            closure_distance_m: config.closure_distance_m,
            closed: false,
        }
    }

    pub fn check(&mut self, path: &[GeoPoint]) -> ClosureCheck {
        if self.closed {
            return ClosureCheck::AlreadyClosed;
        }
        if path.len() < self.min_points {
            return ClosureCheck::Open;
        }

        let gap_m = geo::distance_m(path[0], path[path.len() - 1]);
        if gap_m <= self.closure_distance_m {
            self.closed = true;
            info!(gap_m, points = path.len(), "path closed");
            ClosureCheck::JustClosed
        } else {
            ClosureCheck::Open
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Re-arm for a fresh claim
    pub fn reset(&mut self) {
        self.closed = false;
    }
}
