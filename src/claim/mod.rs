//! The claiming pipeline: sampling, closure detection, validation
//!
//! `PathSampler -> ClosureDetector -> TerritoryValidator`, composed by
//! [`ClaimTracker`]. The tracker owns the only mutable path; collision
//! checks and validation both run on frozen copies of it.

mod closure;
mod sampler;
mod validator;

pub use closure::{ClosureCheck, ClosureDetector};
pub use sampler::{PathSampler, SampleDecision, SpeedAdvisory};
pub use validator::{RejectionReason, TerritoryValidator, ValidationOutcome};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::core::types::{GeoFix, GeoPoint};

/// Lifecycle of one claim attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimPhase {
    Idle,
    Tracking,
    Closed,
    Valid,
    Invalid,
}

/// What one ingested fix did to the claim
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimEvent {
    /// Fix appended; advisory set when the hop was in the soft speed band
    Accepted {
        version: u64,
        advisory: Option<SpeedAdvisory>,
    },
    /// Fix dropped by the spacing gate
    Dropped { distance_m: f64 },
    /// Hard speed cap exceeded; the claim was discarded and the tracker is
    /// idle again
    Aborted { speed_kmh: f64 },
    /// The path closed and validation ran (exactly once per claim)
    Completed(ValidationOutcome),
    /// Fix arrived while no claim was being tracked
    Ignored,
}

/// State machine driving one claim from first fix to outcome
///
/// `Idle -> Tracking -> Closed -> {Valid, Invalid}`. The transition into
/// `Closed` is one-shot; both terminal phases keep the path available for
/// hand-off until [`ClaimTracker::reset`].
#[derive(Debug)]
pub struct ClaimTracker {
    sampler: PathSampler,
    closure: ClosureDetector,
    validator: TerritoryValidator,
    phase: ClaimPhase,
}

impl ClaimTracker {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            sampler: PathSampler::new(config.clone()),
            closure: ClosureDetector::new(&config),
            validator: TerritoryValidator::new(config),
            phase: ClaimPhase::Idle,
        }
    }

    pub fn phase(&self) -> ClaimPhase {
        self.phase
    }

    /// Begin tracking a fresh claim
    pub fn start(&mut self) -> Result<()> {
        if self.phase == ClaimPhase::Tracking || self.phase == ClaimPhase::Closed {
            return Err(EngineError::ClaimInProgress);
        }
        self.wipe();
        self.phase = ClaimPhase::Tracking;
        info!("claim tracking started");
        Ok(())
    }

    /// Feed one raw fix through the pipeline
    pub fn ingest(&mut self, fix: GeoFix) -> ClaimEvent {
        if self.phase != ClaimPhase::Tracking {
            return ClaimEvent::Ignored;
        }

        match self.sampler.ingest(fix) {
            SampleDecision::SpeedViolation { speed_kmh } => {
                warn!(speed_kmh, "claim aborted by speed violation");
                self.wipe();
                self.phase = ClaimPhase::Idle;
                ClaimEvent::Aborted { speed_kmh }
            }
            SampleDecision::TooClose { distance_m } => ClaimEvent::Dropped { distance_m },
            SampleDecision::Accepted { advisory, closure_ready } => {
                if closure_ready {
                    if let ClosureCheck::JustClosed = self.closure.check(self.sampler.path()) {
                        self.phase = ClaimPhase::Closed;
                        let outcome = self.validator.validate(&self.sampler.snapshot());
                        self.phase = if outcome.is_valid() {
                            ClaimPhase::Valid
                        } else {
                            ClaimPhase::Invalid
                        };
                        return ClaimEvent::Completed(outcome);
                    }
                }
                ClaimEvent::Accepted {
                    version: self.sampler.version(),
                    advisory,
                }
            }
        }
    }

    /// Frozen copy of the path for traversal algorithms
    pub fn path_snapshot(&self) -> Vec<GeoPoint> {
        self.sampler.snapshot()
    }

    pub fn latest_point(&self) -> Option<GeoPoint> {
        self.sampler.latest()
    }

    pub fn point_count(&self) -> usize {
        self.sampler.len()
    }

    pub fn walked_m(&self) -> f64 {
        self.sampler.total_distance_m()
    }

    pub fn version(&self) -> u64 {
        self.sampler.version()
    }

    /// Discard the claim and return to idle; nothing survives into the
    /// next session
    pub fn reset(&mut self) {
        self.wipe();
        self.phase = ClaimPhase::Idle;
    }

    fn wipe(&mut self) {
        self.sampler.clear();
        self.closure.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METERS_PER_DEG: f64 = std::f64::consts::PI * crate::geo::EARTH_RADIUS_M / 180.0;

    fn offset(origin: GeoPoint, east_m: f64, north_m: f64) -> GeoPoint {
        GeoPoint::new(
            origin.latitude + north_m / METERS_PER_DEG,
            origin.longitude + east_m / (METERS_PER_DEG * origin.latitude.to_radians().cos()),
        )
    }

    /// Walk a 50 m square at ~5 km/h: 16 fixes, 12.5 m and 9 s apart
    fn square_fixes() -> Vec<GeoFix> {
        let origin = GeoPoint::new(0.005, 0.005);
        let legs = [(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)];
        let mut fixes = Vec::new();
        let mut t = 0.0;
        let (mut east, mut north) = (0.0, 0.0);
        for (de, dn) in legs {
            for _ in 0..4 {
                let p = offset(origin, east, north);
                fixes.push(GeoFix::new(p.latitude, p.longitude, t));
                t += 9.0;
                east += de * 12.5;
                north += dn * 12.5;
            }
        }
        fixes
    }

    #[test]
    fn test_full_walk_produces_valid_claim() {
        let mut tracker = ClaimTracker::new(EngineConfig::default());
        tracker.start().unwrap();

        let fixes = square_fixes();
        let mut completed = None;
        for fix in fixes {
            if let ClaimEvent::Completed(outcome) = tracker.ingest(fix) {
                completed = Some(outcome);
            }
        }

        match completed {
            Some(ValidationOutcome::Valid { area_m2, point_count, .. }) => {
                assert!((area_m2 - 2500.0).abs() < 125.0);
                // the walk closes on the 15th point, 25 m from the origin
                assert_eq!(point_count, 15);
            }
            other => panic!("expected a valid claim, got {other:?}"),
        }
        assert_eq!(tracker.phase(), ClaimPhase::Valid);
    }

    #[test]
    fn test_fixes_ignored_while_idle() {
        let mut tracker = ClaimTracker::new(EngineConfig::default());
        let event = tracker.ingest(GeoFix::new(0.0, 0.0, 0.0));
        assert_eq!(event, ClaimEvent::Ignored);
    }

    #[test]
    fn test_cannot_start_while_tracking() {
        let mut tracker = ClaimTracker::new(EngineConfig::default());
        tracker.start().unwrap();
        assert!(matches!(tracker.start(), Err(EngineError::ClaimInProgress)));
    }

    #[test]
    fn test_speed_violation_truncates_to_idle() {
        let mut tracker = ClaimTracker::new(EngineConfig::default());
        tracker.start().unwrap();
        tracker.ingest(GeoFix::new(0.0, 0.0, 0.0));
        // 111 km hop in 10 s
        let event = tracker.ingest(GeoFix::new(1.0, 0.0, 10.0));
        assert!(matches!(event, ClaimEvent::Aborted { .. }));
        assert_eq!(tracker.phase(), ClaimPhase::Idle);
        assert_eq!(tracker.point_count(), 0);
        // and the tracker stays inert until restarted
        assert_eq!(tracker.ingest(GeoFix::new(0.0, 0.0, 20.0)), ClaimEvent::Ignored);
    }

    #[test]
    fn test_no_revalidation_after_terminal_phase() {
        let mut tracker = ClaimTracker::new(EngineConfig::default());
        tracker.start().unwrap();
        for fix in square_fixes() {
            tracker.ingest(fix);
        }
        assert_eq!(tracker.phase(), ClaimPhase::Valid);
        // more fixes near the origin would re-trigger closure if the latch
        // were broken
        let event = tracker.ingest(GeoFix::new(0.005, 0.005, 1000.0));
        assert_eq!(event, ClaimEvent::Ignored);
        assert_eq!(tracker.phase(), ClaimPhase::Valid);
    }

    #[test]
    fn test_reset_allows_fresh_claim() {
        let mut tracker = ClaimTracker::new(EngineConfig::default());
        tracker.start().unwrap();
        for fix in square_fixes() {
            tracker.ingest(fix);
        }
        tracker.reset();
        assert_eq!(tracker.phase(), ClaimPhase::Idle);
        assert_eq!(tracker.point_count(), 0);
        tracker.start().unwrap();
        assert_eq!(tracker.phase(), ClaimPhase::Tracking);
    }
}
