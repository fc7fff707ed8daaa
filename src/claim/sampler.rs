//! GPS fix intake: spacing decimation and speed gating

use tracing::{debug, warn};

use crate::core::config::EngineConfig;
use crate::core::types::{GeoFix, GeoPoint};
use crate::geo;

const MPS_TO_KMH: f64 = 3.6;

/// What the sampler did with one raw fix
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleDecision {
    /// Appended to the path
    Accepted {
        /// Set when the hop ran above the soft cap (still accepted)
        advisory: Option<SpeedAdvisory>,
        /// Path is now long enough for closure to be evaluated
        closure_ready: bool,
    },
    /// Dropped: closer than the minimum spacing to the last accepted fix
    TooClose { distance_m: f64 },
    /// Fatal: the hop exceeded the hard speed cap. The caller must stop the
    /// session and discard the path.
    SpeedViolation { speed_kmh: f64 },
}

/// Non-fatal notice that the walker is moving suspiciously fast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedAdvisory {
    pub speed_kmh: f64,
}

/// Consumes raw fixes and maintains the in-progress path
///
/// The path is append-only while a session is active and owned exclusively
/// by that session. Traversal algorithms take a frozen copy via
/// [`PathSampler::snapshot`]; they never iterate the live buffer.
#[derive(Debug)]
pub struct PathSampler {
    config: EngineConfig,
    path: Vec<GeoPoint>,
    last_timestamp: Option<f64>,
    total_distance_m: f64,
    version: u64,
}

impl PathSampler {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            path: Vec::new(),
            last_timestamp: None,
            total_distance_m: 0.0,
            version: 0,
        }
    }

    /// Gate one raw fix and append it if it survives
    ///
    /// Speed is measured against the last *accepted* fix, so a burst of
    /// dropped noise cannot dilute it. A fix whose timestamp does not
    /// advance past the last accepted one skips the speed gate entirely —
    /// a walker is never faulted on a clock artifact.
    pub fn ingest(&mut self, fix: GeoFix) -> SampleDecision {
        let point = fix.point();
        let mut advisory = None;

        if let Some(&last) = self.path.last() {
            let hop_m = geo::distance_m(last, point);

            let elapsed = self
                .last_timestamp
                .map(|t| fix.timestamp_secs - t)
                .filter(|dt| *dt > 0.0);
            if let Some(dt) = elapsed {
                let speed_kmh = hop_m / dt * MPS_TO_KMH;
                if speed_kmh > self.config.hard_speed_cap_kmh {
                    warn!(speed_kmh, hop_m, "hard speed cap exceeded");
                    return SampleDecision::SpeedViolation { speed_kmh };
                }
                if speed_kmh > self.config.soft_speed_cap_kmh {
                    advisory = Some(SpeedAdvisory { speed_kmh });
                }
            }

            if hop_m < self.config.min_point_spacing_m {
                debug!(hop_m, "fix dropped by spacing gate");
                return SampleDecision::TooClose { distance_m: hop_m };
            }

            self.total_distance_m += hop_m;
        }

        self.path.push(point);
        self.last_timestamp = Some(fix.timestamp_secs);
        self.version += 1;

        SampleDecision::Accepted {
            advisory,
            closure_ready: self.path.len() >= self.config.min_path_points,
        }
    }

    /// The live path; valid only until the next mutation
    pub fn path(&self) -> &[GeoPoint] {
        &self.path
    }

    /// Frozen copy for traversal algorithms
    pub fn snapshot(&self) -> Vec<GeoPoint> {
        self.path.clone()
    }

    pub fn latest(&self) -> Option<GeoPoint> {
        self.path.last().copied()
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Sum of accepted hop distances, maintained incrementally for live
    /// progress display
    pub fn total_distance_m(&self) -> f64 {
        self.total_distance_m
    }

    /// Bumped on every acceptance; consumers re-run downstream checks when
    /// it moves. Monotonic across clears.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Discard all in-progress path state
    pub fn clear(&mut self) {
        self.path.clear();
        self.last_timestamp = None;
        self.total_distance_m = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ~1 degree latitude = 111.19 km on the engine sphere; this is 20 m
    const TWENTY_M_DEG: f64 = 20.0 / 111_194.9;

    fn sampler() -> PathSampler {
        PathSampler::new(EngineConfig::default())
    }

    fn fix(steps: f64, t: f64) -> GeoFix {
        GeoFix::new(steps * TWENTY_M_DEG, 0.0, t)
    }

    #[test]
    fn test_first_fix_is_always_accepted() {
        let mut s = sampler();
        let decision = s.ingest(fix(0.0, 0.0));
        assert!(matches!(
            decision,
            SampleDecision::Accepted { advisory: None, closure_ready: false }
        ));
        assert_eq!(s.len(), 1);
        assert_eq!(s.version(), 1);
    }

    #[test]
    fn test_spacing_gate_drops_close_fixes() {
        let mut s = sampler();
        s.ingest(fix(0.0, 0.0));
        // 20 m * 0.3 = 6 m hop, below the 10 m spacing
        let decision = s.ingest(fix(0.3, 30.0));
        assert!(matches!(decision, SampleDecision::TooClose { .. }));
        assert_eq!(s.len(), 1);
        assert_eq!(s.version(), 1, "drops must not bump the version");
    }

    #[test]
    fn test_walking_pace_accumulates_distance() {
        let mut s = sampler();
        s.ingest(fix(0.0, 0.0));
        // 20 m in 15 s = 4.8 km/h
        s.ingest(fix(1.0, 15.0));
        s.ingest(fix(2.0, 30.0));
        assert_eq!(s.len(), 3);
        assert!((s.total_distance_m() - 40.0).abs() < 0.1);
        assert_eq!(s.version(), 3);
    }

    #[test]
    fn test_soft_band_accepts_with_advisory() {
        let mut s = sampler();
        s.ingest(fix(0.0, 0.0));
        // 20 m in 3 s = 24 km/h: above soft (15), below hard (30)
        let decision = s.ingest(fix(1.0, 3.0));
        match decision {
            SampleDecision::Accepted { advisory: Some(a), .. } => {
                assert!((a.speed_kmh - 24.0).abs() < 0.1)
            }
            other => panic!("expected advisory acceptance, got {other:?}"),
        }
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_hard_cap_is_fatal_and_does_not_append() {
        let mut s = sampler();
        s.ingest(fix(0.0, 0.0));
        // 20 m in 1 s = 72 km/h
        let decision = s.ingest(fix(1.0, 1.0));
        assert!(matches!(decision, SampleDecision::SpeedViolation { .. }));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_speed_measured_against_last_accepted_fix() {
        let mut s = sampler();
        s.ingest(fix(0.0, 0.0));
        // dropped noise fix at t=10
        s.ingest(fix(0.1, 10.0));
        // 20 m from the accepted origin in 12 s = 6 km/h, fine
        let decision = s.ingest(fix(1.0, 12.0));
        assert!(matches!(decision, SampleDecision::Accepted { advisory: None, .. }));
    }

    #[test]
    fn test_stale_timestamp_skips_speed_gate() {
        let mut s = sampler();
        s.ingest(fix(0.0, 100.0));
        // timestamp went backwards; hop is 20 m so the spacing gate passes
        let decision = s.ingest(fix(1.0, 90.0));
        assert!(matches!(decision, SampleDecision::Accepted { advisory: None, .. }));
    }

    #[test]
    fn test_closure_ready_once_minimum_points_accepted() {
        let mut s = sampler();
        for i in 0..10 {
            let decision = s.ingest(fix(i as f64, i as f64 * 15.0));
            match decision {
                SampleDecision::Accepted { closure_ready, .. } => {
                    assert_eq!(closure_ready, i == 9, "at point {}", i + 1);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_clear_discards_path_but_keeps_version_monotonic() {
        let mut s = sampler();
        s.ingest(fix(0.0, 0.0));
        s.ingest(fix(1.0, 15.0));
        let version = s.version();
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.total_distance_m(), 0.0);
        assert_eq!(s.version(), version);
        s.ingest(fix(5.0, 200.0));
        assert_eq!(s.version(), version + 1);
    }
}
