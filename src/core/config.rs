//! Engine configuration with documented constants
//!
//! All tuning values for the claim pipeline and the collision engine are
//! collected here with explanations of their purpose and how they interact
//! with each other.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::core::error::{EngineError, Result};

/// Configuration for the claiming pipeline and collision engine
///
/// Defaults reproduce the shipped game balance. The walking thresholds were
/// tuned together: spacing bounds path growth, the closure threshold must
/// stay comfortably above spacing so a returning walker can actually close,
/// and the speed caps separate brisk walking from vehicles.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === PATH SAMPLING ===
    /// Minimum distance between accepted fixes (meters)
    ///
    /// Fixes closer than this to the last accepted point are dropped
    /// silently. Bounds path growth and filters stationary GPS noise.
    pub min_point_spacing_m: f64,

    /// Soft speed cap (km/h)
    ///
    /// Hops faster than this but within the hard cap are accepted with a
    /// non-fatal advisory. Covers jogging and short sprints.
    pub soft_speed_cap_kmh: f64,

    /// Hard speed cap (km/h)
    ///
    /// A hop above this terminates the session and discards the path.
    /// Nobody walks at 30 km/h; this is the anti-vehicle gate.
    pub hard_speed_cap_kmh: f64,

    // === CLAIM VALIDATION ===
    /// Minimum accepted points for a claimable loop
    ///
    /// With 10 m spacing this also implies a minimum perimeter, but the
    /// distance check below is enforced separately.
    pub min_path_points: usize,

    /// Minimum total walked distance (meters)
    pub min_total_distance_m: f64,

    /// Minimum enclosed area (square meters)
    ///
    /// Rejects degenerate slivers that technically close but enclose
    /// nothing worth owning.
    pub min_enclosed_area_m2: f64,

    /// Maximum start-to-end distance for the loop to count as closed
    /// (meters, inclusive)
    ///
    /// Must be larger than min_point_spacing_m, otherwise the final
    /// closing fix would be dropped before the closure probe sees it.
    pub closure_distance_m: f64,

    /// Segments ignored at each end of the self-intersection scan
    ///
    /// The head and tail of a closed loop sit within closure_distance_m of
    /// each other and would otherwise false-positive.
    pub closure_skip_segments: usize,

    // === COLLISION ===
    /// Seconds between collision passes over the live path
    ///
    /// The pass is linear in the snapshot size, so it runs on a timer
    /// rather than on every accepted fix.
    pub collision_check_interval_secs: u64,

    /// Beyond this distance to the nearest competitor vertex the walker is
    /// Safe (meters)
    pub safe_distance_m: f64,

    /// Beyond this distance (and within safe) the tier is Caution (meters)
    pub caution_distance_m: f64,

    /// Beyond this distance (and within caution) the tier is Warning;
    /// at or below it, Danger (meters)
    pub warning_distance_m: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Sampling
            min_point_spacing_m: 10.0,
            soft_speed_cap_kmh: 15.0,
            hard_speed_cap_kmh: 30.0,

            // Validation
            min_path_points: 10,
            min_total_distance_m: 50.0,
            min_enclosed_area_m2: 100.0,
            closure_distance_m: 30.0,
            closure_skip_segments: 2,

            // Collision
            collision_check_interval_secs: 10,
            safe_distance_m: 100.0,
            caution_distance_m: 50.0,
            warning_distance_m: 25.0,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Collision pass cadence as a Duration
    pub fn collision_interval(&self) -> Duration {
        Duration::from_secs(self.collision_check_interval_secs)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.closure_distance_m <= self.min_point_spacing_m {
            return Err(EngineError::InvalidConfig(format!(
                "closure_distance_m ({}) must exceed min_point_spacing_m ({})",
                self.closure_distance_m, self.min_point_spacing_m
            )));
        }

        if self.soft_speed_cap_kmh >= self.hard_speed_cap_kmh {
            return Err(EngineError::InvalidConfig(format!(
                "soft_speed_cap_kmh ({}) must be below hard_speed_cap_kmh ({})",
                self.soft_speed_cap_kmh, self.hard_speed_cap_kmh
            )));
        }

        if self.safe_distance_m <= self.caution_distance_m
            || self.caution_distance_m <= self.warning_distance_m
        {
            return Err(EngineError::InvalidConfig(format!(
                "proximity tiers must descend strictly: {} > {} > {}",
                self.safe_distance_m, self.caution_distance_m, self.warning_distance_m
            )));
        }

        if self.min_path_points < 3 {
            return Err(EngineError::InvalidConfig(
                "min_path_points must be at least 3 to enclose anything".into(),
            ));
        }

        if self.collision_check_interval_secs == 0 {
            return Err(EngineError::InvalidConfig(
                "collision_check_interval_secs must be positive".into(),
            ));
        }

        Ok(())
    }

    /// Parse a config from TOML, validating the result
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config override file from disk
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
