//! Core type definitions used throughout the engine

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for territories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerritoryId(pub Uuid);

impl TerritoryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TerritoryId {
    fn default() -> Self {
        Self::new()
    }
}

/// Opaque player identifier
///
/// Identifiers come from mixed upstream sources (auth tokens, store rows),
/// so ownership comparisons ignore ASCII case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Case-insensitive identity check used for every owner-vs-self comparison
    pub fn same_player(&self, other: &PlayerId) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

/// A raw GPS coordinate in degrees (WGS-84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// A raw fix from the platform location service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Seconds since the Unix epoch, as reported by the device
    pub timestamp_secs: f64,
}

impl GeoFix {
    pub fn new(latitude: f64, longitude: f64, timestamp_secs: f64) -> Self {
        Self { latitude, longitude, timestamp_secs }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}
