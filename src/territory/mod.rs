//! Player-owned land parcels and the read-only snapshot the engine checks against

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};
use crate::core::types::{GeoPoint, PlayerId, TerritoryId};

/// Minimum distinct ring vertices for a well-formed territory
pub const MIN_RING_VERTICES: usize = 3;

/// An owned land parcel
///
/// Immutable once constructed. The authoritative, mutable copy lives in the
/// remote store; what reaches the engine is a snapshot that stays read-only
/// for the duration of a check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Territory {
    id: TerritoryId,
    owner: PlayerId,
    ring: Vec<GeoPoint>,
    area_m2: f64,
}

impl Territory {
    /// Build a territory, rejecting degenerate rings
    ///
    /// A trailing vertex equal to the first is dropped — the ring wraps
    /// implicitly everywhere in the engine.
    pub fn new(
        id: TerritoryId,
        owner: PlayerId,
        mut ring: Vec<GeoPoint>,
        area_m2: f64,
    ) -> Result<Self> {
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }

        let distinct = distinct_vertices(&ring);
        if distinct < MIN_RING_VERTICES {
            return Err(EngineError::DegenerateRing {
                count: distinct,
                minimum: MIN_RING_VERTICES,
            });
        }

        Ok(Self { id, owner, ring, area_m2 })
    }

    pub fn id(&self) -> TerritoryId {
        self.id
    }

    pub fn owner(&self) -> &PlayerId {
        &self.owner
    }

    /// Boundary vertices in ring order; the last wraps to the first
    pub fn ring(&self) -> &[GeoPoint] {
        &self.ring
    }

    pub fn area_m2(&self) -> f64 {
        self.area_m2
    }

    pub fn is_owned_by(&self, player: &PlayerId) -> bool {
        self.owner.same_player(player)
    }
}

fn distinct_vertices(ring: &[GeoPoint]) -> usize {
    // Rings are a handful of vertices; the quadratic scan is fine and
    // avoids hashing floats
    let mut distinct = 0;
    for (i, a) in ring.iter().enumerate() {
        if ring[..i].iter().all(|b| b != a) {
            distinct += 1;
        }
    }
    distinct
}

/// Read-only, insertion-ordered collection of territories for collision checks
///
/// Duplicate ids replace the earlier entry in place, so a periodic refresh
/// from the store cannot produce double counting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Territory>", into = "Vec<Territory>")]
pub struct TerritorySnapshot {
    territories: Vec<Territory>,
    by_id: AHashMap<TerritoryId, usize>,
}

impl TerritorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a territory, preserving insertion order
    pub fn insert(&mut self, territory: Territory) {
        match self.by_id.get(&territory.id()) {
            Some(&slot) => self.territories[slot] = territory,
            None => {
                self.by_id.insert(territory.id(), self.territories.len());
                self.territories.push(territory);
            }
        }
    }

    pub fn get(&self, id: TerritoryId) -> Option<&Territory> {
        self.by_id.get(&id).map(|&slot| &self.territories[slot])
    }

    pub fn len(&self) -> usize {
        self.territories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.territories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Territory> {
        self.territories.iter()
    }

    /// Territories owned by anyone but `player` (case-insensitive)
    ///
    /// This is the set every collision check runs against; a player never
    /// collides with their own land.
    pub fn competitors_of<'a>(&'a self, player: &'a PlayerId) -> impl Iterator<Item = &'a Territory> {
        self.territories.iter().filter(move |t| !t.is_owned_by(player))
    }
}

impl From<Vec<Territory>> for TerritorySnapshot {
    fn from(territories: Vec<Territory>) -> Self {
        let mut snapshot = Self::new();
        for territory in territories {
            snapshot.insert(territory);
        }
        snapshot
    }
}

impl From<TerritorySnapshot> for Vec<Territory> {
    fn from(snapshot: TerritorySnapshot) -> Self {
        snapshot.territories
    }
}
