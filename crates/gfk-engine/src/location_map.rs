//! Derived mapping from monitoring request ids to the locations they stand
//! for.
//!
//! Never persisted: rebuilt from the snapshot (or from the platform's
//! currently-monitored keys) whenever a caller needs to name specific active
//! regions, the `clear_locations` path in particular.

use std::collections::BTreeMap;

use gfk_model::{encode_request_id, GeofenceData, GeofenceLocation, GeofenceMap};

/// Request id -> the location it monitors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocationMap {
    entries: BTreeMap<String, GeofenceLocation>,
}

impl LocationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every monitored region implied by a snapshot: one entry per
    /// (geofence, location) pair.
    pub fn from_snapshot(snapshot: &GeofenceMap) -> Self {
        let mut map = Self::new();
        for fence in snapshot.values() {
            for location in &fence.locations {
                map.insert_location(fence, location);
            }
        }
        map
    }

    /// Add one location under its encoded (geofence id, location id) key.
    pub fn insert_location(&mut self, geofence: &GeofenceData, location: &GeofenceLocation) {
        self.entries.insert(
            encode_request_id(geofence.id, location.id),
            location.clone(),
        );
    }

    /// Add one location under a caller-supplied key. For callers
    /// reconstructing the map from the platform's currently-monitored keys,
    /// which may not all decode cleanly.
    pub fn insert_raw(&mut self, request_id: impl Into<String>, location: GeofenceLocation) {
        self.entries.insert(request_id.into(), location);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, request_id: &str) -> bool {
        self.entries.contains_key(request_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &GeofenceLocation)> {
        self.entries.iter()
    }
}
