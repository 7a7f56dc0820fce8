//! In-memory geofence snapshot store.

use std::sync::Mutex;

use anyhow::Result;
use gfk_model::GeofenceMap;

use crate::GeofenceStore;

/// Deterministic in-memory store double.
///
/// Used by scenario tests and by embedders that manage durability
/// themselves. `load` clones the current map so callers get the same
/// load/mutate/save discipline the file store imposes.
#[derive(Debug, Default)]
pub struct InMemoryGeofenceStore {
    map: Mutex<GeofenceMap>,
}

impl InMemoryGeofenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an existing snapshot (test setup).
    pub fn with_snapshot(map: GeofenceMap) -> Self {
        Self {
            map: Mutex::new(map),
        }
    }

    /// Current snapshot contents (test assertions).
    pub fn snapshot(&self) -> GeofenceMap {
        self.map.lock().expect("store mutex poisoned").clone()
    }
}

impl GeofenceStore for InMemoryGeofenceStore {
    fn load(&self) -> Result<GeofenceMap> {
        Ok(self.snapshot())
    }

    fn save(&self, snapshot: &GeofenceMap) -> Result<()> {
        *self.map.lock().expect("store mutex poisoned") = snapshot.clone();
        Ok(())
    }
}
