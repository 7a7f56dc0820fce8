//! File-backed geofence snapshot store.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gfk_model::GeofenceMap;
use tracing::debug;

use crate::atomic::write_atomic;
use crate::GeofenceStore;

/// Keeps the snapshot as one JSON document at a caller-supplied path.
///
/// A missing file loads as the empty map, so a fresh install needs no setup
/// step. Saves go through temp-file + rename, making them atomic with
/// respect to process crash.
#[derive(Clone, Debug)]
pub struct FileGeofenceStore {
    path: PathBuf,
}

impl FileGeofenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GeofenceStore for FileGeofenceStore {
    fn load(&self) -> Result<GeofenceMap> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "geofence snapshot file absent, loading empty map");
            return Ok(GeofenceMap::new());
        }
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("read geofence snapshot {}", self.path.display()))?;
        let map: GeofenceMap = serde_json::from_str(&json)
            .with_context(|| format!("parse geofence snapshot {}", self.path.display()))?;
        debug!(path = %self.path.display(), geofences = map.len(), "loaded geofence snapshot");
        Ok(map)
    }

    fn save(&self, snapshot: &GeofenceMap) -> Result<()> {
        let json = serde_json::to_vec(snapshot).context("serialize geofence snapshot")?;
        write_atomic(&self.path, &json)
            .with_context(|| format!("save geofence snapshot {}", self.path.display()))?;
        debug!(path = %self.path.display(), geofences = snapshot.len(), "saved geofence snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gfk_model::{GeofenceData, GeofenceLocation, TriggerType};

    fn sample_map() -> GeofenceMap {
        let mut map = GeofenceMap::new();
        map.insert(
            100,
            GeofenceData::new(
                100,
                9_999,
                vec![GeofenceLocation::new(
                    1,
                    "office",
                    1.0,
                    1.0,
                    50.0,
                    TriggerType::Both,
                )],
            ),
        );
        map
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileGeofenceStore::new(dir.path().join("geofences.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileGeofenceStore::new(dir.path().join("geofences.json"));
        let map = sample_map();
        store.save(&map).unwrap();
        assert_eq!(store.load().unwrap(), map);
    }

    #[test]
    fn save_replaces_previous_snapshot_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileGeofenceStore::new(dir.path().join("geofences.json"));
        store.save(&sample_map()).unwrap();
        store.save(&GeofenceMap::new()).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geofences.json");
        fs::write(&path, b"{ not json").unwrap();
        let store = FileGeofenceStore::new(&path);
        assert!(store.load().is_err());
    }
}
