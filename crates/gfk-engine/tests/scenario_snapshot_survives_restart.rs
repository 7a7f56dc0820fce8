use gfk_engine::GeofenceEngine;
use gfk_model::GeofenceResponseData;
use gfk_registrar::InMemoryRegistrar;
use gfk_store::FileGeofenceStore;
use gfk_testkit::{geofence, response};

// The persisted snapshot is the single prior-state source of truth across
// process restarts: a fresh engine over the same file continues where the
// previous one left off.
#[test]
fn scenario_snapshot_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geofences.json");

    {
        let store = FileGeofenceStore::new(&path);
        let mut engine = GeofenceEngine::new(InMemoryRegistrar::new(), store);
        let report = engine.process_response(&response(vec![geofence(100, 9_999, &[1])]), 1_000);
        assert!(report.is_clean());
    }

    // "Restart": new engine, new registrar, same file.
    let store = FileGeofenceStore::new(&path);
    let mut engine = GeofenceEngine::new(InMemoryRegistrar::new(), store);
    let report = engine.process_response(&GeofenceResponseData::empty(), 2_000);

    // The previous install's region is known and gets stopped.
    assert_eq!(report.stopped, vec!["fence:100:1".to_string()]);
    assert_eq!(report.persisted_geofences, 0);
}
