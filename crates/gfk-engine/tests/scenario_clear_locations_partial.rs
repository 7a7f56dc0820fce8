use gfk_engine::{GeofenceEngine, LocationMap};
use gfk_registrar::InMemoryRegistrar;
use gfk_store::{GeofenceStore, InMemoryGeofenceStore};
use gfk_testkit::{geofence, location, snapshot};

#[test]
fn scenario_clear_one_location_leaves_the_rest() {
    let store = InMemoryGeofenceStore::with_snapshot(snapshot(vec![geofence(100, 9_999, &[1, 2])]));
    let mut engine = GeofenceEngine::new(InMemoryRegistrar::new(), store);

    let mut to_clear = LocationMap::new();
    to_clear.insert_location(&geofence(100, 9_999, &[1, 2]), &location(1));

    let report = engine.clear_locations(&to_clear);

    assert!(report.is_clean());
    assert_eq!(report.stopped, vec!["fence:100:1".to_string()]);
    assert_eq!(engine.registrar().stop_calls_for("fence:100:1"), 1);
    assert_eq!(engine.registrar().stop_calls_for("fence:100:2"), 0);

    let remaining = engine.store().load().unwrap();
    assert!(remaining.contains_key(&100));
    let ids: Vec<i64> = remaining[&100].locations.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![2]);
}

#[test]
fn scenario_clear_last_location_drops_the_geofence() {
    let store = InMemoryGeofenceStore::with_snapshot(snapshot(vec![geofence(100, 9_999, &[1])]));
    let mut engine = GeofenceEngine::new(InMemoryRegistrar::new(), store);

    let mut to_clear = LocationMap::new();
    to_clear.insert_location(&geofence(100, 9_999, &[1]), &location(1));

    engine.clear_locations(&to_clear);

    assert!(engine.store().load().unwrap().is_empty());
}

#[test]
fn scenario_clear_everything_from_snapshot_derived_map() {
    let stored = snapshot(vec![geofence(100, 9_999, &[1, 2]), geofence(200, 9_999, &[3])]);
    let store = InMemoryGeofenceStore::with_snapshot(stored.clone());
    let mut engine = GeofenceEngine::new(InMemoryRegistrar::new(), store);

    let report = engine.clear_locations(&LocationMap::from_snapshot(&stored));

    assert_eq!(report.stopped.len(), 3);
    assert!(engine.store().load().unwrap().is_empty());
}
