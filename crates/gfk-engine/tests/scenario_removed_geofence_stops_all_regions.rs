use gfk_engine::GeofenceEngine;
use gfk_registrar::InMemoryRegistrar;
use gfk_store::{GeofenceStore, InMemoryGeofenceStore};
use gfk_testkit::{geofence, response, snapshot};

#[test]
fn scenario_removed_geofence_stops_all_regions() {
    let store = InMemoryGeofenceStore::with_snapshot(snapshot(vec![
        geofence(100, 9_999, &[1, 2]),
        geofence(200, 9_999, &[7]),
    ]));
    let mut engine = GeofenceEngine::new(InMemoryRegistrar::new(), store);

    // Geofence 100 vanished from the server; 200 survives.
    let report = engine.process_response(&response(vec![geofence(200, 9_999, &[7])]), 1_000);

    assert!(report.is_clean());
    assert_eq!(
        report.stopped,
        vec!["fence:100:1".to_string(), "fence:100:2".to_string()]
    );
    // Survivor is re-registered in full.
    assert_eq!(report.started, vec!["fence:200:7".to_string()]);

    let snapshot = engine.store().load().unwrap();
    assert!(!snapshot.contains_key(&100));
    assert!(snapshot.contains_key(&200));
}
