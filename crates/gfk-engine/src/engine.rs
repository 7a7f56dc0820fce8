use std::collections::{BTreeMap, BTreeSet};

use gfk_model::{
    decode_request_id, encode_request_id, is_expired, GeofenceMap, GeofenceResponseData,
};
use gfk_registrar::{region_for_location, GeofenceRegistrar, MonitoredRegion};
use gfk_store::GeofenceStore;
use tracing::{debug, warn};

use crate::{EngineWarning, LocationMap, ReconcileReport};

/// Reconciles server geofence payloads against the persisted snapshot and
/// drives the monitoring registrar accordingly.
///
/// Both adapters are injected at construction; the engine keeps no other
/// state. Operations run to completion synchronously. Callers with
/// asynchronous adapters must invoke the engine from a serialized context so
/// two reconciliations never interleave load/save cycles against the same
/// snapshot.
pub struct GeofenceEngine<R: GeofenceRegistrar, S: GeofenceStore> {
    registrar: R,
    store: S,
}

impl<R: GeofenceRegistrar, S: GeofenceStore> GeofenceEngine<R, S> {
    pub fn new(registrar: R, store: S) -> Self {
        Self { registrar, store }
    }

    pub fn registrar(&self) -> &R {
        &self.registrar
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn load_or_empty(&self, warnings: &mut Vec<EngineWarning>) -> GeofenceMap {
        match self.store.load() {
            Ok(map) => map,
            Err(e) => {
                warn!(error = %e, "snapshot load failed, reconciling from empty snapshot");
                warnings.push(EngineWarning::StoreLoadFailed {
                    reason: e.to_string(),
                });
                GeofenceMap::new()
            }
        }
    }

    fn save_or_warn(&self, snapshot: &GeofenceMap, warnings: &mut Vec<EngineWarning>) {
        if let Err(e) = self.store.save(snapshot) {
            warn!(error = %e, "snapshot save failed, monitored set may diverge until next sync");
            warnings.push(EngineWarning::StoreSaveFailed {
                reason: e.to_string(),
            });
        }
    }

    /// Reconcile one server response against the persisted snapshot.
    ///
    /// The response is authoritative: geofences absent from it are stopped
    /// and dropped, geofences expired at `timestamp_ms` (boundary
    /// inclusive) are stopped and never persisted, and every surviving
    /// geofence is persisted wholesale and re-registered in full. Stops are
    /// issued before starts.
    pub fn process_response(
        &mut self,
        response: &GeofenceResponseData,
        timestamp_ms: i64,
    ) -> ReconcileReport {
        let mut warnings: Vec<EngineWarning> = Vec::new();
        let current = self.load_or_empty(&mut warnings);
        let mut working = current.clone();

        let mut to_stop: BTreeSet<String> = BTreeSet::new();
        let mut to_start: BTreeMap<String, MonitoredRegion> = BTreeMap::new();
        let mut expired_ids: Vec<i64> = Vec::new();

        // Stored geofences the server no longer knows about.
        for (id, fence) in &current {
            if !response.geofences.contains_key(id) {
                for location in &fence.locations {
                    to_stop.insert(encode_request_id(*id, location.id));
                }
                working.remove(id);
            }
        }

        for (id, fence) in &response.geofences {
            if is_expired(fence, timestamp_ms) {
                // Stop both the received shape and the stored shape: the
                // stored one is what is actually monitored, and the two can
                // name different location ids.
                for location in &fence.locations {
                    to_stop.insert(encode_request_id(*id, location.id));
                }
                if let Some(stored) = current.get(id) {
                    for location in &stored.locations {
                        to_stop.insert(encode_request_id(*id, location.id));
                    }
                }
                working.remove(id);
                expired_ids.push(*id);
            } else {
                for location in &fence.locations {
                    let request_id = encode_request_id(*id, location.id);
                    to_start.insert(
                        request_id.clone(),
                        region_for_location(request_id, location),
                    );
                }
                working.insert(*id, fence.clone());
            }
        }

        // Stops before starts: never hold a transient double registration
        // against the platform subsystem.
        for request_id in &to_stop {
            self.registrar.stop_monitoring(request_id);
        }
        for region in to_start.values() {
            self.registrar.start_monitoring(region);
        }

        self.save_or_warn(&working, &mut warnings);

        debug!(
            stopped = to_stop.len(),
            started = to_start.len(),
            expired = expired_ids.len(),
            persisted = working.len(),
            "processed geofence response"
        );

        ReconcileReport {
            started: to_start.into_keys().collect(),
            stopped: to_stop.into_iter().collect(),
            expired_geofence_ids: expired_ids,
            persisted_geofences: working.len(),
            warnings,
        }
    }

    /// Stop monitoring a caller-supplied set of regions and remove them from
    /// the persisted snapshot.
    ///
    /// Driven externally (e.g. the monitoring capability was revoked); no
    /// timestamp and no server response involved. A geofence left with zero
    /// locations is dropped entirely. A request id that does not decode is
    /// still stopped (the platform keys regions by the opaque string), but
    /// its snapshot entry cannot be found, so it is reported and skipped.
    pub fn clear_locations(&mut self, locations: &LocationMap) -> ReconcileReport {
        let mut warnings: Vec<EngineWarning> = Vec::new();
        let current = self.load_or_empty(&mut warnings);
        let mut working = current;
        let mut stopped: Vec<String> = Vec::new();

        for (request_id, _location) in locations.iter() {
            self.registrar.stop_monitoring(request_id);
            stopped.push(request_id.clone());

            match decode_request_id(request_id) {
                Ok((geofence_id, location_id)) => {
                    let emptied = match working.get_mut(&geofence_id) {
                        Some(fence) => {
                            fence.locations.retain(|l| l.id != location_id);
                            fence.locations.is_empty()
                        }
                        None => false,
                    };
                    if emptied {
                        working.remove(&geofence_id);
                    }
                }
                Err(error) => {
                    warn!(request_id = %request_id, %error, "skipping malformed request id in clear");
                    warnings.push(EngineWarning::MalformedRequestId {
                        request_id: request_id.clone(),
                        error,
                    });
                }
            }
        }

        self.save_or_warn(&working, &mut warnings);

        debug!(
            stopped = stopped.len(),
            persisted = working.len(),
            "cleared monitored locations"
        );

        ReconcileReport {
            started: Vec::new(),
            stopped,
            expired_geofence_ids: Vec::new(),
            persisted_geofences: working.len(),
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gfk_model::{GeofenceData, GeofenceLocation, TriggerType};
    use gfk_registrar::InMemoryRegistrar;
    use gfk_store::{GeofenceStore, InMemoryGeofenceStore};

    fn fence(id: i64, expiry_ms: i64, location_ids: &[i64]) -> GeofenceData {
        GeofenceData::new(
            id,
            expiry_ms,
            location_ids
                .iter()
                .map(|l| GeofenceLocation::new(*l, "", 1.0, 1.0, 50.0, TriggerType::Both))
                .collect(),
        )
    }

    fn engine_with(
        stored: Vec<GeofenceData>,
    ) -> GeofenceEngine<InMemoryRegistrar, InMemoryGeofenceStore> {
        let store = InMemoryGeofenceStore::with_snapshot(
            stored.into_iter().map(|g| (g.id, g)).collect(),
        );
        GeofenceEngine::new(InMemoryRegistrar::new(), store)
    }

    #[test]
    fn stops_are_issued_before_starts() {
        let mut engine = engine_with(vec![fence(1, 9_999, &[1])]);
        let response = GeofenceResponseData::with_geofences(vec![fence(2, 9_999, &[1])]);
        engine.process_response(&response, 100);

        let calls = engine.registrar().calls();
        let first_start = calls
            .iter()
            .position(|c| matches!(c, gfk_registrar::RegistrarCall::Start(_)))
            .unwrap();
        let last_stop = calls
            .iter()
            .rposition(|c| matches!(c, gfk_registrar::RegistrarCall::Stop(_)))
            .unwrap();
        assert!(last_stop < first_start);
    }

    #[test]
    fn report_lists_are_sorted() {
        let mut engine = engine_with(vec![]);
        let response =
            GeofenceResponseData::with_geofences(vec![fence(10, 9_999, &[2, 1]), fence(2, 9_999, &[5])]);
        let report = engine.process_response(&response, 100);
        let mut sorted = report.started.clone();
        sorted.sort();
        assert_eq!(report.started, sorted);
        assert_eq!(report.started.len(), 3);
    }

    #[test]
    fn expired_geofence_stored_shape_is_stopped_too() {
        // Stored fence 5 monitors locations {1, 2}; the update arrives
        // already expired and names only location 3. All three must stop.
        let mut engine = engine_with(vec![fence(5, 9_999, &[1, 2])]);
        let response = GeofenceResponseData::with_geofences(vec![fence(5, 50, &[3])]);
        let report = engine.process_response(&response, 100);

        assert_eq!(
            report.stopped,
            vec![
                "fence:5:1".to_string(),
                "fence:5:2".to_string(),
                "fence:5:3".to_string(),
            ]
        );
        assert_eq!(report.expired_geofence_ids, vec![5]);
        assert!(engine.store().load().unwrap().is_empty());
    }

    #[test]
    fn zero_location_geofence_is_persisted_but_monitors_nothing() {
        let mut engine = engine_with(vec![]);
        let response = GeofenceResponseData::with_geofences(vec![fence(7, 9_999, &[])]);
        let report = engine.process_response(&response, 100);

        assert!(report.started.is_empty());
        assert!(report.stopped.is_empty());
        assert_eq!(report.persisted_geofences, 1);
        assert!(engine.store().load().unwrap().contains_key(&7));
    }

    #[test]
    fn clear_with_malformed_id_still_stops_and_reports() {
        let mut engine = engine_with(vec![fence(1, 9_999, &[1])]);
        let mut to_clear = LocationMap::new();
        to_clear.insert_raw(
            "not-a-fence-id",
            GeofenceLocation::new(1, "", 1.0, 1.0, 50.0, TriggerType::Both),
        );
        let report = engine.clear_locations(&to_clear);

        assert_eq!(report.stopped, vec!["not-a-fence-id".to_string()]);
        assert!(matches!(
            report.warnings.as_slice(),
            [EngineWarning::MalformedRequestId { .. }]
        ));
        // Snapshot untouched: the malformed entry named nothing in it.
        assert_eq!(engine.store().load().unwrap().len(), 1);
    }

    #[test]
    fn clear_unknown_but_well_formed_id_is_silent() {
        let mut engine = engine_with(vec![fence(1, 9_999, &[1])]);
        let mut to_clear = LocationMap::new();
        to_clear.insert_raw(
            "fence:99:99",
            GeofenceLocation::new(99, "", 1.0, 1.0, 50.0, TriggerType::Both),
        );
        let report = engine.clear_locations(&to_clear);
        assert!(report.is_clean());
        assert_eq!(engine.store().load().unwrap().len(), 1);
    }
}
