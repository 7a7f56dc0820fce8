//! gfk-registrar
//!
//! Adapter seam between the reconciliation engine and the platform
//! region-monitoring primitive.
//!
//! The engine only needs two idempotent operations: start watching a
//! circular region under an opaque key, and stop watching a key. Both are
//! fire-and-forget from the engine's perspective. An implementation
//! translates them into platform calls and logs its own failures rather
//! than surfacing them through the engine's result.
//!
//! Two implementations:
//! - [`TracingRegistrar`] — logs every call; stand-in for a platform binding.
//! - [`InMemoryRegistrar`] — deterministic recorder for scenario tests.

use std::collections::BTreeMap;

use gfk_model::{GeofenceLocation, TriggerType};
use tracing::info;

// ---------------------------------------------------------------------------
// Platform-facing region shape
// ---------------------------------------------------------------------------

/// A fully resolved region as the monitoring platform sees it: the opaque
/// request id plus the circle and trigger it stands for.
#[derive(Clone, Debug, PartialEq)]
pub struct MonitoredRegion {
    pub request_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
    pub trigger: TriggerType,
}

/// Resolve a geofence location into the platform region shape, keyed by the
/// given request id.
pub fn region_for_location(
    request_id: impl Into<String>,
    location: &GeofenceLocation,
) -> MonitoredRegion {
    MonitoredRegion {
        request_id: request_id.into(),
        latitude: location.latitude,
        longitude: location.longitude,
        radius_m: location.radius_m,
        trigger: location.trigger,
    }
}

// ---------------------------------------------------------------------------
// GeofenceRegistrar trait (the engine's outbound seam)
// ---------------------------------------------------------------------------

/// Start/stop watching circular regions.
///
/// Both operations are idempotent: starting an already watched region
/// replaces it (no duplicate monitoring state), and stopping an unwatched
/// region is a no-op, not an error. Implementations report failures via
/// logging only; the engine's contract is best-effort orchestration, and a
/// diverged monitored set self-heals on the next reconciliation's full
/// re-register.
pub trait GeofenceRegistrar {
    fn start_monitoring(&mut self, region: &MonitoredRegion);
    fn stop_monitoring(&mut self, request_id: &str);
}

// ---------------------------------------------------------------------------
// TracingRegistrar
// ---------------------------------------------------------------------------

/// Registrar that only logs. Useful as the platform-binding stand-in in
/// deployments where the host application wires up monitoring itself.
#[derive(Clone, Debug, Default)]
pub struct TracingRegistrar;

impl GeofenceRegistrar for TracingRegistrar {
    fn start_monitoring(&mut self, region: &MonitoredRegion) {
        info!(
            request_id = %region.request_id,
            latitude = region.latitude,
            longitude = region.longitude,
            radius_m = region.radius_m,
            trigger = ?region.trigger,
            "start monitoring region"
        );
    }

    fn stop_monitoring(&mut self, request_id: &str) {
        info!(request_id, "stop monitoring region");
    }
}

// ---------------------------------------------------------------------------
// InMemoryRegistrar
// ---------------------------------------------------------------------------

/// One observed registrar call, in issue order.
#[derive(Clone, Debug, PartialEq)]
pub enum RegistrarCall {
    Start(String),
    Stop(String),
}

/// Deterministic in-memory registrar.
///
/// Keeps the currently monitored set (what an idempotent platform would end
/// up watching) and an append-only call log (what the engine actually
/// issued), so tests can assert both the final state and the exact calls.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRegistrar {
    monitored: BTreeMap<String, MonitoredRegion>,
    calls: Vec<RegistrarCall>,
}

impl InMemoryRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently monitored regions, keyed by request id.
    pub fn monitored(&self) -> &BTreeMap<String, MonitoredRegion> {
        &self.monitored
    }

    /// Request ids of the currently monitored set, in key order.
    pub fn monitored_ids(&self) -> Vec<String> {
        self.monitored.keys().cloned().collect()
    }

    /// Every call issued so far, in order.
    pub fn calls(&self) -> &[RegistrarCall] {
        &self.calls
    }

    pub fn stop_calls_for(&self, request_id: &str) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RegistrarCall::Stop(id) if id == request_id))
            .count()
    }

    pub fn start_calls_for(&self, request_id: &str) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RegistrarCall::Start(id) if id == request_id))
            .count()
    }
}

impl GeofenceRegistrar for InMemoryRegistrar {
    fn start_monitoring(&mut self, region: &MonitoredRegion) {
        self.calls
            .push(RegistrarCall::Start(region.request_id.clone()));
        // Insert replaces: starting the same id twice leaves one entry.
        self.monitored
            .insert(region.request_id.clone(), region.clone());
    }

    fn stop_monitoring(&mut self, request_id: &str) {
        self.calls.push(RegistrarCall::Stop(request_id.to_string()));
        self.monitored.remove(request_id);
    }
}
