//! gfk-engine
//!
//! The geofence reconciliation engine.
//!
//! Three sources of truth must agree after every sync: the server's latest
//! geofence payload, the persisted snapshot, and the set of regions the
//! platform is actually monitoring. This crate computes the full state
//! transition between them (which regions to stop, which to start, and the
//! new snapshot to persist) and drives the injected store and registrar
//! adapters accordingly.
//!
//! Architectural decisions:
//! - The server response is authoritative for which geofences exist.
//! - Expired geofences are never persisted nor monitored, even if freshly
//!   received.
//! - Surviving geofences are re-registered in full on every reconciliation;
//!   idempotent starts make the redundancy safe.
//! - Stops are issued before starts.
//! - Best-effort orchestration: adapter failures are logged and reported,
//!   never rolled back; the next full re-register self-heals divergence.

mod engine;
mod location_map;
mod report;

pub use engine::GeofenceEngine;
pub use location_map::LocationMap;
pub use report::{EngineWarning, ReconcileReport};
