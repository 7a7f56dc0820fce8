//! gfk-store
//!
//! Persistence adapters for the geofence snapshot and the device settings.
//!
//! The reconciliation engine owns the *content* of the persisted snapshot;
//! this crate owns its *durability*. The engine always reads the whole
//! snapshot before a reconciliation and writes the whole recomputed snapshot
//! after it. There are no partial updates, so the store surface is just
//! `load` / `save`.
//!
//! Two implementations:
//! - [`FileGeofenceStore`] — one JSON document on disk, atomic replace.
//! - [`InMemoryGeofenceStore`] — deterministic in-memory double for tests
//!   and embedding.

mod atomic;
mod file;
mod memory;
mod settings;

use anyhow::Result;
use gfk_model::GeofenceMap;

pub use file::FileGeofenceStore;
pub use memory::InMemoryGeofenceStore;
pub use settings::{DeviceSettings, FileSettingsStore};

/// Durable home of the geofence snapshot.
///
/// `save` must be atomic with respect to process crash: after a crash, `load`
/// returns either the previous snapshot or the new one, never a torn mix.
/// The engine treats each `load` as granting it logical ownership of the
/// snapshot until the matching `save`; callers with concurrent access must
/// serialize reconciliations externally.
pub trait GeofenceStore {
    /// Read the full persisted snapshot. A store that has never been written
    /// returns the empty map.
    fn load(&self) -> Result<GeofenceMap>;

    /// Replace the persisted snapshot wholesale.
    fn save(&self, snapshot: &GeofenceMap) -> Result<()>;
}
