use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// What kind of boundary crossing wakes up a monitored location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    Enter,
    Exit,
    Both,
}

impl Default for TriggerType {
    fn default() -> Self {
        TriggerType::Both
    }
}

/// One circular monitored area belonging to a geofence.
///
/// `id` is unique only within its parent geofence; a globally unique
/// monitoring key requires the (geofence id, location id) pair, see
/// [`crate::encode_request_id`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeofenceLocation {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Radius in meters. Always strictly positive after normalization.
    pub radius_m: f64,
    pub trigger: TriggerType,
}

impl GeofenceLocation {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        radius_m: f64,
        trigger: TriggerType,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            latitude,
            longitude,
            radius_m,
            trigger,
        }
    }
}

/// One backend-issued geofence definition.
///
/// `data` and `tags` are carried through unmodified; nothing in this
/// workspace interprets them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeofenceData {
    pub id: i64,
    /// Epoch milliseconds. The geofence is invalid at or after this time.
    pub expiry_ms: i64,
    pub locations: Vec<GeofenceLocation>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl GeofenceData {
    pub fn new(id: i64, expiry_ms: i64, locations: Vec<GeofenceLocation>) -> Self {
        Self {
            id,
            expiry_ms,
            locations,
            tags: BTreeSet::new(),
            data: serde_json::Value::Null,
        }
    }

    /// Look up a location by its (geofence-scoped) id.
    pub fn location(&self, location_id: i64) -> Option<&GeofenceLocation> {
        self.locations.iter().find(|l| l.id == location_id)
    }
}

/// Snapshot shape shared by the persisted store and the working state of a
/// reconciliation: geofence id -> definition. BTreeMap keeps iteration
/// deterministic.
pub type GeofenceMap = BTreeMap<i64, GeofenceData>;

/// One sync's worth of server payload, already normalized from the wire.
///
/// The geofence set is authoritative: a geofence absent from `geofences` no
/// longer exists, whatever the persisted snapshot says.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeofenceResponseData {
    pub geofences: GeofenceMap,
    /// Server-side watermark for delta fetches. Stored for the transport
    /// layer; the reconciliation engine does not interpret it.
    pub last_modified: Option<i64>,
}

impl GeofenceResponseData {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_geofences(geofences: impl IntoIterator<Item = GeofenceData>) -> Self {
        Self {
            geofences: geofences.into_iter().map(|g| (g.id, g)).collect(),
            last_modified: None,
        }
    }
}
