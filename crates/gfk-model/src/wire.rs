//! Wire adapter — deserialize the geofence service JSON and normalize to
//! internal types.
//!
//! # Purpose
//! The geofence service returns definitions in its own JSON schema.  This
//! module defines the *raw* (wire-level) structs that mirror that schema and
//! provides a single [`normalize`] function that converts them into the
//! internal [`GeofenceResponseData`] / [`GeofenceData`] /
//! [`GeofenceLocation`] types consumed by the reconciliation engine.
//!
//! # Design constraints
//! - Pure, deterministic conversion. No IO, no network calls, no async.
//! - All normalization errors are surfaced as [`WireError`]; callers decide
//!   whether to abort the sync or retry.
//! - Field names on the raw structs mirror the service schema via serde
//!   renames (`"expiry_time"`, `"lat"`, `"long"`, `"rad"`, `"trigger_type"`);
//!   that declarative mapping is the entire local/remote translation layer.
//! - Unknown fields are ignored so service-side schema additions don't break
//!   deserialization.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::{GeofenceData, GeofenceLocation, GeofenceResponseData, TriggerType};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// All errors that can occur during wire normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum WireError {
    /// A geofence `id` is negative.
    NegativeGeofenceId { id: i64 },
    /// A location `id` is negative.
    NegativeLocationId { geofence_id: i64, id: i64 },
    /// A location radius is zero or negative.
    NonPositiveRadius {
        geofence_id: i64,
        location_id: i64,
        radius_m: f64,
    },
    /// A latitude is outside [-90, 90].
    LatitudeOutOfRange {
        geofence_id: i64,
        location_id: i64,
        latitude: f64,
    },
    /// A longitude is outside [-180, 180].
    LongitudeOutOfRange {
        geofence_id: i64,
        location_id: i64,
        longitude: f64,
    },
    /// A `trigger_type` string could not be mapped to [`TriggerType`].
    UnknownTrigger { geofence_id: i64, raw: String },
}

impl std::fmt::Display for WireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeGeofenceId { id } => {
                write!(f, "geofence has negative id {id}")
            }
            Self::NegativeLocationId { geofence_id, id } => {
                write!(f, "geofence {geofence_id} has location with negative id {id}")
            }
            Self::NonPositiveRadius {
                geofence_id,
                location_id,
                radius_m,
            } => write!(
                f,
                "geofence {geofence_id} location {location_id} has non-positive radius {radius_m}"
            ),
            Self::LatitudeOutOfRange {
                geofence_id,
                location_id,
                latitude,
            } => write!(
                f,
                "geofence {geofence_id} location {location_id} has latitude {latitude} outside [-90, 90]"
            ),
            Self::LongitudeOutOfRange {
                geofence_id,
                location_id,
                longitude,
            } => write!(
                f,
                "geofence {geofence_id} location {location_id} has longitude {longitude} outside [-180, 180]"
            ),
            Self::UnknownTrigger { geofence_id, raw } => {
                write!(f, "geofence {geofence_id} has unrecognised trigger_type '{raw}'")
            }
        }
    }
}

impl std::error::Error for WireError {}

// ---------------------------------------------------------------------------
// Raw wire-level structs  (service JSON → these → internal types)
// ---------------------------------------------------------------------------

/// Wire-level location entry from the geofence service.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLocation {
    /// Location identifier, unique within its parent geofence.
    pub id: i64,
    /// Human-readable label. Optional on the wire.
    #[serde(default)]
    pub name: String,
    /// Center latitude in degrees.
    pub lat: f64,
    /// Center longitude in degrees.
    #[serde(rename = "long")]
    pub lng: f64,
    /// Radius in meters.
    pub rad: f64,
    /// Trigger string: `"enter"` | `"exit"` | `"both"` (case-insensitive).
    /// Absent means both.
    #[serde(default)]
    pub trigger_type: Option<String>,
}

/// Wire-level geofence entry from the geofence service.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGeofence {
    /// Backend-assigned geofence identifier (must be non-negative).
    pub id: i64,
    /// Epoch milliseconds after which (inclusive) the geofence is invalid.
    #[serde(rename = "expiry_time")]
    pub expiry_ms: i64,
    /// Monitored areas. An empty list is legal (the geofence then
    /// contributes no monitored regions).
    #[serde(default)]
    pub locations: Vec<RawLocation>,
    /// Opaque tag strings, carried through unmodified.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Opaque payload, carried through unmodified.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Top-level response envelope from the geofence service.
///
/// Callers construct this with `serde_json::from_str` / `from_value` after
/// fetching the endpoint, then hand it to [`normalize`].
#[derive(Debug, Clone, Deserialize)]
pub struct RawGeofenceResponse {
    /// All geofence definitions for this sync.
    #[serde(default)]
    pub geofences: Vec<RawGeofence>,
    /// Server watermark for delta fetches.
    #[serde(default)]
    pub last_modified: Option<i64>,
}

// ---------------------------------------------------------------------------
// Normalization helpers
// ---------------------------------------------------------------------------

fn normalize_trigger(geofence_id: i64, raw: Option<&str>) -> Result<TriggerType, WireError> {
    let Some(raw) = raw else {
        return Ok(TriggerType::Both);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "enter" | "in" => Ok(TriggerType::Enter),
        "exit" | "out" => Ok(TriggerType::Exit),
        "both" | "enter_or_exit" | "in_or_out" | "" => Ok(TriggerType::Both),
        other => Err(WireError::UnknownTrigger {
            geofence_id,
            raw: other.to_string(),
        }),
    }
}

fn normalize_location(geofence_id: i64, raw: RawLocation) -> Result<GeofenceLocation, WireError> {
    if raw.id < 0 {
        return Err(WireError::NegativeLocationId {
            geofence_id,
            id: raw.id,
        });
    }
    if !(raw.rad > 0.0) {
        return Err(WireError::NonPositiveRadius {
            geofence_id,
            location_id: raw.id,
            radius_m: raw.rad,
        });
    }
    if !(-90.0..=90.0).contains(&raw.lat) {
        return Err(WireError::LatitudeOutOfRange {
            geofence_id,
            location_id: raw.id,
            latitude: raw.lat,
        });
    }
    if !(-180.0..=180.0).contains(&raw.lng) {
        return Err(WireError::LongitudeOutOfRange {
            geofence_id,
            location_id: raw.id,
            longitude: raw.lng,
        });
    }
    let trigger = normalize_trigger(geofence_id, raw.trigger_type.as_deref())?;

    Ok(GeofenceLocation {
        id: raw.id,
        name: raw.name.trim().to_string(),
        latitude: raw.lat,
        longitude: raw.lng,
        radius_m: raw.rad,
        trigger,
    })
}

fn normalize_geofence(raw: RawGeofence) -> Result<GeofenceData, WireError> {
    if raw.id < 0 {
        return Err(WireError::NegativeGeofenceId { id: raw.id });
    }

    let mut locations = Vec::with_capacity(raw.locations.len());
    for raw_loc in raw.locations {
        locations.push(normalize_location(raw.id, raw_loc)?);
    }

    Ok(GeofenceData {
        id: raw.id,
        expiry_ms: raw.expiry_ms,
        locations,
        tags: raw.tags,
        data: raw.data,
    })
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Normalize a raw response into the internal [`GeofenceResponseData`].
///
/// # Errors
/// Returns the first [`WireError`] encountered.  Geofences are processed in
/// input order; a duplicate geofence id resolves last-wins.
///
/// For a lenient variant that skips invalid geofences instead of failing,
/// see [`normalize_lenient`].
pub fn normalize(raw: RawGeofenceResponse) -> Result<GeofenceResponseData, WireError> {
    let mut geofences: BTreeMap<i64, GeofenceData> = BTreeMap::new();
    for raw_fence in raw.geofences {
        let fence = normalize_geofence(raw_fence)?;
        geofences.insert(fence.id, fence);
    }
    Ok(GeofenceResponseData {
        geofences,
        last_modified: raw.last_modified,
    })
}

/// Lenient variant: skip malformed geofences rather than failing.
///
/// The caller receives both the partial response and a list of errors for
/// any skipped geofences, and decides whether to proceed or surface them.
pub fn normalize_lenient(raw: RawGeofenceResponse) -> (GeofenceResponseData, Vec<WireError>) {
    let mut geofences: BTreeMap<i64, GeofenceData> = BTreeMap::new();
    let mut errors: Vec<WireError> = Vec::new();

    for raw_fence in raw.geofences {
        match normalize_geofence(raw_fence) {
            Ok(fence) => {
                geofences.insert(fence.id, fence);
            }
            Err(e) => errors.push(e),
        }
    }

    (
        GeofenceResponseData {
            geofences,
            last_modified: raw.last_modified,
        },
        errors,
    )
}

/// Deserialize a JSON string directly into a [`GeofenceResponseData`].
///
/// Convenience wrapper: `json → RawGeofenceResponse → GeofenceResponseData`.
/// Returns a boxed error so callers don't need to import serde_json.
pub fn normalize_json(json: &str) -> Result<GeofenceResponseData, Box<dyn std::error::Error>> {
    let raw: RawGeofenceResponse = serde_json::from_str(json)?;
    let response = normalize(raw)?;
    Ok(response)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
