//! gfk-testkit
//!
//! Fixture builders and loaders shared by scenario tests across the
//! workspace. Everything here is deterministic: fixed coordinates, no
//! clocks, no randomness.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use gfk_model::{
    normalize, GeofenceData, GeofenceLocation, GeofenceMap, GeofenceResponseData,
    RawGeofenceResponse, TriggerType,
};

/// A location with fixed test coordinates derived from its id.
pub fn location(id: i64) -> GeofenceLocation {
    GeofenceLocation::new(
        id,
        format!("loc-{id}"),
        1.0 + id as f64,
        -1.0 - id as f64,
        50.0,
        TriggerType::Both,
    )
}

/// A geofence with the given expiry and one [`location`] per id.
pub fn geofence(id: i64, expiry_ms: i64, location_ids: &[i64]) -> GeofenceData {
    GeofenceData::new(id, expiry_ms, location_ids.iter().copied().map(location).collect())
}

/// A geofence that also carries opaque tags, for pass-through assertions.
pub fn tagged_geofence(
    id: i64,
    expiry_ms: i64,
    location_ids: &[i64],
    tags: &[&str],
) -> GeofenceData {
    let mut fence = geofence(id, expiry_ms, location_ids);
    fence.tags = tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>();
    fence
}

/// Build a snapshot map from geofence values.
pub fn snapshot(fences: Vec<GeofenceData>) -> GeofenceMap {
    fences.into_iter().map(|g| (g.id, g)).collect()
}

/// Build a normalized response from geofence values.
pub fn response(fences: Vec<GeofenceData>) -> GeofenceResponseData {
    GeofenceResponseData::with_geofences(fences)
}

/// Parse and normalize a raw service JSON document.
pub fn response_from_json(json: &str) -> Result<GeofenceResponseData> {
    let raw: RawGeofenceResponse =
        serde_json::from_str(json).context("parse geofence response json")?;
    normalize(raw).context("normalize geofence response")
}
