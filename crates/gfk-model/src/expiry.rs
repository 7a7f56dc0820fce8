//! Expiry policy.
//!
//! Pure and monotonic: once a geofence is expired at time T it stays expired
//! for every T' >= T. The caller supplies the reference timestamp; nothing
//! here reads a clock.

use chrono::{DateTime, Utc};

use crate::GeofenceData;

/// True iff `geofence` is invalid at `reference_ms` (epoch milliseconds).
///
/// Boundary inclusive: a geofence whose `expiry_ms` equals the reference
/// timestamp is already expired.
pub fn is_expired(geofence: &GeofenceData, reference_ms: i64) -> bool {
    geofence.expiry_ms <= reference_ms
}

/// Epoch milliseconds for a wall-clock instant.
///
/// The engine works in `i64` epoch milliseconds end to end; this is the one
/// conversion point for callers holding a `DateTime<Utc>`.
pub fn epoch_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}
