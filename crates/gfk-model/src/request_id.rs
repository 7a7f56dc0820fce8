//! Composite monitoring-request-id codec.
//!
//! The platform region-monitoring primitive keys each watched region by a
//! single opaque string. A monitored region here is identified by the
//! (geofence id, location id) pair, so both integers are packed into one
//! token: `fence:<geofence_id>:<location_id>`. The scheme prefix makes
//! regions owned by this SDK recognizable among whatever else the host
//! application monitors.
//!
//! Encoding is deterministic and collision-free across distinct pairs;
//! decoding recovers both integers exactly or fails with
//! [`RequestIdError`]. It never silently returns wrong values.

use std::fmt;

const SCHEME: &str = "fence";

/// Sentinel for "no geofence id". Valid encoded ids only ever contain
/// non-negative integers, so the sentinel can never collide with a decoded
/// value. Prefer `Option<i64>` in new code; the constant exists for callers
/// bridging to interfaces that require an integer slot.
pub const NO_GEOFENCE_ID: i64 = -1;

/// Sentinel for "no location id". See [`NO_GEOFENCE_ID`].
pub const NO_LOCATION_ID: i64 = -1;

/// All the ways a request-id string can fail to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestIdError {
    /// The string does not start with the `fence:` scheme.
    WrongScheme { got: String },
    /// The string does not have exactly three colon-separated segments.
    WrongSegmentCount { got: usize },
    /// The geofence-id segment is not a non-negative integer.
    InvalidGeofenceId { raw: String },
    /// The location-id segment is not a non-negative integer.
    InvalidLocationId { raw: String },
}

impl fmt::Display for RequestIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongScheme { got } => {
                write!(f, "request id has wrong scheme (expected 'fence'): '{got}'")
            }
            Self::WrongSegmentCount { got } => {
                write!(f, "request id has {got} segments (expected 3)")
            }
            Self::InvalidGeofenceId { raw } => {
                write!(f, "request id has invalid geofence id segment '{raw}'")
            }
            Self::InvalidLocationId { raw } => {
                write!(f, "request id has invalid location id segment '{raw}'")
            }
        }
    }
}

impl std::error::Error for RequestIdError {}

/// Encode a (geofence id, location id) pair into the single opaque token the
/// monitoring platform accepts.
///
/// Ids are expected to be non-negative (the wire normalizer enforces this);
/// the output for distinct pairs never collides because both segments are
/// plain base-10 integers with a fixed separator.
pub fn encode_request_id(geofence_id: i64, location_id: i64) -> String {
    format!("{SCHEME}:{geofence_id}:{location_id}")
}

fn parse_segment(raw: &str) -> Option<i64> {
    // `i64::from_str` accepts a leading '+' and "-0"; a canonical encoded
    // segment is digits only.
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<i64>().ok()
}

/// Decode a request id back into its (geofence id, location id) pair.
pub fn decode_request_id(request_id: &str) -> Result<(i64, i64), RequestIdError> {
    let segments: Vec<&str> = request_id.split(':').collect();
    if segments.len() != 3 {
        return Err(RequestIdError::WrongSegmentCount {
            got: segments.len(),
        });
    }
    if segments[0] != SCHEME {
        return Err(RequestIdError::WrongScheme {
            got: segments[0].to_string(),
        });
    }
    let geofence_id = parse_segment(segments[1]).ok_or_else(|| RequestIdError::InvalidGeofenceId {
        raw: segments[1].to_string(),
    })?;
    let location_id = parse_segment(segments[2]).ok_or_else(|| RequestIdError::InvalidLocationId {
        raw: segments[2].to_string(),
    })?;
    Ok((geofence_id, location_id))
}
