//! gfk-model
//!
//! Data model for backend-issued geofences and the pure logic that operates
//! on it:
//! - internal geofence/location types and the keyed snapshot map
//! - wire-level structs mirroring the server JSON schema + normalization
//! - the composite monitoring-request-id codec
//! - the expiry policy
//! - tag-set diffing for the registration layer
//!
//! Deterministic, pure logic. No IO. No platform calls.

mod expiry;
mod request_id;
mod tags;
mod types;
mod wire;

pub use expiry::{epoch_millis, is_expired};
pub use request_id::{
    decode_request_id, encode_request_id, RequestIdError, NO_GEOFENCE_ID, NO_LOCATION_ID,
};
pub use tags::{diff_tags, lowercase_tags, TagsDiff};
pub use types::*;
pub use wire::{
    normalize, normalize_json, normalize_lenient, RawGeofence, RawGeofenceResponse, RawLocation,
    WireError,
};
