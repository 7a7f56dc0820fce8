use gfk_model::RequestIdError;

/// Non-fatal problems observed during a reconciliation.
///
/// None of these abort the operation; the engine skips the offending entry
/// or proceeds with what it has, and the caller reads the evidence here.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineWarning {
    /// A request id did not decode to a (geofence id, location id) pair.
    /// The entry was skipped.
    MalformedRequestId {
        request_id: String,
        error: RequestIdError,
    },
    /// The persisted snapshot could not be read; reconciliation proceeded
    /// from an empty snapshot.
    StoreLoadFailed { reason: String },
    /// The recomputed snapshot could not be written. The monitored set and
    /// the persisted snapshot may diverge until the next reconciliation.
    StoreSaveFailed { reason: String },
}

impl std::fmt::Display for EngineWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedRequestId { request_id, error } => {
                write!(f, "skipped malformed request id '{request_id}': {error}")
            }
            Self::StoreLoadFailed { reason } => {
                write!(f, "snapshot load failed, proceeding from empty: {reason}")
            }
            Self::StoreSaveFailed { reason } => {
                write!(f, "snapshot save failed: {reason}")
            }
        }
    }
}

impl std::error::Error for EngineWarning {}

/// Deterministic record of one reconciliation's outcome.
///
/// `started` and `stopped` hold the request ids actually issued to the
/// registrar, in sorted order; `expired_geofence_ids` the geofences dropped
/// by the expiry policy; `persisted_geofences` the size of the snapshot
/// written back.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReconcileReport {
    pub started: Vec<String>,
    pub stopped: Vec<String>,
    pub expired_geofence_ids: Vec<i64>,
    pub persisted_geofences: usize,
    pub warnings: Vec<EngineWarning>,
}

impl ReconcileReport {
    /// True iff the reconciliation completed without skipping anything and
    /// both adapter interactions succeeded.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
