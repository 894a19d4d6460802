//! Error types for mirror-sync.

use mirror_core::enums::EntityKind;
use mirror_db::error::DatabaseError;
use thiserror::Error;

/// Errors from reconciliation and queries.
///
/// Malformed events and unknown kinds are not errors; they surface as
/// [`crate::SyncOutcome::Skipped`] and [`crate::SyncOutcome::Ignored`].
#[derive(Debug, Error)]
pub enum SyncError {
    /// The store rejected or failed an operation. Never retried here.
    #[error(transparent)]
    Store(#[from] DatabaseError),

    /// An insert lost a uniqueness race, but the winning row was gone by the
    /// time it was looked up again.
    #[error("{entity} {key} collided on insert and then disappeared")]
    Conflict { entity: EntityKind, key: String },
}

impl SyncError {
    pub(crate) fn conflict(entity: EntityKind, key: impl Into<String>) -> Self {
        Self::Conflict {
            entity,
            key: key.into(),
        }
    }
}
