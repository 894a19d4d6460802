use mirror_core::events::{EventEnvelope, IdentityEvent};
use mirror_db::store::IdentityStore;

use crate::error::SyncError;
use crate::membership::{delete_membership, upsert_membership};
use crate::organisation::{delete_organisation, upsert_organisation};
use crate::outcome::SyncOutcome;
use crate::user::{delete_user, upsert_user};

/// Decode one webhook envelope and reconcile it into `store`.
///
/// Unknown event kinds are [`SyncOutcome::Ignored`]. Payloads that cannot be
/// decoded are logged and [`SyncOutcome::Skipped`]; neither is an error.
///
/// # Errors
///
/// Returns `SyncError` only when the store fails.
pub async fn apply<S: IdentityStore>(
    store: &S,
    envelope: &EventEnvelope,
) -> Result<SyncOutcome, SyncError> {
    tracing::debug!(event = %envelope.kind, "handling identity event");

    match IdentityEvent::decode(envelope) {
        Ok(event) => apply_event(store, &event).await,
        Err(error) => {
            tracing::warn!(event = %envelope.kind, %error, "undecodable payload, skipping");
            Ok(SyncOutcome::Skipped)
        }
    }
}

/// Route an already decoded event to its reconciler.
///
/// # Errors
///
/// Returns `SyncError` if the reconciler's store operations fail.
pub async fn apply_event<S: IdentityStore>(
    store: &S,
    event: &IdentityEvent,
) -> Result<SyncOutcome, SyncError> {
    match event {
        IdentityEvent::UserUpserted(payload) => upsert_user(store, payload).await,
        IdentityEvent::UserDeleted(deleted) => delete_user(store, deleted).await,
        IdentityEvent::OrganisationUpserted(payload) => upsert_organisation(store, payload).await,
        IdentityEvent::OrganisationDeleted(deleted) => delete_organisation(store, deleted).await,
        IdentityEvent::MembershipUpserted(payload) => upsert_membership(store, payload).await,
        IdentityEvent::MembershipDeleted(payload) => delete_membership(store, payload).await,
        IdentityEvent::Unrecognized(kind) => {
            tracing::warn!(event = %kind, "unhandled identity event");
            Ok(SyncOutcome::Ignored)
        }
    }
}
