//! Read side of the mirror.
//!
//! `current_identity` echoes the authenticated caller as the session carries
//! it. `current_user` and `active_membership` resolve the caller's own rows
//! from that identity. The rest are point lookups and foreign-key scans for
//! operators.

use mirror_core::entities::{Membership, User};
use mirror_core::identity::AuthIdentity;
use mirror_db::store::IdentityStore;

use crate::error::SyncError;

/// The caller's identity exactly as authenticated, or `None` when there is no
/// session.
#[must_use]
pub fn current_identity(identity: Option<&AuthIdentity>) -> Option<AuthIdentity> {
    identity.cloned()
}

/// The mirrored user whose external id equals the caller's subject.
///
/// `None` when there is no identity or the subject has not been mirrored yet.
///
/// # Errors
///
/// Returns `SyncError::Store` if the lookup fails.
pub async fn current_user<S: IdentityStore>(
    store: &S,
    identity: Option<&AuthIdentity>,
) -> Result<Option<User>, SyncError> {
    let Some(identity) = identity else {
        return Ok(None);
    };
    Ok(store.find_user_by_external_id(&identity.subject).await?)
}

/// The caller's membership in the session's active organisation.
///
/// `None` for a personal session (no `org_id`), or when the user, the
/// organisation or the link between them has not been mirrored yet.
///
/// # Errors
///
/// Returns `SyncError::Store` if a lookup fails.
pub async fn active_membership<S: IdentityStore>(
    store: &S,
    identity: Option<&AuthIdentity>,
) -> Result<Option<Membership>, SyncError> {
    let Some(identity) = identity else {
        return Ok(None);
    };
    let Some(org_id) = identity.org_id.as_deref() else {
        return Ok(None);
    };

    let (user, org) = tokio::try_join!(
        store.find_user_by_external_id(&identity.subject),
        store.find_organisation_by_external_id(org_id),
    )?;
    match (user, org) {
        (Some(user), Some(org)) => Ok(store.find_membership(&user.id, &org.id).await?),
        _ => Ok(None),
    }
}

/// # Errors
///
/// Returns `SyncError::Store` if the lookup fails.
pub async fn user_by_id<S: IdentityStore>(
    store: &S,
    id: &str,
) -> Result<Option<User>, SyncError> {
    Ok(store.get_user(id).await?)
}

/// Memberships of the user with this external id. Empty if the user is
/// unknown.
///
/// # Errors
///
/// Returns `SyncError::Store` if a lookup fails.
pub async fn memberships_of_user<S: IdentityStore>(
    store: &S,
    external_id: &str,
) -> Result<Vec<Membership>, SyncError> {
    match store.find_user_by_external_id(external_id).await? {
        Some(user) => Ok(store.list_memberships_by_user(&user.id).await?),
        None => Ok(Vec::new()),
    }
}

/// Memberships of the organisation with this external id. Empty if the
/// organisation is unknown.
///
/// # Errors
///
/// Returns `SyncError::Store` if a lookup fails.
pub async fn members_of_organisation<S: IdentityStore>(
    store: &S,
    external_id: &str,
) -> Result<Vec<Membership>, SyncError> {
    match store.find_organisation_by_external_id(external_id).await? {
        Some(org) => Ok(store.list_memberships_by_organisation(&org.id).await?),
        None => Ok(Vec::new()),
    }
}
