//! Lookup-or-create helpers for parents referenced before they were seen.
//!
//! Membership events can arrive ahead of the user or organisation events
//! they reference. These helpers return the existing row, or insert a
//! minimal one built from the fragment the membership payload carries. The
//! later `*.created` event then patches it in place.

use mirror_core::entities::{Organisation, User};
use mirror_core::enums::EntityKind;
use mirror_core::events::{OrganisationRef, PublicUserData};
use mirror_db::store::IdentityStore;
use mirror_db::updates::{NewOrganisation, NewUser};

use crate::error::SyncError;

pub(crate) async fn ensure_user<S: IdentityStore>(
    store: &S,
    external_id: &str,
    fallback: &PublicUserData,
) -> Result<User, SyncError> {
    if let Some(user) = store.find_user_by_external_id(external_id).await? {
        return Ok(user);
    }

    let new = NewUser::new(external_id, fallback.fallback_name())
        .with_email(fallback.fallback_email());
    match store.insert_user(&new).await {
        Ok(user) => {
            tracing::debug!(external_id, id = %user.id, "created placeholder user");
            Ok(user)
        }
        Err(e) if e.is_unique_violation() => {
            tracing::debug!(external_id, "placeholder user raced, using winner");
            store
                .find_user_by_external_id(external_id)
                .await?
                .ok_or_else(|| SyncError::conflict(EntityKind::User, external_id))
        }
        Err(e) => Err(e.into()),
    }
}

pub(crate) async fn ensure_organisation<S: IdentityStore>(
    store: &S,
    external_id: &str,
    fallback: &OrganisationRef,
) -> Result<Organisation, SyncError> {
    if let Some(org) = store.find_organisation_by_external_id(external_id).await? {
        return Ok(org);
    }

    let new = NewOrganisation::new(external_id, fallback.fallback_name())
        .with_slug(fallback.slug.as_deref());
    match store.insert_organisation(&new).await {
        Ok(org) => {
            tracing::debug!(external_id, id = %org.id, "created placeholder organisation");
            Ok(org)
        }
        Err(e) if e.is_unique_violation() => {
            tracing::debug!(external_id, "placeholder organisation raced, using winner");
            store
                .find_organisation_by_external_id(external_id)
                .await?
                .ok_or_else(|| SyncError::conflict(EntityKind::Organisation, external_id))
        }
        Err(e) => Err(e.into()),
    }
}
