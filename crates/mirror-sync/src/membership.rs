//! Membership reconciliation: `organizationMembership.created`,
//! `organizationMembership.updated`, `organizationMembership.deleted`.
//!
//! Per (user, organisation) pair the mirror holds either nothing or one row
//! with a role. Upserts move absent to present, or change the role; deletes
//! move present to absent. Neither direction is an error when already there.

use mirror_core::entities::Membership;
use mirror_core::enums::EntityKind;
use mirror_core::events::{MembershipPayload, OrganisationRef, PublicUserData};
use mirror_db::store::IdentityStore;
use mirror_db::updates::NewMembership;

use crate::ensure::{ensure_organisation, ensure_user};
use crate::error::SyncError;
use crate::outcome::SyncOutcome;

/// Link the payload's user and organisation, creating placeholder parents
/// when they have not been seen yet.
///
/// An existing link only has its role replaced; `joined_at` is kept.
///
/// # Errors
///
/// Returns `SyncError::Store` if a store operation fails.
pub async fn upsert_membership<S: IdentityStore>(
    store: &S,
    payload: &MembershipPayload,
) -> Result<SyncOutcome, SyncError> {
    let (Some(org_external_id), Some(user_external_id)) =
        (payload.organisation_external_id(), payload.user_external_id())
    else {
        tracing::debug!("membership payload without user or organisation id, skipping");
        return Ok(SyncOutcome::Skipped);
    };
    let role = payload.role();

    let no_user_data = PublicUserData::default();
    let no_organisation = OrganisationRef::default();
    let user_fallback = payload.public_user_data.as_ref().unwrap_or(&no_user_data);
    let org_fallback = payload.organization.as_ref().unwrap_or(&no_organisation);

    // Both parents must exist before the link is looked up.
    let (user, org) = tokio::try_join!(
        ensure_user(store, user_external_id, user_fallback),
        ensure_organisation(store, org_external_id, org_fallback),
    )?;

    let outcome = match store.find_membership(&user.id, &org.id).await? {
        Some(existing) => set_role(store, &existing, role).await?,
        None => {
            let new = NewMembership {
                user_id: user.id.clone(),
                organisation_id: org.id.clone(),
                role: role.to_string(),
            };
            match store.insert_membership(&new).await {
                Ok(_) => SyncOutcome::Inserted,
                Err(e) if e.is_unique_violation() => {
                    tracing::debug!(
                        user = user_external_id,
                        organisation = org_external_id,
                        "membership insert raced, comparing roles instead"
                    );
                    let winner = store
                        .find_membership(&user.id, &org.id)
                        .await?
                        .ok_or_else(|| {
                            SyncError::conflict(
                                EntityKind::Membership,
                                format!("{user_external_id}/{org_external_id}"),
                            )
                        })?;
                    set_role(store, &winner, role).await?
                }
                Err(e) => return Err(e.into()),
            }
        }
    };

    tracing::info!(
        user = user_external_id,
        organisation = org_external_id,
        role,
        %outcome,
        "synced membership"
    );
    Ok(outcome)
}

async fn set_role<S: IdentityStore>(
    store: &S,
    existing: &Membership,
    role: &str,
) -> Result<SyncOutcome, SyncError> {
    if existing.role == role {
        return Ok(SyncOutcome::Unchanged);
    }
    store.set_membership_role(&existing.id, role).await?;
    Ok(SyncOutcome::Patched)
}

/// Remove the link between the payload's user and organisation.
///
/// Unknown users, unknown organisations and missing links all end as
/// [`SyncOutcome::Absent`]. Parents are never created on this path.
///
/// # Errors
///
/// Returns `SyncError::Store` if a store operation fails.
pub async fn delete_membership<S: IdentityStore>(
    store: &S,
    payload: &MembershipPayload,
) -> Result<SyncOutcome, SyncError> {
    let (Some(org_external_id), Some(user_external_id)) =
        (payload.organisation_external_id(), payload.user_external_id())
    else {
        tracing::debug!("membership delete without user or organisation id, skipping");
        return Ok(SyncOutcome::Skipped);
    };

    let (user, org) = tokio::try_join!(
        store.find_user_by_external_id(user_external_id),
        store.find_organisation_by_external_id(org_external_id),
    )?;
    let (Some(user), Some(org)) = (user, org) else {
        tracing::info!(
            user = user_external_id,
            organisation = org_external_id,
            "membership parents absent"
        );
        return Ok(SyncOutcome::Absent);
    };

    let Some(existing) = store.find_membership(&user.id, &org.id).await? else {
        return Ok(SyncOutcome::Absent);
    };
    store.delete_membership(&existing.id).await?;

    tracing::info!(
        user = user_external_id,
        organisation = org_external_id,
        "deleted membership"
    );
    Ok(SyncOutcome::Deleted { cascaded: 0 })
}
