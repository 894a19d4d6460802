//! Organisation reconciliation: `organization.created`, `organization.updated`,
//! `organization.deleted`.

use mirror_core::enums::EntityKind;
use mirror_core::events::{DeletedObject, OrganisationPayload};
use mirror_db::store::IdentityStore;
use mirror_db::updates::{NewOrganisation, OrganisationUpdateBuilder};

use crate::error::SyncError;
use crate::outcome::SyncOutcome;

/// Patch the organisation with this payload's external id, or insert it.
///
/// Name and slug are both written on every patch. A payload without a slug
/// clears the stored one.
///
/// # Errors
///
/// Returns `SyncError::Store` if a store operation fails.
pub async fn upsert_organisation<S: IdentityStore>(
    store: &S,
    payload: &OrganisationPayload,
) -> Result<SyncOutcome, SyncError> {
    let Some(external_id) = payload.external_id() else {
        tracing::debug!("organisation payload without id, skipping");
        return Ok(SyncOutcome::Skipped);
    };

    let update = OrganisationUpdateBuilder::new()
        .name(payload.name())
        .slug(payload.slug().map(str::to_string))
        .build();

    let outcome = match store.find_organisation_by_external_id(external_id).await? {
        Some(existing) => {
            store.update_organisation(&existing.id, &update).await?;
            SyncOutcome::Patched
        }
        None => {
            let new = NewOrganisation::new(external_id, payload.name()).with_slug(payload.slug());
            match store.insert_organisation(&new).await {
                Ok(_) => SyncOutcome::Inserted,
                Err(e) if e.is_unique_violation() => {
                    tracing::debug!(external_id, "organisation insert raced, patching instead");
                    let winner = store
                        .find_organisation_by_external_id(external_id)
                        .await?
                        .ok_or_else(|| SyncError::conflict(EntityKind::Organisation, external_id))?;
                    store.update_organisation(&winner.id, &update).await?;
                    SyncOutcome::Patched
                }
                Err(e) => return Err(e.into()),
            }
        }
    };

    tracing::info!(external_id, %outcome, "synced organisation");
    Ok(outcome)
}

/// Delete the organisation after every membership referencing it.
///
/// # Errors
///
/// Returns `SyncError::Store` if a store operation fails.
pub async fn delete_organisation<S: IdentityStore>(
    store: &S,
    deleted: &DeletedObject,
) -> Result<SyncOutcome, SyncError> {
    let Some(external_id) = deleted.external_id() else {
        tracing::debug!("organisation delete without id, skipping");
        return Ok(SyncOutcome::Skipped);
    };

    let Some(org) = store.find_organisation_by_external_id(external_id).await? else {
        tracing::info!(external_id, "organisation already absent");
        return Ok(SyncOutcome::Absent);
    };

    let memberships = store.list_memberships_by_organisation(&org.id).await?;
    for membership in &memberships {
        store.delete_membership(&membership.id).await?;
    }
    store.delete_organisation(&org.id).await?;

    let cascaded = u32::try_from(memberships.len()).unwrap_or(u32::MAX);
    tracing::info!(external_id, cascaded, "deleted organisation");
    Ok(SyncOutcome::Deleted { cascaded })
}
