//! User reconciliation: `user.created`, `user.updated`, `user.deleted`.

use mirror_core::enums::EntityKind;
use mirror_core::events::{DeletedObject, UserPayload};
use mirror_db::store::IdentityStore;
use mirror_db::updates::{NewUser, UserUpdateBuilder};

use crate::error::SyncError;
use crate::outcome::SyncOutcome;

/// Patch the user with this payload's external id, or insert it.
///
/// The name is always written (falling back to `"Unnamed"`); email and image
/// are written only when the payload carries them.
///
/// # Errors
///
/// Returns `SyncError::Store` if a store operation fails.
pub async fn upsert_user<S: IdentityStore>(
    store: &S,
    payload: &UserPayload,
) -> Result<SyncOutcome, SyncError> {
    let Some(external_id) = payload.external_id() else {
        tracing::debug!("user payload without id, skipping");
        return Ok(SyncOutcome::Skipped);
    };

    let mut builder = UserUpdateBuilder::new().name(payload.display_name());
    if let Some(email) = payload.primary_email() {
        builder = builder.email(email);
    }
    if let Some(image_url) = payload.image_url() {
        builder = builder.image_url(image_url);
    }
    let update = builder.build();

    let outcome = match store.find_user_by_external_id(external_id).await? {
        Some(existing) => {
            store.update_user(&existing.id, &update).await?;
            SyncOutcome::Patched
        }
        None => {
            let new = NewUser::new(external_id, payload.display_name())
                .with_email(payload.primary_email())
                .with_image_url(payload.image_url());
            match store.insert_user(&new).await {
                Ok(_) => SyncOutcome::Inserted,
                Err(e) if e.is_unique_violation() => {
                    tracing::debug!(external_id, "user insert raced, patching instead");
                    let winner = store
                        .find_user_by_external_id(external_id)
                        .await?
                        .ok_or_else(|| SyncError::conflict(EntityKind::User, external_id))?;
                    store.update_user(&winner.id, &update).await?;
                    SyncOutcome::Patched
                }
                Err(e) => return Err(e.into()),
            }
        }
    };

    tracing::info!(external_id, %outcome, "synced user");
    Ok(outcome)
}

/// Delete the user and, first, every membership referencing it.
///
/// Safe to redeliver after a partial run: the second pass finds no
/// memberships and deletes the user row.
///
/// # Errors
///
/// Returns `SyncError::Store` if a store operation fails. Memberships
/// already removed stay removed.
pub async fn delete_user<S: IdentityStore>(
    store: &S,
    deleted: &DeletedObject,
) -> Result<SyncOutcome, SyncError> {
    let Some(external_id) = deleted.external_id() else {
        tracing::debug!("user delete without id, skipping");
        return Ok(SyncOutcome::Skipped);
    };

    let Some(user) = store.find_user_by_external_id(external_id).await? else {
        tracing::info!(external_id, "user already absent");
        return Ok(SyncOutcome::Absent);
    };

    let memberships = store.list_memberships_by_user(&user.id).await?;
    for membership in &memberships {
        store.delete_membership(&membership.id).await?;
    }
    store.delete_user(&user.id).await?;

    let cascaded = u32::try_from(memberships.len()).unwrap_or(u32::MAX);
    tracing::info!(external_id, cascaded, "deleted user");
    Ok(SyncOutcome::Deleted { cascaded })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirror_db::service::MirrorService;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    async fn store() -> MirrorService {
        MirrorService::new_local(":memory:").await.unwrap()
    }

    fn payload(value: serde_json::Value) -> UserPayload {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn inserts_new_user() {
        let store = store().await;
        let outcome = upsert_user(
            &store,
            &payload(json!({
                "id": "user_1",
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email_addresses": [{"email_address": "ada@example.com"}],
                "image_url": "https://img.example/ada.png"
            })),
        )
        .await
        .unwrap();
        assert_eq!(outcome, SyncOutcome::Inserted);

        let user = store.find_user_by_external_id("user_1").await.unwrap().unwrap();
        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
        assert_eq!(user.image_url.as_deref(), Some("https://img.example/ada.png"));
    }

    #[tokio::test]
    async fn patch_leaves_absent_fields_alone() {
        let store = store().await;
        upsert_user(
            &store,
            &payload(json!({
                "id": "user_1",
                "first_name": "Ada",
                "email_addresses": [{"email_address": "ada@example.com"}],
                "image_url": "https://img.example/ada.png"
            })),
        )
        .await
        .unwrap();

        let outcome = upsert_user(
            &store,
            &payload(json!({"id": "user_1", "first_name": "Ada", "last_name": "Lovelace"})),
        )
        .await
        .unwrap();
        assert_eq!(outcome, SyncOutcome::Patched);

        let user = store.find_user_by_external_id("user_1").await.unwrap().unwrap();
        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
        assert_eq!(user.image_url.as_deref(), Some("https://img.example/ada.png"));
    }

    #[tokio::test]
    async fn patch_without_name_resets_to_default() {
        let store = store().await;
        upsert_user(&store, &payload(json!({"id": "user_1", "full_name": "Ada L"})))
            .await
            .unwrap();
        assert_eq!(
            store.find_user_by_external_id("user_1").await.unwrap().unwrap().name,
            "Ada L"
        );

        upsert_user(&store, &payload(json!({"id": "user_1"}))).await.unwrap();
        assert_eq!(
            store.find_user_by_external_id("user_1").await.unwrap().unwrap().name,
            "Unnamed"
        );
    }

    #[tokio::test]
    async fn falls_back_to_public_user_data_id() {
        let store = store().await;
        let outcome = upsert_user(
            &store,
            &payload(json!({"public_user_data": {"user_id": "user_9"}})),
        )
        .await
        .unwrap();
        assert_eq!(outcome, SyncOutcome::Inserted);
        assert!(store.find_user_by_external_id("user_9").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_id_is_skipped() {
        let store = store().await;
        let outcome = upsert_user(&store, &payload(json!({"first_name": "Ada"})))
            .await
            .unwrap();
        assert_eq!(outcome, SyncOutcome::Skipped);
        assert!(store.list_users(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_unknown_user_is_absent() {
        let store = store().await;
        let deleted = DeletedObject {
            id: Some("user_404".into()),
            deleted: Some(true),
        };
        assert_eq!(delete_user(&store, &deleted).await.unwrap(), SyncOutcome::Absent);
    }

    #[tokio::test]
    async fn delete_without_id_is_skipped() {
        let store = store().await;
        let outcome = delete_user(&store, &DeletedObject::default()).await.unwrap();
        assert_eq!(outcome, SyncOutcome::Skipped);
    }
}
