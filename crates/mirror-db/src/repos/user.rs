//! User repository.
//!
//! Point lookups by internal id and by external id (unique index), insert,
//! partial patch, delete, and a bounded listing for operators.

use chrono::Utc;

use mirror_core::entities::User;
use mirror_core::ids::PREFIX_USER;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};
use crate::service::MirrorService;
use crate::updates::{NewUser, UserUpdate};

const USER_COLUMNS: &str = "id, external_id, email, name, image_url, created_at, updated_at";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get::<String>(0)?,
        external_id: row.get::<String>(1)?,
        email: get_opt_string(row, 2)?,
        name: row.get::<String>(3)?,
        image_url: get_opt_string(row, 4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        updated_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl MirrorService {
    /// Get a user by internal id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
        let mut rows = self.db().conn().query(&sql, [id]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    /// Get a user by upstream subject identifier.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_user_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE external_id = ?1");
        let mut rows = self.db().conn().query(&sql, [external_id]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    /// Insert a new user with `created_at` and `updated_at` set to now.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::UniqueViolation` if a row with the same
    /// `external_id` already exists.
    pub async fn insert_user(&self, new: &NewUser) -> Result<User, DatabaseError> {
        let now = Utc::now();
        let stamp = now.to_rfc3339();
        let stamp = stamp.as_str();
        let conn = self.db().conn();

        let id = self
            .db()
            .insert_with_fresh_id(PREFIX_USER, |id| async move {
                conn.execute(
                    "INSERT INTO users (id, external_id, email, name, image_url, created_at, updated_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                    libsql::params![
                        id.as_str(),
                        new.external_id.as_str(),
                        new.email.as_deref(),
                        new.name.as_str(),
                        new.image_url.as_deref(),
                        stamp
                    ],
                )
                .await
            })
            .await?;

        Ok(User {
            id,
            external_id: new.external_id.clone(),
            email: new.email.clone(),
            name: new.name.clone(),
            image_url: new.image_url.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Patch the supplied fields and refresh `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no user has this id.
    pub async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<(), DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref email) = update.email {
            sets.push(format!("email = ?{idx}"));
            params.push(email.clone().into());
            idx += 1;
        }
        if let Some(ref name) = update.name {
            sets.push(format!("name = ?{idx}"));
            params.push(name.clone().into());
            idx += 1;
        }
        if let Some(ref image_url) = update.image_url {
            sets.push(format!("image_url = ?{idx}"));
            params.push(image_url.clone().into());
            idx += 1;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(id.into());
        let sql = format!("UPDATE users SET {} WHERE id = ?{idx}", sets.join(", "));
        let changed = self
            .db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await
            .map_err(DatabaseError::from_write)?;

        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }

    /// Delete a user row. Memberships must already be gone (foreign keys).
    ///
    /// Deleting an id that does not exist is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the delete fails, including a foreign-key
    /// rejection while memberships still reference the user.
    pub async fn delete_user(&self, id: &str) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute("DELETE FROM users WHERE id = ?1", [id])
            .await?;
        Ok(())
    }

    /// List users, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_users(&self, limit: u32) -> Result<Vec<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY updated_at DESC, id LIMIT ?1");
        let mut rows = self.db().conn().query(&sql, [i64::from(limit)]).await?;
        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(row_to_user(&row)?);
        }
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_membership, seed_organisation, seed_user, test_service};
    use crate::updates::UserUpdateBuilder;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn insert_and_get_user() {
        let svc = test_service().await;
        let new = NewUser::new("user_1", "Ada Lovelace")
            .with_email(Some("ada@example.com"))
            .with_image_url(Some("https://img.example/ada.png"));
        let user = svc.insert_user(&new).await.unwrap();

        assert!(user.id.starts_with("usr-"));
        assert_eq!(user.created_at, user.updated_at);

        let fetched = svc.get_user(&user.id).await.unwrap().unwrap();
        assert_eq!(fetched.external_id, "user_1");
        assert_eq!(fetched.name, "Ada Lovelace");
        assert_eq!(fetched.email.as_deref(), Some("ada@example.com"));
        assert_eq!(fetched.image_url.as_deref(), Some("https://img.example/ada.png"));
    }

    #[tokio::test]
    async fn find_by_external_id() {
        let svc = test_service().await;
        let user = seed_user(&svc, "user_1").await;

        let found = svc.find_user_by_external_id("user_1").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
        assert!(svc.find_user_by_external_id("user_2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_missing_user_is_none() {
        let svc = test_service().await;
        assert!(svc.get_user("usr-00000000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_external_id_is_unique_violation() {
        let svc = test_service().await;
        seed_user(&svc, "user_1").await;

        let err = svc
            .insert_user(&NewUser::new("user_1", "Someone Else"))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation(), "got {err}");
    }

    #[tokio::test]
    async fn update_patches_only_supplied_fields() {
        let svc = test_service().await;
        let user = svc
            .insert_user(&NewUser::new("user_1", "Ada").with_email(Some("ada@example.com")))
            .await
            .unwrap();

        let update = UserUpdateBuilder::new().name("Ada Lovelace").build();
        svc.update_user(&user.id, &update).await.unwrap();

        let fetched = svc.get_user(&user.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Ada Lovelace");
        assert_eq!(fetched.email.as_deref(), Some("ada@example.com"));
        assert_eq!(fetched.created_at, user.created_at);
        assert!(fetched.updated_at >= user.updated_at);
    }

    #[tokio::test]
    async fn empty_update_still_refreshes_timestamp() {
        let svc = test_service().await;
        let user = seed_user(&svc, "user_1").await;

        svc.update_user(&user.id, &UserUpdate::default()).await.unwrap();
        let fetched = svc.get_user(&user.id).await.unwrap().unwrap();
        assert!(fetched.updated_at >= user.updated_at);
        assert_eq!(fetched.name, user.name);
    }

    #[tokio::test]
    async fn update_missing_user_is_no_result() {
        let svc = test_service().await;
        let update = UserUpdateBuilder::new().name("Ghost").build();
        let result = svc.update_user("usr-00000000", &update).await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn delete_user_removes_row() {
        let svc = test_service().await;
        let user = seed_user(&svc, "user_1").await;

        svc.delete_user(&user.id).await.unwrap();
        assert!(svc.get_user(&user.id).await.unwrap().is_none());

        // Second delete is a no-op.
        svc.delete_user(&user.id).await.unwrap();
    }

    #[tokio::test]
    async fn delete_user_with_memberships_is_rejected() {
        let svc = test_service().await;
        let user = seed_user(&svc, "user_1").await;
        let org = seed_organisation(&svc, "org_1").await;
        seed_membership(&svc, &user, &org, "org:member").await;

        let result = svc.delete_user(&user.id).await;
        assert!(result.is_err(), "foreign key should block orphaning memberships");
        assert!(svc.get_user(&user.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn list_users_respects_limit() {
        let svc = test_service().await;
        for i in 0..5 {
            seed_user(&svc, &format!("user_{i}")).await;
        }
        assert_eq!(svc.list_users(3).await.unwrap().len(), 3);
        assert_eq!(svc.list_users(10).await.unwrap().len(), 5);
    }
}
