//! Membership repository.
//!
//! Memberships are addressed by the (`user_id`, `organisation_id`) pair of
//! internal ids. Listing by either side backs the delete cascades and the
//! read queries.

use chrono::Utc;

use mirror_core::entities::Membership;
use mirror_core::ids::PREFIX_MEMBERSHIP;

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::service::MirrorService;
use crate::updates::NewMembership;

const MEMBERSHIP_COLUMNS: &str = "id, user_id, organisation_id, role, joined_at";

fn row_to_membership(row: &libsql::Row) -> Result<Membership, DatabaseError> {
    Ok(Membership {
        id: row.get::<String>(0)?,
        user_id: row.get::<String>(1)?,
        organisation_id: row.get::<String>(2)?,
        role: row.get::<String>(3)?,
        joined_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

async fn collect_memberships(mut rows: libsql::Rows) -> Result<Vec<Membership>, DatabaseError> {
    let mut memberships = Vec::new();
    while let Some(row) = rows.next().await? {
        memberships.push(row_to_membership(&row)?);
    }
    Ok(memberships)
}

impl MirrorService {
    pub async fn find_membership(
        &self,
        user_id: &str,
        organisation_id: &str,
    ) -> Result<Option<Membership>, DatabaseError> {
        let sql = format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM memberships WHERE user_id = ?1 AND organisation_id = ?2"
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, [user_id, organisation_id])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_membership(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_memberships_by_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Membership>, DatabaseError> {
        let sql = format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM memberships WHERE user_id = ?1 ORDER BY joined_at, id"
        );
        let rows = self.db().conn().query(&sql, [user_id]).await?;
        collect_memberships(rows).await
    }

    pub async fn list_memberships_by_organisation(
        &self,
        organisation_id: &str,
    ) -> Result<Vec<Membership>, DatabaseError> {
        let sql = format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM memberships WHERE organisation_id = ?1 ORDER BY joined_at, id"
        );
        let rows = self.db().conn().query(&sql, [organisation_id]).await?;
        collect_memberships(rows).await
    }

    /// Insert a membership, stamping `joined_at` with the current time.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::UniqueViolation` if the pair is already linked,
    /// or a libSQL foreign-key error if either parent is missing.
    pub async fn insert_membership(&self, new: &NewMembership) -> Result<Membership, DatabaseError> {
        let now = Utc::now();
        let stamp = now.to_rfc3339();
        let stamp = stamp.as_str();
        let conn = self.db().conn();

        let id = self
            .db()
            .insert_with_fresh_id(PREFIX_MEMBERSHIP, |id| async move {
                conn.execute(
                    "INSERT INTO memberships (id, user_id, organisation_id, role, joined_at)
                         VALUES (?1, ?2, ?3, ?4, ?5)",
                    libsql::params![
                        id.as_str(),
                        new.user_id.as_str(),
                        new.organisation_id.as_str(),
                        new.role.as_str(),
                        stamp
                    ],
                )
                .await
            })
            .await?;

        Ok(Membership {
            id,
            user_id: new.user_id.clone(),
            organisation_id: new.organisation_id.clone(),
            role: new.role.clone(),
            joined_at: now,
        })
    }

    /// Replace the role. `joined_at` is left alone.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no membership has this id.
    pub async fn set_membership_role(&self, id: &str, role: &str) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE memberships SET role = ?1 WHERE id = ?2",
                libsql::params![role, id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }

    pub async fn delete_membership(&self, id: &str) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute("DELETE FROM memberships WHERE id = ?1", [id])
            .await?;
        Ok(())
    }
}
