//! Organisation repository.

use chrono::Utc;

use mirror_core::entities::Organisation;
use mirror_core::ids::PREFIX_ORGANISATION;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, opt_value, parse_datetime};
use crate::service::MirrorService;
use crate::updates::{NewOrganisation, OrganisationUpdate};

const ORGANISATION_COLUMNS: &str = "id, external_id, name, slug, created_at, updated_at";

fn row_to_organisation(row: &libsql::Row) -> Result<Organisation, DatabaseError> {
    Ok(Organisation {
        id: row.get::<String>(0)?,
        external_id: row.get::<String>(1)?,
        name: row.get::<String>(2)?,
        slug: get_opt_string(row, 3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        updated_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl MirrorService {
    pub async fn get_organisation(&self, id: &str) -> Result<Option<Organisation>, DatabaseError> {
        let sql = format!("SELECT {ORGANISATION_COLUMNS} FROM organisations WHERE id = ?1");
        let mut rows = self.db().conn().query(&sql, [id]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_organisation(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn find_organisation_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Organisation>, DatabaseError> {
        let sql = format!("SELECT {ORGANISATION_COLUMNS} FROM organisations WHERE external_id = ?1");
        let mut rows = self.db().conn().query(&sql, [external_id]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_organisation(&row)?)),
            None => Ok(None),
        }
    }

    /// Insert a new organisation.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::UniqueViolation` if the external id is taken.
    pub async fn insert_organisation(
        &self,
        new: &NewOrganisation,
    ) -> Result<Organisation, DatabaseError> {
        let now = Utc::now();
        let stamp = now.to_rfc3339();
        let stamp = stamp.as_str();
        let conn = self.db().conn();

        let id = self
            .db()
            .insert_with_fresh_id(PREFIX_ORGANISATION, |id| async move {
                conn.execute(
                    "INSERT INTO organisations (id, external_id, name, slug, created_at, updated_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                    libsql::params![
                        id.as_str(),
                        new.external_id.as_str(),
                        new.name.as_str(),
                        new.slug.as_deref(),
                        stamp
                    ],
                )
                .await
            })
            .await?;

        Ok(Organisation {
            id,
            external_id: new.external_id.clone(),
            name: new.name.clone(),
            slug: new.slug.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Patch the supplied fields and refresh `updated_at`. A `slug` of
    /// `Some(None)` writes NULL.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no organisation has this id.
    pub async fn update_organisation(
        &self,
        id: &str,
        update: &OrganisationUpdate,
    ) -> Result<(), DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref name) = update.name {
            sets.push(format!("name = ?{idx}"));
            params.push(name.clone().into());
            idx += 1;
        }
        if let Some(ref slug) = update.slug {
            sets.push(format!("slug = ?{idx}"));
            params.push(opt_value(slug.as_deref()));
            idx += 1;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(id.into());
        let sql = format!(
            "UPDATE organisations SET {} WHERE id = ?{idx}",
            sets.join(", ")
        );
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

    /// Delete an organisation row. Memberships must already be gone.
    pub async fn delete_organisation(&self, id: &str) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute("DELETE FROM organisations WHERE id = ?1", [id])
            .await?;
        Ok(())
    }

    pub async fn list_organisations(&self, limit: u32) -> Result<Vec<Organisation>, DatabaseError> {
        let sql = format!(
            "SELECT {ORGANISATION_COLUMNS} FROM organisations ORDER BY updated_at DESC, id LIMIT ?1"
        );
        let mut rows = self.db().conn().query(&sql, [i64::from(limit)]).await?;
        let mut organisations = Vec::new();
        while let Some(row) = rows.next().await? {
            organisations.push(row_to_organisation(&row)?);
        }
        Ok(organisations)
    }
}
