//! # mirror-db
//!
//! libSQL persistence for the identity mirror.
//!
//! Holds the mirrored `users`, `organisations`, and `memberships` tables and
//! exposes them through per-entity repositories on [`service::MirrorService`]
//! and the [`store::IdentityStore`] capability consumed by the reconcilers.
//!
//! Uses the `libsql` crate: a local embedded database for development and
//! tests (`:memory:`), or a remote Turso database in production.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod store;
pub mod updates;

#[cfg(test)]
pub(crate) mod test_support;

use error::DatabaseError;
use libsql::Builder;
use mirror_config::DatabaseConfig;
use mirror_core::ids::format_id;

/// Central database handle for all mirror state.
pub struct MirrorDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    remote: bool,
}

impl MirrorDb {
    /// Open the database described by `config`: remote when URL and token are
    /// set, otherwise the local file at `config.path`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrations fail.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if config.is_remote() {
            Self::open_remote(&config.url, &config.auth_token).await
        } else {
            Self::open_local(&config.path).await
        }
    }

    /// Open a local-only database at the given path.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        enable_foreign_keys(&conn).await?;

        let mirror_db = Self {
            db,
            conn,
            remote: false,
        };
        mirror_db.run_migrations().await?;
        tracing::debug!(path, "opened local mirror database");
        Ok(mirror_db)
    }

    /// Open a remote libSQL/Turso database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection cannot be established or
    /// migrations fail.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        let conn = db.connect()?;
        enable_foreign_keys(&conn).await?;

        let mirror_db = Self {
            db,
            conn,
            remote: true,
        };
        mirror_db.run_migrations().await?;
        tracing::debug!(url, "opened remote mirror database");
        Ok(mirror_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.remote
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"usr-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query("SELECT lower(hex(randomblob(4)))", ())
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(format_id(prefix, &row.get::<String>(0)?))
    }

    /// Run `insert` with a freshly generated id, drawing another id if the
    /// previous one was already taken. Returns the id that was written.
    ///
    /// # Errors
    ///
    /// Returns the classified write error, or `DatabaseError::IdCollision`
    /// once `ID_ATTEMPTS` ids in a row have collided.
    pub(crate) async fn insert_with_fresh_id<F, Fut>(
        &self,
        prefix: &str,
        insert: F,
    ) -> Result<String, DatabaseError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<u64, libsql::Error>>,
    {
        let mut attempt = 1;
        loop {
            let id = self.generate_id(prefix).await?;
            match insert(id.clone()).await.map_err(DatabaseError::from_write) {
                Ok(_) => return Ok(id),
                Err(DatabaseError::IdCollision(_)) if attempt < ID_ATTEMPTS => {
                    tracing::debug!(prefix, %id, attempt, "generated id taken, drawing another");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

const ID_ATTEMPTS: u32 = 3;

/// Foreign keys are a per-connection setting in SQLite.
async fn enable_foreign_keys(conn: &libsql::Connection) -> Result<(), DatabaseError> {
    conn.execute("PRAGMA foreign_keys = ON", ())
        .await
        .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;
    Ok(())
}
