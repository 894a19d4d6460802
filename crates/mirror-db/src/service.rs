//! Service handle that all repositories hang off.
//!
//! `MirrorService` wraps `MirrorDb` (raw database access). Every repository
//! method is implemented as an `impl MirrorService` block in `repos/`, and the
//! service implements [`crate::store::IdentityStore`] for the reconcilers.

use mirror_config::DatabaseConfig;

use crate::MirrorDb;
use crate::error::DatabaseError;

pub struct MirrorService {
    db: MirrorDb,
}

impl MirrorService {
    /// Open the database described by `config` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        Ok(Self::from_db(MirrorDb::open(config).await?))
    }

    /// Create a service over a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        Ok(Self::from_db(MirrorDb::open_local(db_path).await?))
    }

    /// Create from an existing `MirrorDb`.
    #[must_use]
    pub const fn from_db(db: MirrorDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &MirrorDb {
        &self.db
    }
}
