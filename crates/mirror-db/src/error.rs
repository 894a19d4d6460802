//! Database error types for mirror-db.

use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned unparseable data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a row but none was found.
    #[error("No result returned")]
    NoResult,

    /// An insert collided with a natural-key UNIQUE index (a racing writer
    /// got there first).
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A generated internal id was already taken.
    #[error("Generated id collided: {0}")]
    IdCollision(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}

const UNIQUE_FAILED: &str = "UNIQUE constraint failed: ";

/// First `table.column` named in a SQLite UNIQUE failure message.
fn unique_column(msg: &str) -> Option<&str> {
    let start = msg.find(UNIQUE_FAILED)? + UNIQUE_FAILED.len();
    let rest = &msg[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '.'))
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

impl DatabaseError {
    /// Whether this error is a rejected duplicate insert.
    #[must_use]
    pub const fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Classify a libSQL error raised by a write.
    ///
    /// Only the natural keys (`external_id`, and the membership pair which
    /// leads with `user_id`) map to `UniqueViolation`. A primary-key hit is an
    /// `IdCollision`. Foreign-key and other errors stay `LibSql`.
    pub(crate) fn from_write(e: libsql::Error) -> Self {
        let msg = e.to_string();
        match unique_column(&msg) {
            Some(column) if column.ends_with(".id") => Self::IdCollision(msg),
            Some(column)
                if column.ends_with(".external_id") || column == "memberships.user_id" =>
            {
                Self::UniqueViolation(msg)
            }
            _ => Self::LibSql(e),
        }
    }
}
