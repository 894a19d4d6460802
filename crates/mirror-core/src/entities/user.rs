use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A mirrored upstream user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct User {
    /// Internal reference assigned by the store (`usr-…`).
    pub id: String,
    /// Upstream subject identifier. Unique and immutable.
    pub external_id: String,
    pub email: Option<String>,
    pub name: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
