use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A mirrored upstream organisation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Organisation {
    /// Internal reference assigned by the store (`org-…`).
    pub id: String,
    /// Upstream organisation identifier. Unique and immutable.
    pub external_id: String,
    pub name: String,
    pub slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
