use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Link between a mirrored user and a mirrored organisation.
///
/// References internal ids only. At most one row exists per
/// (`user_id`, `organisation_id`) pair.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Membership {
    pub id: String,
    pub user_id: String,
    pub organisation_id: String,
    /// Upstream role string, e.g. `"org:admin"` or `"org:member"`.
    pub role: String,
    /// Set once on insert; role changes never touch it.
    pub joined_at: DateTime<Utc>,
}
