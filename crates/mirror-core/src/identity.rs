use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Lightweight authenticated caller identity for the query surface.
///
/// Produced by whatever authenticates the caller's session upstream; the
/// mirror only reads `subject` to resolve the caller's own `User` row.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuthIdentity {
    /// Upstream subject identifier (JWT `sub`), equal to `User::external_id`.
    pub subject: String,
    /// Active organisation id (JWT `org_id`). `None` = personal session.
    pub org_id: Option<String>,
    /// Active organisation role (JWT `org_role`, e.g. `"org:admin"`).
    pub org_role: Option<String>,
}

impl AuthIdentity {
    /// Identity carrying only a subject, with no active organisation.
    #[must_use]
    pub fn subject(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            org_id: None,
            org_role: None,
        }
    }
}
