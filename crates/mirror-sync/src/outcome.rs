use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What a single reconciliation did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// A new row was written.
    Inserted,
    /// An existing row was patched.
    Patched,
    /// The row already matched; nothing was written.
    Unchanged,
    /// The row was deleted after `cascaded` dependent memberships.
    Deleted { cascaded: u32 },
    /// Delete target not present. A valid terminal state.
    Absent,
    /// The payload lacked an identifying field or could not be decoded.
    Skipped,
    /// The event kind is not one the mirror handles.
    Ignored,
}

impl SyncOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inserted => "inserted",
            Self::Patched => "patched",
            Self::Unchanged => "unchanged",
            Self::Deleted { .. } => "deleted",
            Self::Absent => "absent",
            Self::Skipped => "skipped",
            Self::Ignored => "ignored",
        }
    }

    /// Whether the store was written to.
    #[must_use]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Inserted | Self::Patched | Self::Deleted { .. })
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deleted { cascaded } => write!(f, "deleted (cascaded {cascaded})"),
            other => f.write_str(other.as_str()),
        }
    }
}
