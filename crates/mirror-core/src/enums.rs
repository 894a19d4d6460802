//! Event kinds and entity kinds for the identity mirror.
//!
//! `EventKind` covers the webhook tags the mirror reconciles. Tags outside
//! this set are not an error: `EventKind::parse` returns `None` and the
//! dispatcher ignores the event.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// The three mirrored entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Organisation,
    Membership,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Organisation => "organisation",
            Self::Membership => "membership",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EventKind
// ---------------------------------------------------------------------------

/// Webhook event tags the mirror reconciles.
///
/// Created and updated tags for an entity collapse onto the same upsert path;
/// deleted tags map to the delete path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum EventKind {
    #[serde(rename = "user.created")]
    UserCreated,
    #[serde(rename = "user.updated")]
    UserUpdated,
    #[serde(rename = "user.deleted")]
    UserDeleted,
    #[serde(rename = "organization.created")]
    OrganisationCreated,
    #[serde(rename = "organization.updated")]
    OrganisationUpdated,
    #[serde(rename = "organization.deleted")]
    OrganisationDeleted,
    #[serde(rename = "organizationMembership.created")]
    MembershipCreated,
    #[serde(rename = "organizationMembership.updated")]
    MembershipUpdated,
    #[serde(rename = "organizationMembership.deleted")]
    MembershipDeleted,
}

impl EventKind {
    pub const ALL: [Self; 9] = [
        Self::UserCreated,
        Self::UserUpdated,
        Self::UserDeleted,
        Self::OrganisationCreated,
        Self::OrganisationUpdated,
        Self::OrganisationDeleted,
        Self::MembershipCreated,
        Self::MembershipUpdated,
        Self::MembershipDeleted,
    ];

    /// Parse a wire tag. Returns `None` for tags the mirror does not handle.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }

    /// The wire tag as sent by the identity provider.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserCreated => "user.created",
            Self::UserUpdated => "user.updated",
            Self::UserDeleted => "user.deleted",
            Self::OrganisationCreated => "organization.created",
            Self::OrganisationUpdated => "organization.updated",
            Self::OrganisationDeleted => "organization.deleted",
            Self::MembershipCreated => "organizationMembership.created",
            Self::MembershipUpdated => "organizationMembership.updated",
            Self::MembershipDeleted => "organizationMembership.deleted",
        }
    }

    /// Which entity kind the event reconciles.
    #[must_use]
    pub const fn entity(self) -> EntityKind {
        match self {
            Self::UserCreated | Self::UserUpdated | Self::UserDeleted => EntityKind::User,
            Self::OrganisationCreated | Self::OrganisationUpdated | Self::OrganisationDeleted => {
                EntityKind::Organisation
            }
            Self::MembershipCreated | Self::MembershipUpdated | Self::MembershipDeleted => {
                EntityKind::Membership
            }
        }
    }

    #[must_use]
    pub const fn is_delete(self) -> bool {
        matches!(
            self,
            Self::UserDeleted | Self::OrganisationDeleted | Self::MembershipDeleted
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("user.created", EventKind::UserCreated)]
    #[case("user.updated", EventKind::UserUpdated)]
    #[case("user.deleted", EventKind::UserDeleted)]
    #[case("organization.created", EventKind::OrganisationCreated)]
    #[case("organization.updated", EventKind::OrganisationUpdated)]
    #[case("organization.deleted", EventKind::OrganisationDeleted)]
    #[case("organizationMembership.created", EventKind::MembershipCreated)]
    #[case("organizationMembership.updated", EventKind::MembershipUpdated)]
    #[case("organizationMembership.deleted", EventKind::MembershipDeleted)]
    fn parse_recognized_tags(#[case] tag: &str, #[case] expected: EventKind) {
        assert_eq!(EventKind::parse(tag), Some(expected));
        assert_eq!(expected.as_str(), tag);
    }

    #[rstest]
    #[case("session.created")]
    #[case("email.created")]
    #[case("organizationInvitation.accepted")]
    #[case("USER.CREATED")]
    #[case("")]
    fn parse_unknown_tags(#[case] tag: &str) {
        assert_eq!(EventKind::parse(tag), None);
    }

    #[test]
    fn serde_uses_wire_tags() {
        for kind in EventKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            let recovered: EventKind = serde_json::from_str(&json).unwrap();
            assert_eq!(recovered, kind);
        }
    }

    #[test]
    fn only_deleted_tags_are_deletes() {
        let deletes: Vec<_> = EventKind::ALL.into_iter().filter(|k| k.is_delete()).collect();
        assert_eq!(
            deletes,
            vec![
                EventKind::UserDeleted,
                EventKind::OrganisationDeleted,
                EventKind::MembershipDeleted
            ]
        );
    }

    #[test]
    fn entity_grouping() {
        assert_eq!(EventKind::UserUpdated.entity(), EntityKind::User);
        assert_eq!(EventKind::OrganisationDeleted.entity(), EntityKind::Organisation);
        assert_eq!(EventKind::MembershipCreated.entity(), EntityKind::Membership);
    }
}
