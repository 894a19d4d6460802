//! Inbound webhook events and their typed payloads.
//!
//! The identity provider delivers `{"type": "...", "data": {...}}` envelopes
//! with a loosely shaped `data` object. `IdentityEvent::decode` turns an
//! envelope into a tagged variant per event kind whose payload fields are all
//! explicit `Option`s. Unknown fields are ignored. The extraction helpers on
//! each payload are pure and return `None` instead of guessing when an
//! identifying field is absent.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::enums::EventKind;
use crate::errors::CoreError;

/// Name written for users whose payload carries no usable name.
pub const DEFAULT_USER_NAME: &str = "Unnamed";

/// Name written for organisations whose payload carries no name.
pub const DEFAULT_ORGANISATION_NAME: &str = "Untitled Organisation";

/// Role assigned when a membership payload carries none.
pub const DEFAULT_MEMBERSHIP_ROLE: &str = "org:member";

/// Raw webhook envelope as delivered by the event receiver.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EventEnvelope {
    /// Event tag, e.g. `"user.created"`. Any string is accepted.
    #[serde(rename = "type")]
    pub kind: String,
    /// Payload whose shape depends on `kind`.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl EventEnvelope {
    #[must_use]
    pub fn new(kind: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }
}

// ---------------------------------------------------------------------------
// Payload fragments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(default)]
pub struct EmailAddress {
    pub email_address: Option<String>,
}

/// `public_user_data` fragment carried by membership-shaped payloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(default)]
pub struct PublicUserData {
    pub user_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Primary identifier of the user, usually an email address.
    pub identifier: Option<String>,
    pub image_url: Option<String>,
}

impl PublicUserData {
    /// Best-effort name for a user synthesized from this fragment.
    #[must_use]
    pub fn fallback_name(&self) -> String {
        joined_name(self.first_name.as_deref(), self.last_name.as_deref())
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_string())
    }

    /// Best-effort email for a user synthesized from this fragment.
    #[must_use]
    pub fn fallback_email(&self) -> Option<&str> {
        non_empty(self.identifier.as_deref())
    }
}

/// `organization` fragment carried by membership-shaped payloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(default)]
pub struct OrganisationRef {
    pub id: Option<String>,
    pub name: Option<String>,
    pub slug: Option<String>,
}

impl OrganisationRef {
    #[must_use]
    pub fn fallback_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_ORGANISATION_NAME)
    }
}

// ---------------------------------------------------------------------------
// Per-kind payloads
// ---------------------------------------------------------------------------

/// Payload of `user.created` / `user.updated`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(default)]
pub struct UserPayload {
    pub id: Option<String>,
    pub email_addresses: Option<Vec<EmailAddress>>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub image_url: Option<String>,
    /// Present when the payload originates from a membership-shaped event.
    pub public_user_data: Option<PublicUserData>,
}

impl UserPayload {
    /// Upstream subject id: `id`, falling back to `public_user_data.user_id`.
    #[must_use]
    pub fn external_id(&self) -> Option<&str> {
        let id = self
            .id
            .as_deref()
            .or_else(|| self.public_user_data.as_ref()?.user_id.as_deref());
        non_empty(id)
    }

    /// First listed email address, if any.
    #[must_use]
    pub fn primary_email(&self) -> Option<&str> {
        let first = self.email_addresses.as_ref()?.first()?;
        non_empty(first.email_address.as_deref())
    }

    /// Given and family name joined and trimmed, else `full_name`, else
    /// [`DEFAULT_USER_NAME`].
    #[must_use]
    pub fn display_name(&self) -> String {
        joined_name(self.first_name.as_deref(), self.last_name.as_deref())
            .or_else(|| non_empty(self.full_name.as_deref()).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_string())
    }

    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        non_empty(self.image_url.as_deref())
    }
}

/// Payload of `organization.created` / `organization.updated`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(default)]
pub struct OrganisationPayload {
    pub id: Option<String>,
    pub name: Option<String>,
    pub slug: Option<String>,
    /// Present when the payload originates from a membership-shaped event.
    pub organization: Option<OrganisationRef>,
}

impl OrganisationPayload {
    /// Upstream organisation id: `id`, falling back to `organization.id`.
    #[must_use]
    pub fn external_id(&self) -> Option<&str> {
        let id = self
            .id
            .as_deref()
            .or_else(|| self.organization.as_ref()?.id.as_deref());
        non_empty(id)
    }

    /// `name`, or [`DEFAULT_ORGANISATION_NAME`] when the field is absent.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_ORGANISATION_NAME)
    }

    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }
}

/// Payload of `organizationMembership.*` events.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(default)]
pub struct MembershipPayload {
    pub id: Option<String>,
    pub role: Option<String>,
    pub organization: Option<OrganisationRef>,
    pub public_user_data: Option<PublicUserData>,
}

impl MembershipPayload {
    #[must_use]
    pub fn organisation_external_id(&self) -> Option<&str> {
        non_empty(self.organization.as_ref()?.id.as_deref())
    }

    #[must_use]
    pub fn user_external_id(&self) -> Option<&str> {
        non_empty(self.public_user_data.as_ref()?.user_id.as_deref())
    }

    /// `role`, or [`DEFAULT_MEMBERSHIP_ROLE`] when the field is absent.
    #[must_use]
    pub fn role(&self) -> &str {
        self.role.as_deref().unwrap_or(DEFAULT_MEMBERSHIP_ROLE)
    }
}

/// Payload of `user.deleted` / `organization.deleted`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(default)]
pub struct DeletedObject {
    pub id: Option<String>,
    pub deleted: Option<bool>,
}

impl DeletedObject {
    #[must_use]
    pub fn external_id(&self) -> Option<&str> {
        non_empty(self.id.as_deref())
    }
}

// ---------------------------------------------------------------------------
// IdentityEvent
// ---------------------------------------------------------------------------

/// A decoded event, one variant per reconciliation path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEvent {
    UserUpserted(UserPayload),
    UserDeleted(DeletedObject),
    OrganisationUpserted(OrganisationPayload),
    OrganisationDeleted(DeletedObject),
    MembershipUpserted(MembershipPayload),
    MembershipDeleted(MembershipPayload),
    /// A tag the mirror does not handle. Carries the raw tag for logging.
    Unrecognized(String),
}

impl IdentityEvent {
    /// Decode an envelope into its typed variant.
    ///
    /// A `null` or missing `data` decodes as an empty payload, which the
    /// reconcilers treat as a no-op.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MalformedPayload` if `data` has a shape that cannot
    /// be read as the kind's payload (e.g. a string, or a numeric `id`).
    pub fn decode(envelope: &EventEnvelope) -> Result<Self, CoreError> {
        let Some(kind) = EventKind::parse(&envelope.kind) else {
            return Ok(Self::Unrecognized(envelope.kind.clone()));
        };
        let data = &envelope.data;

        let event = match kind {
            EventKind::UserCreated | EventKind::UserUpdated => {
                Self::UserUpserted(decode_payload(kind, data)?)
            }
            EventKind::UserDeleted => Self::UserDeleted(decode_payload(kind, data)?),
            EventKind::OrganisationCreated | EventKind::OrganisationUpdated => {
                Self::OrganisationUpserted(decode_payload(kind, data)?)
            }
            EventKind::OrganisationDeleted => {
                Self::OrganisationDeleted(decode_payload(kind, data)?)
            }
            EventKind::MembershipCreated | EventKind::MembershipUpdated => {
                Self::MembershipUpserted(decode_payload(kind, data)?)
            }
            EventKind::MembershipDeleted => Self::MembershipDeleted(decode_payload(kind, data)?),
        };
        Ok(event)
    }
}

fn decode_payload<T>(kind: EventKind, data: &serde_json::Value) -> Result<T, CoreError>
where
    T: DeserializeOwned + Default,
{
    if data.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(data.clone()).map_err(|e| CoreError::MalformedPayload {
        event: kind.as_str().to_string(),
        reason: e.to_string(),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn joined_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    let joined = format!("{} {}", first.unwrap_or_default(), last.unwrap_or_default());
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn user(data: serde_json::Value) -> UserPayload {
        serde_json::from_value(data).unwrap()
    }

    #[rstest]
    #[case(json!({"first_name": "Ada", "last_name": "Lovelace"}), "Ada Lovelace")]
    #[case(json!({"first_name": "Ada", "last_name": null}), "Ada")]
    #[case(json!({"last_name": "Lovelace"}), "Lovelace")]
    #[case(json!({"first_name": "  ", "full_name": "Countess Lovelace"}), "Countess Lovelace")]
    #[case(json!({"full_name": "Countess Lovelace"}), "Countess Lovelace")]
    #[case(json!({"full_name": ""}), "Unnamed")]
    #[case(json!({}), "Unnamed")]
    fn display_name_fallback_chain(#[case] data: serde_json::Value, #[case] expected: &str) {
        assert_eq!(user(data).display_name(), expected);
    }

    #[test]
    fn external_id_prefers_id_over_public_user_data() {
        let payload = user(json!({"id": "user_1", "public_user_data": {"user_id": "user_2"}}));
        assert_eq!(payload.external_id(), Some("user_1"));
    }

    #[test]
    fn external_id_falls_back_to_public_user_data() {
        let payload = user(json!({"public_user_data": {"user_id": "user_2"}}));
        assert_eq!(payload.external_id(), Some("user_2"));
    }

    #[test]
    fn external_id_absent_or_empty_is_none() {
        assert_eq!(user(json!({})).external_id(), None);
        assert_eq!(user(json!({"id": ""})).external_id(), None);
    }

    #[test]
    fn primary_email_reads_first_entry_only() {
        let payload = user(json!({
            "email_addresses": [
                {"email_address": "ada@example.com", "id": "idn_1"},
                {"email_address": "other@example.com"}
            ]
        }));
        assert_eq!(payload.primary_email(), Some("ada@example.com"));
        assert_eq!(user(json!({"email_addresses": []})).primary_email(), None);
        assert_eq!(user(json!({"email_addresses": null})).primary_email(), None);
    }

    #[test]
    fn empty_image_url_is_absent() {
        assert_eq!(user(json!({"image_url": ""})).image_url(), None);
        assert_eq!(
            user(json!({"image_url": "https://img.example/a.png"})).image_url(),
            Some("https://img.example/a.png")
        );
    }

    #[test]
    fn organisation_defaults_name_only_when_absent() {
        let payload: OrganisationPayload = serde_json::from_value(json!({"id": "org_1"})).unwrap();
        assert_eq!(payload.name(), DEFAULT_ORGANISATION_NAME);
        assert_eq!(payload.slug(), None);

        let named: OrganisationPayload =
            serde_json::from_value(json!({"id": "org_1", "name": "Acme", "slug": "acme"})).unwrap();
        assert_eq!(named.name(), "Acme");
        assert_eq!(named.slug(), Some("acme"));
    }

    #[test]
    fn organisation_external_id_falls_back_to_nested_ref() {
        let payload: OrganisationPayload =
            serde_json::from_value(json!({"organization": {"id": "org_9"}})).unwrap();
        assert_eq!(payload.external_id(), Some("org_9"));
    }

    #[test]
    fn membership_extractors() {
        let payload: MembershipPayload = serde_json::from_value(json!({
            "id": "orgmem_1",
            "organization": {"id": "org_1", "name": "Acme"},
            "public_user_data": {"user_id": "user_1", "identifier": "ada@example.com"}
        }))
        .unwrap();
        assert_eq!(payload.organisation_external_id(), Some("org_1"));
        assert_eq!(payload.user_external_id(), Some("user_1"));
        assert_eq!(payload.role(), DEFAULT_MEMBERSHIP_ROLE);
    }

    #[test]
    fn membership_missing_ids_are_none() {
        let payload: MembershipPayload =
            serde_json::from_value(json!({"role": "org:admin", "organization": {}})).unwrap();
        assert_eq!(payload.organisation_external_id(), None);
        assert_eq!(payload.user_external_id(), None);
        assert_eq!(payload.role(), "org:admin");
    }

    #[test]
    fn public_user_data_fallbacks() {
        let fragment = PublicUserData {
            user_id: Some("user_1".into()),
            first_name: Some("Ada".into()),
            identifier: Some("ada@example.com".into()),
            ..Default::default()
        };
        assert_eq!(fragment.fallback_name(), "Ada");
        assert_eq!(fragment.fallback_email(), Some("ada@example.com"));
        assert_eq!(PublicUserData::default().fallback_name(), DEFAULT_USER_NAME);
    }

    #[test]
    fn decode_routes_created_and_updated_to_upsert() {
        for tag in ["user.created", "user.updated"] {
            let event =
                IdentityEvent::decode(&EventEnvelope::new(tag, json!({"id": "user_1"}))).unwrap();
            assert!(matches!(event, IdentityEvent::UserUpserted(ref p) if p.id.as_deref() == Some("user_1")));
        }
    }

    #[test]
    fn decode_deleted_object() {
        let event = IdentityEvent::decode(&EventEnvelope::new(
            "organization.deleted",
            json!({"id": "org_1", "deleted": true, "object": "organization"}),
        ))
        .unwrap();
        assert_eq!(
            event,
            IdentityEvent::OrganisationDeleted(DeletedObject {
                id: Some("org_1".into()),
                deleted: Some(true),
            })
        );
    }

    #[test]
    fn decode_unknown_tag_is_unrecognized() {
        let event =
            IdentityEvent::decode(&EventEnvelope::new("session.created", json!({"id": "sess_1"})))
                .unwrap();
        assert_eq!(event, IdentityEvent::Unrecognized("session.created".into()));
    }

    #[test]
    fn decode_null_data_is_empty_payload() {
        let event =
            IdentityEvent::decode(&EventEnvelope::new("user.created", serde_json::Value::Null))
                .unwrap();
        assert_eq!(event, IdentityEvent::UserUpserted(UserPayload::default()));
    }

    #[test]
    fn decode_wrong_shape_is_malformed() {
        let result = IdentityEvent::decode(&EventEnvelope::new("user.created", json!("oops")));
        assert!(matches!(result, Err(CoreError::MalformedPayload { .. })));

        let result = IdentityEvent::decode(&EventEnvelope::new("user.created", json!({"id": 42})));
        assert!(matches!(result, Err(CoreError::MalformedPayload { .. })));
    }

    #[test]
    fn envelope_reads_type_field() {
        let envelope: EventEnvelope =
            serde_json::from_str(r#"{"type":"user.deleted","data":{"id":"user_1"},"object":"event"}"#)
                .unwrap();
        assert_eq!(envelope.kind, "user.deleted");
        assert_eq!(envelope.data["id"], "user_1");

        let bare: EventEnvelope = serde_json::from_str(r#"{"type":"user.deleted"}"#).unwrap();
        assert!(bare.data.is_null());
    }
}
