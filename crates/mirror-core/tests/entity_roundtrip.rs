//! Serde roundtrip and JsonSchema validation tests for entity and event types.

use chrono::Utc;
use schemars::schema_for;
use mirror_core::entities::*;
use mirror_core::events::*;
use mirror_core::identity::AuthIdentity;
use mirror_core::responses::ReplayResponse;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

roundtrip_and_validate!(
    user_roundtrip,
    User,
    User {
        id: "usr-a3f8b2c1".into(),
        external_id: "user_2abc".into(),
        email: Some("ada@example.com".into()),
        name: "Ada Lovelace".into(),
        image_url: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    organisation_roundtrip,
    Organisation,
    Organisation {
        id: "org-0b1c2d3e".into(),
        external_id: "org_2xyz".into(),
        name: "Analytical Engines".into(),
        slug: Some("analytical-engines".into()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    membership_roundtrip,
    Membership,
    Membership {
        id: "mbr-9f8e7d6c".into(),
        user_id: "usr-a3f8b2c1".into(),
        organisation_id: "org-0b1c2d3e".into(),
        role: "org:admin".into(),
        joined_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    auth_identity_roundtrip,
    AuthIdentity,
    AuthIdentity {
        subject: "user_2abc".into(),
        org_id: Some("org_2xyz".into()),
        org_role: Some("org:admin".into()),
    }
);

roundtrip_and_validate!(
    membership_payload_roundtrip,
    MembershipPayload,
    MembershipPayload {
        id: Some("orgmem_1".into()),
        role: Some("org:admin".into()),
        organization: Some(OrganisationRef {
            id: Some("org_2xyz".into()),
            name: Some("Analytical Engines".into()),
            slug: None,
        }),
        public_user_data: Some(PublicUserData {
            user_id: Some("user_2abc".into()),
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            identifier: Some("ada@example.com".into()),
            image_url: None,
        }),
    }
);

roundtrip_and_validate!(
    replay_response_roundtrip,
    ReplayResponse,
    ReplayResponse {
        events_read: 12,
        applied: 7,
        unchanged: 3,
        skipped: 1,
        ignored: 1,
        duration_ms: 42,
    }
);

#[test]
fn envelope_roundtrip() {
    let envelope = EventEnvelope::new(
        "organizationMembership.created",
        serde_json::json!({"organization": {"id": "org_1"}, "public_user_data": {"user_id": "u1"}}),
    );
    let json = serde_json::to_string(&envelope).unwrap();
    assert!(json.contains(r#""type":"organizationMembership.created""#));
    let recovered: EventEnvelope = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered, envelope);
}
