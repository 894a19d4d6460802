//! Shared test utilities for mirror-db unit tests.

use crate::service::MirrorService;
use crate::updates::{NewMembership, NewOrganisation, NewUser};
use mirror_core::entities::{Membership, Organisation, User};

/// Create an in-memory `MirrorService`.
pub async fn test_service() -> MirrorService {
    MirrorService::new_local(":memory:").await.unwrap()
}

pub async fn seed_user(svc: &MirrorService, external_id: &str) -> User {
    svc.insert_user(&NewUser::new(external_id, "Test User"))
        .await
        .unwrap()
}

pub async fn seed_organisation(svc: &MirrorService, external_id: &str) -> Organisation {
    svc.insert_organisation(&NewOrganisation::new(external_id, "Test Org"))
        .await
        .unwrap()
}

pub async fn seed_membership(
    svc: &MirrorService,
    user: &User,
    organisation: &Organisation,
    role: &str,
) -> Membership {
    svc.insert_membership(&NewMembership {
        user_id: user.id.clone(),
        organisation_id: organisation.id.clone(),
        role: role.to_string(),
    })
    .await
    .unwrap()
}
