//! The storage capability the reconcilers are written against.
//!
//! Reconcilers take `&impl IdentityStore` instead of reaching for a global
//! handle. [`MirrorService`] is the production implementation; tests wrap it
//! to inject faults between cascade steps.

use mirror_core::entities::{Membership, Organisation, User};

use crate::error::DatabaseError;
use crate::service::MirrorService;
use crate::updates::{NewMembership, NewOrganisation, NewUser, OrganisationUpdate, UserUpdate};

/// Point lookups, inserts, patches and deletes over the three mirrored tables.
///
/// Inserts must report a duplicate external id (or duplicate membership pair)
/// as [`DatabaseError::UniqueViolation`] so callers can fall back to a patch.
#[allow(async_fn_in_trait)]
pub trait IdentityStore {
    async fn find_user_by_external_id(&self, external_id: &str)
    -> Result<Option<User>, DatabaseError>;
    async fn get_user(&self, id: &str) -> Result<Option<User>, DatabaseError>;
    async fn insert_user(&self, new: &NewUser) -> Result<User, DatabaseError>;
    async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<(), DatabaseError>;
    async fn delete_user(&self, id: &str) -> Result<(), DatabaseError>;

    async fn find_organisation_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Organisation>, DatabaseError>;
    async fn get_organisation(&self, id: &str) -> Result<Option<Organisation>, DatabaseError>;
    async fn insert_organisation(&self, new: &NewOrganisation)
    -> Result<Organisation, DatabaseError>;
    async fn update_organisation(
        &self,
        id: &str,
        update: &OrganisationUpdate,
    ) -> Result<(), DatabaseError>;
    async fn delete_organisation(&self, id: &str) -> Result<(), DatabaseError>;

    async fn find_membership(
        &self,
        user_id: &str,
        organisation_id: &str,
    ) -> Result<Option<Membership>, DatabaseError>;
    async fn list_memberships_by_user(&self, user_id: &str)
    -> Result<Vec<Membership>, DatabaseError>;
    async fn list_memberships_by_organisation(
        &self,
        organisation_id: &str,
    ) -> Result<Vec<Membership>, DatabaseError>;
    async fn insert_membership(&self, new: &NewMembership) -> Result<Membership, DatabaseError>;
    async fn set_membership_role(&self, id: &str, role: &str) -> Result<(), DatabaseError>;
    async fn delete_membership(&self, id: &str) -> Result<(), DatabaseError>;
}

// Inherent methods win name resolution, so each call below goes to the repo.
impl IdentityStore for MirrorService {
    async fn find_user_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<User>, DatabaseError> {
        Self::find_user_by_external_id(self, external_id).await
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        Self::get_user(self, id).await
    }

    async fn insert_user(&self, new: &NewUser) -> Result<User, DatabaseError> {
        Self::insert_user(self, new).await
    }

    async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<(), DatabaseError> {
        Self::update_user(self, id, update).await
    }

    async fn delete_user(&self, id: &str) -> Result<(), DatabaseError> {
        Self::delete_user(self, id).await
    }

    async fn find_organisation_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Organisation>, DatabaseError> {
        Self::find_organisation_by_external_id(self, external_id).await
    }

    async fn get_organisation(&self, id: &str) -> Result<Option<Organisation>, DatabaseError> {
        Self::get_organisation(self, id).await
    }

    async fn insert_organisation(
        &self,
        new: &NewOrganisation,
    ) -> Result<Organisation, DatabaseError> {
        Self::insert_organisation(self, new).await
    }

    async fn update_organisation(
        &self,
        id: &str,
        update: &OrganisationUpdate,
    ) -> Result<(), DatabaseError> {
        Self::update_organisation(self, id, update).await
    }

    async fn delete_organisation(&self, id: &str) -> Result<(), DatabaseError> {
        Self::delete_organisation(self, id).await
    }

    async fn find_membership(
        &self,
        user_id: &str,
        organisation_id: &str,
    ) -> Result<Option<Membership>, DatabaseError> {
        Self::find_membership(self, user_id, organisation_id).await
    }

    async fn list_memberships_by_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Membership>, DatabaseError> {
        Self::list_memberships_by_user(self, user_id).await
    }

    async fn list_memberships_by_organisation(
        &self,
        organisation_id: &str,
    ) -> Result<Vec<Membership>, DatabaseError> {
        Self::list_memberships_by_organisation(self, organisation_id).await
    }

    async fn insert_membership(&self, new: &NewMembership) -> Result<Membership, DatabaseError> {
        Self::insert_membership(self, new).await
    }

    async fn set_membership_role(&self, id: &str, role: &str) -> Result<(), DatabaseError> {
        Self::set_membership_role(self, id, role).await
    }

    async fn delete_membership(&self, id: &str) -> Result<(), DatabaseError> {
        Self::delete_membership(self, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_service;

    // Exercise the trait path rather than the inherent methods.
    async fn link_through_store<S: IdentityStore>(store: &S) -> Membership {
        let user = store.insert_user(&NewUser::new("user_1", "Ada")).await.unwrap();
        let org = store
            .insert_organisation(&NewOrganisation::new("org_1", "Analytical"))
            .await
            .unwrap();
        store
            .insert_membership(&NewMembership {
                user_id: user.id,
                organisation_id: org.id,
                role: "org:member".into(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn service_implements_store() {
        let svc = test_service().await;
        let membership = link_through_store(&svc).await;

        let by_user = IdentityStore::list_memberships_by_user(&svc, &membership.user_id)
            .await
            .unwrap();
        assert_eq!(by_user, vec![membership]);
    }
}
