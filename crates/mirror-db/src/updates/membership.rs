//! Membership insert payload.
//!
//! Memberships have a single mutable column (`role`), patched through
//! `set_membership_role`, so there is no update builder.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMembership {
    pub user_id: String,
    pub organisation_id: String,
    pub role: String,
}
