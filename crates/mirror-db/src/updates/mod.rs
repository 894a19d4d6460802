//! Insert and update payload types for entity mutations.
//!
//! `New*` structs carry everything an insert needs besides the store-assigned
//! id and timestamps. `*Update` structs have `Option` fields: only `Some`
//! fields generate SET clauses in the dynamic UPDATE SQL.

pub mod membership;
pub mod organisation;
pub mod user;

pub use membership::NewMembership;
pub use organisation::{NewOrganisation, OrganisationUpdate, OrganisationUpdateBuilder};
pub use user::{NewUser, UserUpdate, UserUpdateBuilder};
