//! Entity structs for mirrored identity rows.
//!
//! Each entity maps to a table in the libSQL database. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON output and schema
//! validation.

mod membership;
mod organisation;
mod user;

pub use membership::Membership;
pub use organisation::Organisation;
pub use user::User;
