//! ID prefix constants for store-assigned internal references.
//!
//! Internal ids have the form `{prefix}-{8 hex chars}`, e.g. `usr-a3f8b2c1`.
//! They are generated by the store on insert and never leave the mirror as
//! natural keys; upstream identifiers are kept in `external_id` columns.

pub const PREFIX_USER: &str = "usr";
pub const PREFIX_ORGANISATION: &str = "org";
pub const PREFIX_MEMBERSHIP: &str = "mbr";

/// Every prefix the store may hand out.
pub const ALL_PREFIXES: &[&str] = &[PREFIX_USER, PREFIX_ORGANISATION, PREFIX_MEMBERSHIP];

/// Format an internal id from a prefix and its random suffix.
#[must_use]
pub fn format_id(prefix: &str, suffix: &str) -> String {
    format!("{prefix}-{suffix}")
}
