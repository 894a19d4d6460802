//! Repository modules implementing the mirrored tables.
//!
//! Each module adds methods to `MirrorService` via `impl MirrorService` blocks.

pub mod membership;
pub mod organisation;
pub mod user;
