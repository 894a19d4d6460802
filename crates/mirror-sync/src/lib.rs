//! # mirror-sync
//!
//! The identity mirror proper: reconciles user, organisation and membership
//! webhook events into the local store.
//!
//! [`apply`] is the single entry point. It decodes an [`EventEnvelope`],
//! routes it to exactly one reconciler and reports a [`SyncOutcome`].
//! Reconcilers are idempotent and tolerate out-of-order delivery: a
//! membership event for entities not seen yet creates minimal parent rows
//! first, and deletes of unknown entities are no-ops.
//!
//! Every operation takes the store as an explicit [`IdentityStore`]
//! capability, so tests can run against in-memory libSQL or a wrapper that
//! injects failures.
//!
//! [`EventEnvelope`]: mirror_core::events::EventEnvelope
//! [`IdentityStore`]: mirror_db::store::IdentityStore

mod dispatch;
mod ensure;
pub mod error;
pub mod membership;
pub mod organisation;
pub mod outcome;
pub mod query;
pub mod user;

pub use dispatch::{apply, apply_event};
pub use error::SyncError;
pub use outcome::SyncOutcome;
