//! # mirror-core
//!
//! Core types, event payloads, and error types for the identity mirror.
//!
//! This crate provides the foundational types shared across all mirror crates:
//! - Entity structs for mirrored rows (users, organisations, memberships)
//! - Event kinds recognized from the identity provider's webhook stream
//! - Typed event payloads with pure extraction helpers
//! - ID prefix constants for store-assigned internal references
//! - Cross-cutting error types
//! - CLI response types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod events;
pub mod identity;
pub mod ids;
pub mod responses;
