//! Cross-cutting error types for the identity mirror.
//!
//! Domain-specific errors (`DatabaseError`, `SyncError`, `ConfigError`) are
//! defined in their respective crates. The CLI converges them into `anyhow`.

use thiserror::Error;

/// Errors raised while interpreting webhook events.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An event payload could not be decoded into its typed shape.
    #[error("Malformed {event} payload: {reason}")]
    MalformedPayload { event: String, reason: String },
}
