//! Response types returned by CLI commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Summary of a `mirror replay` run over a JSONL event file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReplayResponse {
    /// Event envelopes read from the file.
    pub events_read: u32,
    /// Events that inserted, patched, or deleted at least one row.
    pub applied: u32,
    /// Events that converged without writing (replays, already-absent deletes).
    pub unchanged: u32,
    /// Recognized events missing identifying fields.
    pub skipped: u32,
    /// Events of a kind the mirror does not handle.
    pub ignored: u32,
    pub duration_ms: u64,
}
