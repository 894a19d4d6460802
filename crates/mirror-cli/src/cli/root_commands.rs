use clap::{Args, Subcommand, ValueEnum};

use crate::cli::subcommands::{OrgCommands, UserCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Apply one webhook event envelope.
    Apply(ApplyArgs),
    /// Apply a JSONL file of webhook envelopes in order.
    Replay(ReplayArgs),
    /// Inspect mirrored users.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Inspect mirrored organisations.
    Org {
        #[command(subcommand)]
        action: OrgCommands,
    },
    /// Print the JSON Schema of a mirrored type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ApplyArgs {
    /// JSON file holding `{"type": ..., "data": ...}`. Reads stdin when omitted.
    pub file: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ReplayArgs {
    /// JSONL file, one envelope per line.
    pub file: String,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Type to describe.
    pub target: SchemaTarget,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaTarget {
    User,
    Organisation,
    Membership,
    Event,
}
