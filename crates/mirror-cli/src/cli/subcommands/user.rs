use clap::{ArgGroup, Subcommand};

/// Read-only user queries.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Show one user by upstream subject or internal id.
    #[command(group(ArgGroup::new("key").required(true).args(["subject", "id"])))]
    Get {
        /// Upstream subject identifier (external id).
        #[arg(long)]
        subject: Option<String>,
        /// Internal id, e.g. `usr-a3f8b2c1`.
        #[arg(long)]
        id: Option<String>,
    },
    /// List users, most recently updated first.
    List,
    /// List the memberships of one user.
    Memberships {
        /// Upstream subject identifier.
        #[arg(long)]
        subject: String,
    },
}
