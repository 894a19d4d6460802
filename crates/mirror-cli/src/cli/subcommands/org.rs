use clap::Subcommand;

/// Read-only organisation queries.
#[derive(Clone, Debug, Subcommand)]
pub enum OrgCommands {
    /// Show one organisation.
    Get {
        /// Upstream organisation identifier.
        #[arg(long)]
        external_id: String,
    },
    /// List organisations, most recently updated first.
    List,
    /// List the memberships of one organisation.
    Members {
        /// Upstream organisation identifier.
        #[arg(long)]
        external_id: String,
    },
}
