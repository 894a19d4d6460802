use anyhow::Context;
use mirror_sync::query;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::OrgCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `mirror org`.
pub async fn handle(action: &OrgCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        OrgCommands::Get { external_id } => {
            let org = ctx
                .service
                .find_organisation_by_external_id(external_id)
                .await?
                .with_context(|| format!("organisation not found: {external_id}"))?;
            output(&org, flags.format)
        }
        OrgCommands::List => {
            let orgs = ctx.service.list_organisations(ctx.limit(flags)).await?;
            output(&orgs, flags.format)
        }
        OrgCommands::Members { external_id } => {
            let members = query::members_of_organisation(&ctx.service, external_id).await?;
            output(&members, flags.format)
        }
    }
}
