use anyhow::bail;
use mirror_core::identity::AuthIdentity;
use mirror_sync::query;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `mirror user`.
pub async fn handle(action: &UserCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        UserCommands::Get { subject, id } => {
            let user = match (subject, id) {
                (Some(subject), _) => {
                    let identity = AuthIdentity::subject(subject.as_str());
                    query::current_user(&ctx.service, Some(&identity)).await?
                }
                (None, Some(id)) => query::user_by_id(&ctx.service, id).await?,
                (None, None) => bail!("either --subject or --id is required"),
            };
            match user {
                Some(user) => output(&user, flags.format),
                None => bail!("user not found"),
            }
        }
        UserCommands::List => {
            let users = ctx.service.list_users(ctx.limit(flags)).await?;
            output(&users, flags.format)
        }
        UserCommands::Memberships { subject } => {
            let memberships = query::memberships_of_user(&ctx.service, subject).await?;
            output(&memberships, flags.format)
        }
    }
}
