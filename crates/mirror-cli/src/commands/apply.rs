use std::io::Read;

use anyhow::Context;
use mirror_core::events::EventEnvelope;
use mirror_sync::SyncOutcome;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ApplyArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ApplyResponse {
    event: String,
    #[serde(flatten)]
    outcome: SyncOutcome,
}

/// Handle `mirror apply`.
pub async fn handle(args: &ApplyArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let input = read_input(args.file.as_deref())?;
    let envelope = parse_envelope(&input)?;

    let outcome = mirror_sync::apply(&ctx.service, &envelope)
        .await
        .with_context(|| format!("failed to apply {} event", envelope.kind))?;

    output(
        &ApplyResponse {
            event: envelope.kind,
            outcome,
        },
        flags.format,
    )
}

fn read_input(file: Option<&str>) -> anyhow::Result<String> {
    if let Some(path) = file {
        return std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"));
    }
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read event from stdin")?;
    Ok(buffer)
}

fn parse_envelope(input: &str) -> anyhow::Result<EventEnvelope> {
    serde_json::from_str(input).context("input is not a {\"type\", \"data\"} event envelope")
}
