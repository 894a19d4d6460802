use mirror_core::entities::{Membership, Organisation, User};
use mirror_core::events::EventEnvelope;
use schemars::{Schema, schema_for};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SchemaArgs, SchemaTarget};
use crate::output::output;

/// Handle `mirror schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema(args.target), flags.format)
}

fn schema(target: SchemaTarget) -> Schema {
    match target {
        SchemaTarget::User => schema_for!(User),
        SchemaTarget::Organisation => schema_for!(Organisation),
        SchemaTarget::Membership => schema_for!(Membership),
        SchemaTarget::Event => schema_for!(EventEnvelope),
    }
}
