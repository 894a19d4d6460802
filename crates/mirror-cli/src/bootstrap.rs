use anyhow::Context;
use mirror_config::MirrorConfig;

use crate::cli::GlobalFlags;

/// Load layered configuration (with `.env`), then apply CLI overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<MirrorConfig> {
    let config = MirrorConfig::load_with_dotenv().context("failed to load mirror configuration")?;
    Ok(apply_overrides(config, flags))
}

/// `--database` always selects a local file, even when a remote is configured.
fn apply_overrides(mut config: MirrorConfig, flags: &GlobalFlags) -> MirrorConfig {
    if let Some(path) = &flags.database {
        tracing::debug!(path, "database path overridden from command line");
        config.database.path.clone_from(path);
        config.database.url.clear();
        config.database.auth_token.clear();
    }
    config
}
