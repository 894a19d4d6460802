use anyhow::Context;
use mirror_config::MirrorConfig;
use mirror_db::service::MirrorService;

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: MirrorService,
    pub config: MirrorConfig,
}

impl AppContext {
    /// Open the configured database (running migrations) and keep the config.
    pub async fn init(config: MirrorConfig) -> anyhow::Result<Self> {
        let service = MirrorService::open(&config.database)
            .await
            .with_context(|| {
                if config.database.is_remote() {
                    format!("failed to open remote database {}", config.database.url)
                } else {
                    format!("failed to open database at {}", config.database.path)
                }
            })?;

        tracing::debug!(remote = config.database.is_remote(), "mirror database ready");
        Ok(Self { service, config })
    }

    /// Effective list limit: `--limit`, else `general.default_limit`.
    #[must_use]
    pub fn limit(&self, flags: &GlobalFlags) -> u32 {
        flags.limit.unwrap_or(self.config.general.default_limit)
    }
}
