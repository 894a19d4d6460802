//! Mirror database configuration (local libSQL file or remote Turso database).

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default local database path.
fn default_path() -> String {
    "mirror.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Local database file. `:memory:` opens a throwaway in-memory database.
    #[serde(default = "default_path")]
    pub path: String,

    /// Remote database URL (e.g., `libsql://mirror-acme.turso.io`).
    #[serde(default)]
    pub url: String,

    /// Auth token for the remote database.
    #[serde(default)]
    pub auth_token: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            url: String::new(),
            auth_token: String::new(),
        }
    }
}

impl DatabaseConfig {
    /// Remote mode is selected when both URL and token are present.
    pub fn is_remote(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }

    /// Reject half-configured remote settings and empty local paths.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.url.is_empty() && self.auth_token.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.auth_token".into(),
                reason: "required when database.url is set".into(),
            });
        }
        if !self.url.is_empty() && !self.url.starts_with("libsql://") && !self.url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "database.url".into(),
                reason: format!("expected a libsql:// or https:// URL, got '{}'", self.url),
            });
        }
        if self.url.is_empty() && self.path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}
