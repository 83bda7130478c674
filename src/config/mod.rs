// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. saree-admin.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. SAREE_* env vars
//! 5. --set section.key=value
//! 6. --github-token / GITHUB_TOKEN
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! SAREE_GITHUB__TOKEN=ghp_..       → github.token
//! SAREE_GITHUB__OWNER=shop         → github.owner
//! SAREE_AUTH__ADMIN_PASSWORD=...   → auth.admin_password
//! SAREE_SERVER__BIND=0.0.0.0:8080  → server.bind
//! ```

pub mod loader;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{AuthConfig, GitHubConfig, LoggingConfig, ServerConfig};

/// Name of the configuration file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "saree-admin.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "SAREE";

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Repository holding the catalog.
    pub github: GitHubConfig,
    /// Admin login.
    pub auth: AuthConfig,
    /// HTTP listener.
    pub server: ServerConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use saree_admin::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("saree-admin.toml")
    ///     .with_env_prefix("SAREE")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Normalize values and reject unusable ones.
    ///
    /// Owner and repository may be empty here; commands that talk to GitHub
    /// check them with [`Config::require_repository`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty API URL or branch, or
    /// a zero token lifetime or request timeout.
    pub fn resolve_and_validate(&mut self) -> Result<()> {
        let github = &mut self.github;
        github.api_url = github.api_url.trim().trim_end_matches('/').to_string();
        github.owner = github.owner.trim().to_string();
        github.repo = github.repo.trim().to_string();
        github.branch = github.branch.trim().to_string();
        github.token = github.token.trim().to_string();

        if github.api_url.is_empty() {
            return Err(invalid("github", "api_url", "must not be empty").into());
        }
        if !github.api_url.starts_with("http://") && !github.api_url.starts_with("https://") {
            return Err(invalid("github", "api_url", "must be an http(s) URL").into());
        }
        if github.branch.is_empty() {
            return Err(invalid("github", "branch", "must not be empty").into());
        }
        if github.request_timeout_secs == 0 {
            return Err(invalid("github", "request_timeout_secs", "must be positive").into());
        }
        if self.auth.token_ttl_secs == 0 {
            return Err(invalid("auth", "token_ttl_secs", "must be positive").into());
        }
        if self
            .auth
            .admin_password
            .as_deref()
            .is_some_and(str::is_empty)
        {
            self.auth.admin_password = None;
        }
        Ok(())
    }

    /// Check the repository coordinates are set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` naming the first missing key.
    pub fn require_repository(&self) -> std::result::Result<(), ConfigError> {
        for (key, value) in [("owner", &self.github.owner), ("repo", &self.github.repo)] {
            if value.is_empty() {
                return Err(ConfigError::MissingKey {
                    section: "github".to_string(),
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Secrets are shown as `[hidden]` when set. Output is ordered by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_github_options(&mut options);
        self.format_auth_options(&mut options);
        self.format_server_options(&mut options);
        self.format_logging_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_github_options(&self, options: &mut BTreeMap<String, String>) {
        let github = &self.github;
        options.insert("github.api_url".into(), github.api_url.clone());
        options.insert("github.owner".into(), github.owner.clone());
        options.insert("github.repo".into(), github.repo.clone());
        options.insert("github.branch".into(), github.branch.clone());
        options.insert("github.token".into(), hidden(!github.token.is_empty()));
        options.insert("github.api_version".into(), github.api_version.clone());
        options.insert(
            "github.request_timeout_secs".into(),
            github.request_timeout_secs.to_string(),
        );
        options.insert(
            "github.init_missing_branch".into(),
            github.init_missing_branch.to_string(),
        );
    }

    fn format_auth_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "auth.admin_password".into(),
            hidden(self.auth.admin_password.is_some()),
        );
        options.insert(
            "auth.token_ttl_secs".into(),
            self.auth.token_ttl_secs.to_string(),
        );
        options.insert(
            "auth.clock_skew_secs".into(),
            self.auth.clock_skew_secs.to_string(),
        );
    }

    fn format_server_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("server.bind".into(), self.server.bind.clone());
        options.insert(
            "server.allowed_origin".into(),
            self.server.allowed_origin.clone(),
        );
    }

    fn format_logging_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "logging.level".into(),
            self.logging.level.as_u8().to_string(),
        );
        options.insert(
            "logging.file_level".into(),
            self.logging.file_level.as_u8().to_string(),
        );
        options.insert(
            "logging.file".into(),
            self.logging
                .file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
        options.insert("logging.json".into(), self.logging.json.to_string());
    }
}

fn hidden(set: bool) -> String {
    if set { "[hidden]" } else { "" }.to_string()
}

fn invalid(section: &str, key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        message: message.to_string(),
    }
}
