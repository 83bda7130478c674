// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration sections.
//!
//! ```text
//! Config: GitHubConfig, AuthConfig, ServerConfig, LoggingConfig
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::logging::LogLevel;

/// Default GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default value of the `X-GitHub-Api-Version` header.
pub const DEFAULT_API_VERSION: &str = "2022-11-28";

/// Repository that holds the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitHubConfig {
    /// REST API base URL.
    pub api_url: String,
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Branch the catalog lives on.
    pub branch: String,
    /// Personal access token with contents write permission.
    pub token: String,
    /// Value sent as `X-GitHub-Api-Version`.
    pub api_version: String,
    /// Timeout of a single API request.
    pub request_timeout_secs: u64,
    /// Create the branch with a root commit if it does not exist.
    pub init_missing_branch: bool,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            owner: String::new(),
            repo: String::new(),
            branch: "main".to_string(),
            token: String::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
            request_timeout_secs: 30,
            init_missing_branch: false,
        }
    }
}

/// Admin login and token lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Password accepted by the login endpoint.
    pub admin_password: Option<String>,
    /// Seconds a token stays valid after issue.
    pub token_ttl_secs: u64,
    /// Seconds a token may be dated in the future.
    pub clock_skew_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_password: None,
            token_ttl_secs: 3600,
            clock_skew_secs: 60,
        }
    }
}

/// Inbound HTTP listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address and port to listen on.
    pub bind: String,
    /// Value of `Access-Control-Allow-Origin`.
    pub allowed_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            allowed_origin: "*".to_string(),
        }
    }
}

/// Log levels and destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level for console output (0-6).
    pub level: LogLevel,
    /// Log level for file output (0-6).
    pub file_level: LogLevel,
    /// Log file, none for console only.
    pub file: Option<PathBuf>,
    /// Write console lines as JSON.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::INFO,
            file_level: LogLevel::DEBUG,
            file: None,
            json: false,
        }
    }
}
