// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE        ← Additional config files (can repeat)
//! --log-level N        ← Console verbosity (0-6)
//! --file-log-level N   ← File verbosity (defaults to --log-level)
//! --log-file FILE      ← logging.file override
//! --set KEY=VAL        ← Direct config override (section.key=value)
//! --github-token TOKEN ← github.token override (or GITHUB_TOKEN)
//! --offline            ← In-memory repository, nothing leaves the process
//!
//! Precedence: CLI flags > --set > SAREE_* env > --config > saree-admin.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times.
    #[arg(short = 'c', long = "config", value_name = "FILE", action = clap::ArgAction::Append, global = true)]
    pub configs: Vec<PathBuf>,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", global = true, value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// File log level, defaults to --log-level.
    #[arg(long = "file-log-level", value_name = "LEVEL", global = true, value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Sets an option, such as 'github.branch=catalog'.
    /// Can be specified multiple times.
    #[arg(short = 's', long = "set", value_name = "OPTION", action = clap::ArgAction::Append, global = true)]
    pub options: Vec<String>,

    /// GitHub access token, overrides github.token.
    #[arg(long = "github-token", value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub github_token: Option<String>,

    /// Use an empty in-memory repository instead of GitHub.
    #[arg(long, global = true)]
    pub offline: bool,
}

impl GlobalOptions {
    /// Converts command-line options to `section.key=value` overrides.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<String> {
        let mut overrides = self.options.clone();

        if let Some(level) = self.log_level {
            overrides.push(format!("logging.level={level}"));
        }

        if let Some(level) = self.file_log_level.or(self.log_level) {
            overrides.push(format!("logging.file_level={level}"));
        }

        if let Some(ref path) = self.log_file {
            overrides.push(format!("logging.file={}", path.display()));
        }

        if let Some(ref token) = self.github_token
            && !token.trim().is_empty()
        {
            overrides.push(format!("github.token={token}"));
        }

        overrides
    }
}
