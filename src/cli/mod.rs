// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! saree-admin [global options] <command>
//! serve
//! batch <FILE|->
//! list <resource>
//! token {issue|verify <TOKEN>}
//! check
//! options
//! version
//! ```

pub mod global;


use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::catalog::ResourceKind;
use crate::cli::global::GlobalOptions;

/// Storefront admin backend
///
/// Serves the admin API of a saree storefront whose catalog lives as JSON
/// files in a GitHub repository.
#[derive(Debug, Parser)]
#[command(
    name = "saree-admin",
    author,
    version,
    about = "Storefront admin backend",
    long_about = "saree-admin Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Serves the admin API of a storefront whose catalog lives as\n\
                  JSON files in a GitHub repository. Every save becomes one\n\
                  commit on the configured branch.",
    after_help = "CONFIGURATION:\n\n\
                  saree-admin reads `saree-admin.toml` from the current directory\n\
                  if present, then every --config file in order, then SAREE_*\n\
                  environment variables (SAREE_GITHUB__TOKEN, SAREE_AUTH__ADMIN_PASSWORD,\n\
                  ...), then --set and --github-token."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their resolved values.
    Options,

    /// Runs the admin HTTP API.
    Serve,

    /// Applies a batch request from a JSON file in one commit.
    Batch(BatchArgs),

    /// Prints the records of one resource.
    List(ListArgs),

    /// Issues or checks admin tokens.
    Token(TokenArgs),

    /// Checks the repository and branch are reachable.
    Check,
}

/// Arguments for the `batch` command.
#[derive(Debug, Clone, Args)]
pub struct BatchArgs {
    /// Batch request file, `-` for stdin.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

impl BatchArgs {
    #[must_use]
    pub fn is_stdin(&self) -> bool {
        self.file.as_os_str() == "-"
    }
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// products, categories, hero, collections or content.
    #[arg(value_name = "RESOURCE")]
    pub resource: ResourceKind,
}

/// Arguments for the `token` command.
#[derive(Debug, Clone, Args)]
pub struct TokenArgs {
    #[command(subcommand)]
    pub subcommand: TokenSubcommand,
}

/// Token subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum TokenSubcommand {
    /// Prints a fresh admin token.
    Issue,

    /// Checks a token against the configured lifetime.
    Verify {
        /// Token to check.
        #[arg(value_name = "TOKEN")]
        token: String,
    },
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
