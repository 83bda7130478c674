// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Serve | Batch | List | Token | Check | Options | Version
//! ```

use std::process::ExitCode;

use saree_admin::cli::global::GlobalOptions;
use saree_admin::cli::{self, Command};
use saree_admin::cmd::batch::run_batch_command;
use saree_admin::cmd::check::run_check_command;
use saree_admin::cmd::config::run_options_command;
use saree_admin::cmd::list::run_list_command;
use saree_admin::cmd::serve::run_serve_command;
use saree_admin::cmd::token::run_token_command;
use saree_admin::config::loader::ConfigLoader;
use saree_admin::config::{Config, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use saree_admin::logging::{LogConfig, LogLevel, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let config = load_config(&cli.global);

    let log_config = build_log_config(&cli.global, config.as_ref().ok());
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, config).await
}

/// Console and file levels from the CLI, then `[logging]`, then defaults.
fn build_log_config(global: &GlobalOptions, config: Option<&Config>) -> LogConfig {
    let logging = config.map(|c| &c.logging);

    let console_level = global
        .log_level
        .and_then(|level| LogLevel::try_from(level).ok())
        .or_else(|| logging.map(|l| l.level))
        .unwrap_or(LogLevel::INFO);

    let file_level = global
        .file_log_level
        .and_then(|level| LogLevel::try_from(level).ok())
        .or_else(|| logging.map(|l| l.file_level))
        .unwrap_or(console_level);

    let log_file = global
        .log_file
        .clone()
        .or_else(|| logging.and_then(|l| l.file.clone()))
        .map(|p| p.display().to_string());

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(log_file)
        .with_json(logging.is_some_and(|l| l.json))
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: saree_admin::error::Result<Config>) -> ExitCode {
    let offline = cli.global.offline;
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => config.map(|config| {
            let loader = build_config_loader(&cli.global);
            run_options_command(&config, &loader.format_loaded_files());
        }),
        Some(Command::Serve) => match config {
            Ok(config) => run_serve_command(&config, offline).await,
            Err(e) => Err(e),
        },
        Some(Command::Batch(args)) => match config {
            Ok(config) => run_batch_command(args, &config, offline).await,
            Err(e) => Err(e),
        },
        Some(Command::List(args)) => match config {
            Ok(config) => run_list_command(args, &config, offline).await,
            Err(e) => Err(e),
        },
        Some(Command::Token(args)) => {
            config.and_then(|config| run_token_command(args, &config.auth))
        }
        Some(Command::Check) => match config {
            Ok(config) => run_check_command(&config, offline).await,
            Err(e) => Err(e),
        },
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

/// Files, then environment, then `--set` and the other flag overrides.
fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new().add_toml_file_optional(DEFAULT_CONFIG_FILE);
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader.with_env_prefix(ENV_PREFIX)
}

fn load_config(global: &GlobalOptions) -> saree_admin::error::Result<Config> {
    let mut loader = build_config_loader(global);
    for option in global.to_config_overrides() {
        loader = loader.set_option(&option)?;
    }
    loader.build()
}
