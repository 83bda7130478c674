// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `batch` command: apply a batch request file without the HTTP layer.

use anyhow::Context;
use tokio::io::AsyncReadExt;
use tracing::info;

use crate::batch::BatchRequest;
use crate::cli::BatchArgs;
use crate::cmd::{open_service, print_json};
use crate::config::Config;
use crate::error::Result;

/// Reads a batch request and commits it.
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed, or the batch fails.
pub async fn run_batch_command(args: &BatchArgs, config: &Config, offline: bool) -> Result<()> {
    let text = read_input(args).await?;
    let request: BatchRequest = serde_json::from_str(&text)
        .with_context(|| format!("invalid batch request in {}", args.file.display()))?;

    if request.resources().is_empty() {
        info!("batch request names no resources");
    }

    let service = open_service(config, offline)?;
    let response = service.apply_batch(&request).await?;
    print_json(&response)
}

async fn read_input(args: &BatchArgs) -> Result<String> {
    if args.is_stdin() {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("failed to read batch request from stdin")?;
        Ok(text)
    } else {
        tokio::fs::read_to_string(&args.file)
            .await
            .with_context(|| format!("failed to read {}", args.file.display()))
    }
}
