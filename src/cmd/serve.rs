// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `serve` command.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cmd::open_service;
use crate::config::Config;
use crate::error::Result;
use crate::server::{self, AppState};

/// Runs the admin API until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the service cannot be built or the listener fails.
pub async fn run_serve_command(config: &Config, offline: bool) -> Result<()> {
    let service = open_service(config, offline)?;

    if config.auth.admin_password.is_none() {
        warn!("auth.admin_password is not set; every login will be rejected");
    }
    match service.head().await {
        Ok(head) => info!(branch = service.branch(), head = %head.short(), "catalog branch found"),
        Err(e) if e.is_ref_not_found() && config.github.init_missing_branch => {
            info!(branch = service.branch(), "branch will be created on first save");
        }
        Err(e) => warn!(branch = service.branch(), error = %e, "catalog branch is not readable"),
    }

    let shutdown = CancellationToken::new();
    tokio::spawn(server::cancel_on_signal(shutdown.clone()));

    let state = AppState::new(service, config.auth.clone());
    server::serve(&config.server, state, shutdown).await
}
